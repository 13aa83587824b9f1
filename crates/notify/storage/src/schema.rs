//! Diesel schema definitions.

diesel::table! {
    redirections (context_id) {
        context_id -> Text,
        token -> Text,
    }
}

diesel::table! {
    push_notifications (id) {
        id -> Integer,
        uid -> Integer,
        context_id -> Text,
        message_count -> Integer,
        message_type -> Text,
        created_at_utc -> Timestamp,
        source_ip -> Text,
        source_host -> Text,
        source_path -> Text,
    }
}

diesel::table! {
    device_details (uid, context_id) {
        uid -> Integer,
        context_id -> Text,
        device_platform -> Text,
        device_token -> Text,
        updated_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(redirections, push_notifications, device_details);
