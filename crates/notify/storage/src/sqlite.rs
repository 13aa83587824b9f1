//! SQLite storage implementation.

use color_eyre::eyre::WrapErr as _;
use diesel::connection::SimpleConnection as _;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use notify_core::{ContextRecord, DeviceRecord, PushRecord};

use crate::models::*;
use crate::schema::*;
use crate::traits::*;

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Per-connection pragmas so pooled writers wait on each other instead of failing.
#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// SQLite-based storage.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
    batch_size: i64,
}

impl SqliteStorage {
    /// Create a new SQLite storage from a database URL.
    pub fn new(database_url: &str) -> color_eyre::eyre::Result<Self> {
        Self::with_pool_size(database_url, 10)
    }

    /// Create a new SQLite storage with an explicit connection pool size.
    pub fn with_pool_size(database_url: &str, pool_size: u32) -> color_eyre::eyre::Result<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_customizer(Box::new(ConnectionOptions))
            .build(manager)
            .wrap_err("failed to create connection pool")?;

        Ok(Self {
            pool,
            batch_size: crate::DEFAULT_BATCH_SIZE,
        })
    }

    /// Create a private in-memory database on a single pooled connection.
    pub fn in_memory() -> color_eyre::eyre::Result<Self> {
        Self::with_pool_size(":memory:", 1)
    }

    /// Override the declared batch size preference.
    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Run migrations.
    pub fn run_migrations(&self) -> color_eyre::eyre::Result<()> {
        use diesel_migrations::MigrationHarness as _;

        let mut conn = self
            .pool
            .get()
            .wrap_err("failed to get connection for migrations")?;

        let applied = conn
            .run_pending_migrations(crate::MIGRATIONS)
            .map_err(|e| color_eyre::eyre::eyre!("migration failed: {}", e))?;

        tracing::info!(applied = applied.len(), "database migrations complete");

        Ok(())
    }

    fn conn(
        &self,
    ) -> color_eyre::eyre::Result<diesel::r2d2::PooledConnection<ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .wrap_err("failed to get database connection")
    }
}

fn upsert_device(
    conn: &mut SqliteConnection,
    record: &DeviceRecord,
    now: chrono::NaiveDateTime,
) -> QueryResult<usize> {
    let new_device = NewDeviceDetails {
        uid: record.uid,
        context_id: &record.context_id,
        device_platform: &record.device_platform,
        device_token: &record.device_token,
        updated_at: now,
    };

    diesel::insert_into(device_details::table)
        .values(&new_device)
        .on_conflict((device_details::uid, device_details::context_id))
        .do_update()
        .set((
            device_details::device_platform.eq(&record.device_platform),
            device_details::device_token.eq(&record.device_token),
            device_details::updated_at.eq(now),
        ))
        .execute(conn)
}

impl ContextStore for SqliteStorage {
    fn find_by_context(&self, context_id: &str) -> color_eyre::eyre::Result<Option<ContextRecord>> {
        let mut conn = self.conn()?;

        let result: Option<RedirectionRow> = redirections::table
            .filter(redirections::context_id.eq(context_id))
            .select(RedirectionRow::as_select())
            .first(&mut conn)
            .optional()
            .wrap_err("failed to find context")?;

        Ok(result.map(ContextRecord::from))
    }

    fn store_context(&self, context_id: &str, token: &str) -> color_eyre::eyre::Result<()> {
        let mut conn = self.conn()?;

        diesel::insert_into(redirections::table)
            .values(&NewRedirection { context_id, token })
            .on_conflict(redirections::context_id)
            .do_update()
            .set(redirections::token.eq(token))
            .execute(&mut conn)
            .wrap_err("failed to store context")?;

        Ok(())
    }
}

impl NotificationStore for SqliteStorage {
    fn preferred_batch_size(&self) -> i64 {
        self.batch_size
    }

    fn save_one(&self, record: &PushRecord) -> color_eyre::eyre::Result<Option<PushRecord>> {
        let mut conn = self.conn()?;

        let inserted = diesel::insert_into(push_notifications::table)
            .values(&NewPushNotification::from(record))
            .execute(&mut conn)
            .wrap_err("failed to save push notification")?;

        if inserted != 1 {
            tracing::warn!(uid = record.uid, inserted, "push notification insert affected no row");
            return Ok(None);
        }

        Ok(Some(record.clone()))
    }

    fn save_many(&self, records: &[PushRecord]) -> color_eyre::eyre::Result<Vec<PushRecord>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let conn: &mut SqliteConnection = &mut conn;
        let rows: Vec<NewPushNotification<'_>> =
            records.iter().map(NewPushNotification::from).collect();

        let inserted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::insert_into(push_notifications::table)
                    .values(&rows)
                    .execute(conn)
            })
            .wrap_err("failed to save push notification batch")?;

        if inserted != records.len() {
            tracing::warn!(
                expected = records.len(),
                inserted,
                "push notification batch insert was short"
            );
        }

        // Rows are written in input order, so the count identifies the saved prefix.
        Ok(records[..inserted.min(records.len())].to_vec())
    }

    fn find_by_context(&self, context_id: &str) -> color_eyre::eyre::Result<Vec<PushRecord>> {
        let mut conn = self.conn()?;

        let rows: Vec<PushNotificationRow> = push_notifications::table
            .filter(push_notifications::context_id.eq(context_id))
            .order(push_notifications::id.asc())
            .select(PushNotificationRow::as_select())
            .load(&mut conn)
            .wrap_err("failed to load push notifications")?;

        Ok(rows.into_iter().map(PushRecord::from).collect())
    }
}

impl DeviceStore for SqliteStorage {
    fn find_by_uid_and_context(
        &self,
        uid: i32,
        context_id: &str,
    ) -> color_eyre::eyre::Result<Option<DeviceRecord>> {
        let mut conn = self.conn()?;

        let result: Option<DeviceDetailsRow> = device_details::table
            .filter(device_details::uid.eq(uid))
            .filter(device_details::context_id.eq(context_id))
            .select(DeviceDetailsRow::as_select())
            .first(&mut conn)
            .optional()
            .wrap_err("failed to find device details")?;

        Ok(result.map(DeviceRecord::from))
    }

    fn save_one(&self, record: &DeviceRecord) -> color_eyre::eyre::Result<DeviceRecord> {
        let mut conn = self.conn()?;
        let now = chrono::Utc::now().naive_utc();

        upsert_device(&mut conn, record, now).wrap_err("failed to save device details")?;

        Ok(record.clone())
    }

    fn save_many(&self, records: &[DeviceRecord]) -> color_eyre::eyre::Result<Vec<DeviceRecord>> {
        let mut conn = self.conn()?;
        let conn: &mut SqliteConnection = &mut conn;
        let now = chrono::Utc::now().naive_utc();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for record in records {
                upsert_device(conn, record, now)?;
            }
            Ok(())
        })
        .wrap_err("failed to save device details batch")?;

        Ok(records.to_vec())
    }
}
