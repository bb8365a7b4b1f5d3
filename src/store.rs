use std::str::FromStr;

use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tracing::debug;

use crate::models::{Booking, BookingReceipt, FitnessClass, NewClass};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Class {0} not found")]
    ClassNotFound(i64),
    #[error("Class {0} has no slots available")]
    SlotsExhausted(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

const CLASS_COLUMNS: &str = "id, name, dateTime, instructor, availableSlots";
const BOOKING_COLUMNS: &str = "id, class_id, client_name, client_email";

/// Process-wide handle to the `fitnessclasses` / `bookings` tables.
///
/// Cloning is cheap: clones share the same connection pool. Each query checks
/// a connection out of the pool and returns it when done.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens the pool and creates the schema if it is missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // An in-memory database lives and dies with its connection, so the
        // pool must hold exactly one and never recycle it.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS fitnessclasses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                dateTime TEXT NOT NULL,
                instructor TEXT NOT NULL,
                availableSlots INTEGER NOT NULL CHECK (availableSlots >= 0)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                class_id INTEGER NOT NULL,
                client_name TEXT NOT NULL,
                client_email TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_client_email ON bookings(client_email)")
            .execute(&self.pool)
            .await?;

        debug!("Schema ready");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn insert_class(&self, class: &NewClass) -> Result<FitnessClass, StoreError> {
        let inserted = sqlx::query_as::<_, FitnessClass>(&format!(
            "INSERT INTO fitnessclasses (name, dateTime, instructor, availableSlots) \
             VALUES (?, ?, ?, ?) RETURNING {CLASS_COLUMNS}"
        ))
        .bind(&class.name)
        .bind(class.date_time)
        .bind(&class.instructor)
        .bind(class.available_slots)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    pub async fn class_by_id(&self, class_id: i64) -> Result<Option<FitnessClass>, StoreError> {
        let class = sqlx::query_as::<_, FitnessClass>(&format!(
            "SELECT {CLASS_COLUMNS} FROM fitnessclasses WHERE id = ?"
        ))
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(class)
    }

    pub async fn all_classes(&self) -> Result<Vec<FitnessClass>, StoreError> {
        let classes = sqlx::query_as::<_, FitnessClass>(&format!(
            "SELECT {CLASS_COLUMNS} FROM fitnessclasses ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(classes)
    }

    /// Classes scheduled strictly after `after`.
    pub async fn classes_after(
        &self,
        after: NaiveDateTime,
    ) -> Result<Vec<FitnessClass>, StoreError> {
        let classes = sqlx::query_as::<_, FitnessClass>(&format!(
            "SELECT {CLASS_COLUMNS} FROM fitnessclasses WHERE dateTime > ? ORDER BY id"
        ))
        .bind(after)
        .fetch_all(&self.pool)
        .await?;
        Ok(classes)
    }

    pub async fn bookings_by_email(&self, email: &str) -> Result<Vec<Booking>, StoreError> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE client_email = ? ORDER BY id"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// Takes one slot of `class_id` and records the booking in one transaction.
    ///
    /// The decrement is a conditional update issued as the transaction's first
    /// statement, so the write lock is held across check, decrement and insert.
    /// Any early return drops the transaction, which rolls it back.
    pub async fn book_class(
        &self,
        class_id: i64,
        client_name: &str,
        client_email: &str,
    ) -> Result<BookingReceipt, StoreError> {
        let mut tx = self.pool.begin().await?;

        let remaining: Option<i64> = sqlx::query_scalar(
            "UPDATE fitnessclasses SET availableSlots = availableSlots - 1 \
             WHERE id = ? AND availableSlots > 0 RETURNING availableSlots",
        )
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(remaining_slots) = remaining else {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM fitnessclasses WHERE id = ?")
                .bind(class_id)
                .fetch_optional(&mut *tx)
                .await?;
            tx.rollback().await?;
            return Err(match exists {
                Some(_) => StoreError::SlotsExhausted(class_id),
                None => StoreError::ClassNotFound(class_id),
            });
        };

        let booking = sqlx::query_as::<_, Booking>(&format!(
            "INSERT INTO bookings (class_id, client_name, client_email) \
             VALUES (?, ?, ?) RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(class_id)
        .bind(client_name)
        .bind(client_email)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(BookingReceipt {
            booking,
            remaining_slots,
        })
    }
}
