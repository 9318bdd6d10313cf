use crate::db::models::{FeedbackRecord, RatingSummary};
use crate::db::schema::SQLITE_INIT;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Settings key holding the current admin password.
pub const ADMIN_PASSWORD_KEY: &str = "admin_password";

/// Open the SQLite database behind `database_url`, creating the file if
/// it does not exist yet.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct FeedbackStorage {
    pool: SqlitePool,
}

impl FeedbackStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema and seed the admin password setting when it
    /// is absent. Safe to call on every startup.
    pub async fn init_schema(&self, default_admin_password: &str) -> Result<(), AppError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        if self.get_setting(ADMIN_PASSWORD_KEY).await?.is_none() {
            self.set_setting(ADMIN_PASSWORD_KEY, default_admin_password)
                .await?;
        }
        Ok(())
    }

    /// Append a record with a store-assigned timestamp. Returns the new
    /// row id. Rating range checks are the caller's responsibility.
    pub async fn insert_feedback(
        &self,
        rating: i64,
        comment: &str,
        name: &str,
        email: &str,
    ) -> Result<i64, AppError> {
        let created_at = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO feedback (rating, comment, name, email, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(rating)
        .bind(comment)
        .bind(name)
        .bind(email)
        .bind(created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// All records, most recent first. `id` breaks ties between rows
    /// sharing a timestamp so the ordering is strict.
    pub async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, rating, comment, name, email, created_at
               FROM feedback ORDER BY created_at DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, AppError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    /// Upsert: overwrites any existing value for the key.
    pub async fn set_setting(&self, key: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// One-pass aggregate counters over the feedback table.
    pub async fn rating_summary(&self) -> Result<RatingSummary, AppError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE rating >= 4) AS positive,
                   COUNT(*) FILTER (WHERE rating = 3) AS medium,
                   COUNT(*) FILTER (WHERE rating <= 2) AS negative,
                   AVG(rating) AS average
            FROM feedback
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(RatingSummary {
            total: row.try_get("total")?,
            positive: row.try_get("positive")?,
            medium: row.try_get("medium")?,
            negative: row.try_get("negative")?,
            average: row.try_get("average")?,
        })
    }

    /// Count per rating value, highest rating first. Ratings with no
    /// records are omitted.
    pub async fn rating_distribution(&self) -> Result<Vec<(i64, i64)>, AppError> {
        let rows = sqlx::query_as::<_, (i64, i64)>(
            "SELECT rating, COUNT(*) FROM feedback GROUP BY rating ORDER BY rating DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    fn row_to_model(row: SqliteRow) -> Result<FeedbackRecord, AppError> {
        let id: i64 = row.try_get("id")?;
        let rating: i64 = row.try_get("rating")?;
        let comment: String = row.try_get("comment")?;
        let name: String = row.try_get("name")?;
        let email: String = row.try_get("email")?;
        let created_at_str: String = row.try_get("created_at")?;
        let created_at: DateTime<Utc> = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(FeedbackRecord {
            id,
            rating,
            comment,
            name,
            email,
            created_at,
        })
    }
}
