//! Database repository for key/value and review storage.

use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::Review;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== KEY/VALUE OPERATIONS ====================

    pub async fn get_value(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("value")))
    }

    pub async fn put_value(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ==================== REVIEW OPERATIONS ====================

    pub async fn list_reviews(&self) -> Result<Vec<Review>, AppError> {
        let rows = sqlx::query(
            "SELECT id, trail_id, author, rating, comment, date, helpful FROM reviews ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(review_from_row).collect())
    }

    pub async fn insert_review(&self, review: &Review) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO reviews (id, trail_id, author, rating, comment, date, helpful) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(review.id)
        .bind(review.trail_id)
        .bind(&review.author)
        .bind(review.rating as i64)
        .bind(&review.comment)
        .bind(review.date.to_string())
        .bind(review.helpful as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert many reviews in one transaction.
    pub async fn insert_reviews(&self, reviews: &[Review]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for review in reviews {
            sqlx::query(
                "INSERT OR IGNORE INTO reviews (id, trail_id, author, rating, comment, date, helpful) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(review.id)
            .bind(review.trail_id)
            .bind(&review.author)
            .bind(review.rating as i64)
            .bind(&review.comment)
            .bind(review.date.to_string())
            .bind(review.helpful as i64)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_helpful(&self, review_id: i64, helpful: u32) -> Result<(), AppError> {
        sqlx::query("UPDATE reviews SET helpful = ? WHERE id = ?")
            .bind(helpful as i64)
            .bind(review_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Rows with an unreadable date or out-of-range rating are dropped.
fn review_from_row(row: &sqlx::sqlite::SqliteRow) -> Option<Review> {
    let id: i64 = row.get("id");
    let date_str: String = row.get("date");
    let rating: i64 = row.get("rating");
    let helpful: i64 = row.get("helpful");

    let date = match NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!("Skipping review {} with bad date {:?}: {}", id, date_str, e);
            return None;
        }
    };

    Some(Review {
        id,
        trail_id: row.get("trail_id"),
        author: row.get("author"),
        rating: u8::try_from(rating).ok()?,
        comment: row.get("comment"),
        date,
        helpful: u32::try_from(helpful).unwrap_or(0),
    })
}
