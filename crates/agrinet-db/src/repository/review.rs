//! SurrealDB implementation of [`ReviewRepository`].

use agrinet_core::error::AgrinetResult;
use agrinet_core::models::review::{CreateReview, Review};
use agrinet_core::repository::ReviewRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ReviewRow {
    record_id: String,
    reviewer_id: String,
    reviewed_user_id: String,
    service_id: Option<String>,
    rating: i64,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl ReviewRow {
    fn try_into_review(self) -> Result<Review, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let reviewer_id = Uuid::parse_str(&self.reviewer_id)
            .map_err(|e| DbError::Corrupt(format!("invalid reviewer UUID: {e}")))?;
        let reviewed_user_id = Uuid::parse_str(&self.reviewed_user_id)
            .map_err(|e| DbError::Corrupt(format!("invalid subject UUID: {e}")))?;
        let service_id = self
            .service_id
            .map(|s| Uuid::parse_str(&s))
            .transpose()
            .map_err(|e| DbError::Corrupt(format!("invalid service UUID: {e}")))?;
        let rating = u8::try_from(self.rating)
            .map_err(|_| DbError::Corrupt(format!("rating out of range: {}", self.rating)))?;
        Ok(Review {
            id,
            reviewer_id,
            reviewed_user_id,
            service_id,
            rating,
            comment: self.comment,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Review repository.
#[derive(Clone)]
pub struct SurrealReviewRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealReviewRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ReviewRepository for SurrealReviewRepository<C> {
    async fn create(&self, reviewer_id: Uuid, input: CreateReview) -> AgrinetResult<Review> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('review', $id) SET \
                 reviewer_id = $reviewer_id, \
                 reviewed_user_id = $reviewed_user_id, \
                 service_id = $service_id, \
                 rating = $rating, \
                 comment = $comment",
            )
            .bind(("id", id_str.clone()))
            .bind(("reviewer_id", reviewer_id.to_string()))
            .bind(("reviewed_user_id", input.reviewed_user_id.to_string()))
            .bind(("service_id", input.service_id.map(|s| s.to_string())))
            .bind(("rating", i64::from(input.rating)))
            .bind(("comment", input.comment))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('review', $id)",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<ReviewRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "review".into(),
            id: id_str,
        })?;

        Ok(row.try_into_review()?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> AgrinetResult<Vec<Review>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM review \
                 WHERE reviewed_user_id = $user_id ORDER BY created_at DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReviewRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|r| r.try_into_review().map_err(Into::into))
            .collect()
    }
}
