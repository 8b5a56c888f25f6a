//! Peer reviews — star ratings attached to users.

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::review::{CreateReview, Review};
use agrinet_core::repository::{ReviewRepository, UserRepository};
use tracing::info;
use uuid::Uuid;

pub struct ReviewService<R: ReviewRepository, U: UserRepository> {
    review_repo: R,
    user_repo: U,
}

impl<R: ReviewRepository, U: UserRepository> ReviewService<R, U> {
    pub fn new(review_repo: R, user_repo: U) -> Self {
        Self {
            review_repo,
            user_repo,
        }
    }

    /// Create a review authored by `reviewer`. The reviewed user must
    /// be a real account; the optional service link is stored as
    /// given.
    pub async fn create_review(
        &self,
        reviewer: Uuid,
        input: CreateReview,
    ) -> AgrinetResult<Review> {
        if !(1..=5).contains(&input.rating) {
            return Err(AgrinetError::InvalidRange {
                reason: "rating must be between 1 and 5 stars".into(),
            });
        }
        if input.reviewed_user_id == reviewer {
            return Err(AgrinetError::InvalidSubject {
                reason: "reviewer cannot review themselves".into(),
            });
        }
        self.user_repo.get_by_id(input.reviewed_user_id).await?;

        let review = self.review_repo.create(reviewer, input).await?;
        info!(
            review_id = %review.id,
            reviewer_id = %reviewer,
            reviewed_user_id = %review.reviewed_user_id,
            "Review created"
        );
        Ok(review)
    }

    /// Reviews received by the user, newest first. Anonymous-readable.
    pub async fn list_for_user(&self, user_id: Uuid) -> AgrinetResult<Vec<Review>> {
        self.review_repo.list_by_user(user_id).await
    }
}
