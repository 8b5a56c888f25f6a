//! Profile store service — owner-scoped profile reads and writes.

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::profile::{Profile, ProfileData};
use agrinet_core::repository::ProfileRepository;
use tracing::info;
use uuid::Uuid;

pub struct ProfileService<P: ProfileRepository> {
    profile_repo: P,
}

impl<P: ProfileRepository> ProfileService<P> {
    pub fn new(profile_repo: P) -> Self {
        Self { profile_repo }
    }

    /// `NotFound` until the first save.
    pub async fn get_profile(&self, user_id: Uuid) -> AgrinetResult<Profile> {
        self.profile_repo.get_by_user(user_id).await
    }

    /// Replace the profile wholesale. Skills and experience are the
    /// complete desired collections: an empty list empties the stored
    /// collection. Ownership is enforced by the caller binding
    /// `user_id` to the resolved session.
    pub async fn upsert_profile(&self, user_id: Uuid, data: ProfileData) -> AgrinetResult<Profile> {
        if data.title.trim().is_empty() {
            return Err(AgrinetError::Validation {
                message: "title must not be empty".into(),
            });
        }
        for skill in &data.skills {
            if skill.name.trim().is_empty() {
                return Err(AgrinetError::Validation {
                    message: "skill name must not be empty".into(),
                });
            }
        }
        for exp in &data.experience {
            match (exp.still_active, exp.end_date) {
                (true, Some(_)) => {
                    return Err(AgrinetError::InvalidDateRange {
                        reason: format!("active position '{}' cannot have an end date", exp.position),
                    });
                }
                (false, None) => {
                    return Err(AgrinetError::InvalidDateRange {
                        reason: format!("finished position '{}' requires an end date", exp.position),
                    });
                }
                (false, Some(end)) if end < exp.start_date => {
                    return Err(AgrinetError::InvalidDateRange {
                        reason: format!("position '{}' ends before it starts", exp.position),
                    });
                }
                _ => {}
            }
        }

        let profile = self.profile_repo.upsert(user_id, data).await?;
        info!(user_id = %user_id, "Profile saved");
        Ok(profile)
    }
}
