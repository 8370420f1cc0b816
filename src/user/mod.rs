pub mod user_models;
pub mod user_repository;

use crate::error::Result;
use axum::async_trait;
use uuid::Uuid;

pub use user_models::UserProfile;
pub use user_repository::UserRepository;

/// Read-only access to the profiles owned by the identity subsystem.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    /// Profiles for the given ids. Unknown ids are skipped; order is unspecified.
    async fn find_profiles(&self, user_ids: &[Uuid]) -> Result<Vec<UserProfile>>;
}
