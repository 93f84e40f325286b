//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod campaign_member_repo;
pub mod campaign_repo;
pub mod character_repo;
pub mod encounter_repo;
pub mod project_history_repo;
pub mod project_repo;
pub mod user_repo;

pub use campaign_member_repo::CampaignMemberRepo;
pub use campaign_repo::CampaignRepo;
pub use character_repo::CharacterRepo;
pub use encounter_repo::EncounterRepo;
pub use project_history_repo::ProjectHistoryRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
