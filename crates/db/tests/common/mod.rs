//! Shared seed helpers for repository integration tests.
//!
//! Each `#[sqlx::test]` runs against a fresh database with migrations
//! applied, so fixed names are safe.

use loreforge_core::types::DbId;
use sqlx::PgPool;

use loreforge_db::models::campaign::{Campaign, CreateCampaign};
use loreforge_db::models::character::{Character, CreateCharacter};
use loreforge_db::models::project::{CreateProject, Project};
use loreforge_db::models::user::{CreateUser, User};
use loreforge_db::repositories::{CampaignRepo, CharacterRepo, ProjectRepo, UserRepo};

pub async fn seed_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$test".to_string(),
        },
    )
    .await
    .expect("seed user")
}

pub async fn seed_campaign(pool: &PgPool, gm: &User, name: &str) -> Campaign {
    CampaignRepo::create(
        pool,
        &CreateCampaign {
            name: name.to_string(),
            description: None,
        },
        gm.id,
    )
    .await
    .expect("seed campaign")
}

pub async fn seed_character(pool: &PgPool, owner: &User, campaign_id: Option<DbId>) -> Character {
    CharacterRepo::create(
        pool,
        &CreateCharacter {
            name: format!("{}'s character", owner.username),
            campaign_id,
        },
        owner.id,
    )
    .await
    .expect("seed character")
}

pub struct ProjectSeed<'a> {
    pub campaign: &'a Campaign,
    pub character: &'a Character,
    pub creator: &'a User,
}

impl ProjectSeed<'_> {
    pub async fn project(
        &self,
        pool: &PgPool,
        name: &str,
        parent: Option<DbId>,
        goal: i32,
        current: i32,
    ) -> Project {
        ProjectRepo::create(
            pool,
            &CreateProject {
                campaign_id: self.campaign.id,
                parent_project_id: parent,
                character_id: self.character.id,
                name: name.to_string(),
                description: None,
                goal_points: goal,
                current_points: Some(current),
                created_by_user_id: self.creator.id,
            },
        )
        .await
        .expect("seed project")
    }
}
