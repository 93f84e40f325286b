//! Integration tests for project soft-delete visibility.
//!
//! Verifies that:
//! - Deleted projects are hidden from default campaign listings
//! - `include_deleted = true` surfaces them again
//! - History remains retrievable after deletion
//! - Soft-delete is idempotent (second call returns `false`)

mod common;

use common::{seed_campaign, seed_character, seed_user, ProjectSeed};
use sqlx::PgPool;

use loreforge_core::history::actions;
use loreforge_db::models::project::CreateHistoryEntry;
use loreforge_db::repositories::{ProjectHistoryRepo, ProjectRepo};

#[sqlx::test]
async fn deleted_projects_are_hidden_from_default_listing(pool: PgPool) {
    let gm = seed_user(&pool, "gm").await;
    let campaign = seed_campaign(&pool, &gm, "Visibility").await;
    let character = seed_character(&pool, &gm, Some(campaign.id)).await;
    let seed = ProjectSeed {
        campaign: &campaign,
        character: &character,
        creator: &gm,
    };

    let kept = seed.project(&pool, "kept", None, 10, 0).await;
    let doomed = seed.project(&pool, "doomed", None, 10, 0).await;

    assert!(ProjectRepo::soft_delete(&pool, doomed.id).await.unwrap());

    let visible = ProjectRepo::find_by_campaign(&pool, campaign.id, false)
        .await
        .unwrap();
    let visible_ids: Vec<_> = visible.iter().map(|p| p.id).collect();
    assert_eq!(visible_ids, vec![kept.id]);

    let all = ProjectRepo::find_by_campaign(&pool, campaign.id, true)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|p| p.id == doomed.id && p.is_deleted));
}

#[sqlx::test]
async fn history_survives_deletion(pool: PgPool) {
    let gm = seed_user(&pool, "gm").await;
    let campaign = seed_campaign(&pool, &gm, "History").await;
    let character = seed_character(&pool, &gm, Some(campaign.id)).await;
    let seed = ProjectSeed {
        campaign: &campaign,
        character: &character,
        creator: &gm,
    };

    let project = seed.project(&pool, "quest", None, 10, 0).await;
    ProjectHistoryRepo::create(
        &pool,
        &CreateHistoryEntry {
            project_id: project.id,
            user_id: gm.id,
            action: actions::CREATED,
            previous_points: None,
            new_points: Some(0),
            notes: None,
        },
    )
    .await
    .unwrap();

    assert!(ProjectRepo::soft_delete(&pool, project.id).await.unwrap());

    let history = ProjectHistoryRepo::list_by_project(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, actions::CREATED);

    // The row itself stays addressable when deleted rows are included.
    let row = ProjectRepo::find_by_id_include_deleted(&pool, project.id)
        .await
        .unwrap()
        .expect("row still present");
    assert!(row.is_deleted);
    assert!(ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test]
async fn soft_delete_is_idempotent(pool: PgPool) {
    let gm = seed_user(&pool, "gm").await;
    let campaign = seed_campaign(&pool, &gm, "Idempotent").await;
    let character = seed_character(&pool, &gm, Some(campaign.id)).await;
    let seed = ProjectSeed {
        campaign: &campaign,
        character: &character,
        creator: &gm,
    };

    let project = seed.project(&pool, "quest", None, 10, 0).await;

    assert!(ProjectRepo::soft_delete(&pool, project.id).await.unwrap());
    assert!(!ProjectRepo::soft_delete(&pool, project.id).await.unwrap());
}
