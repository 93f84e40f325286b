//! HTTP-level integration tests for the project hierarchy, progress, and
//! history endpoints.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use loreforge_core::types::DbId;
use sqlx::PgPool;

/// Seed a GM with a campaign and a character, returning
/// `(token, campaign_id, character_id, gm_user_id)`.
async fn seed_world(pool: &PgPool) -> (String, DbId, DbId, DbId) {
    let (gm, token) = common::seed_user(pool, "gm").await;
    let campaign_id = common::seed_campaign(pool, "The Long Road", gm.id).await;
    let character_id = common::seed_character(pool, campaign_id, gm.id).await;
    (token, campaign_id, character_id, gm.id)
}

/// Create a project through the API and return its id.
async fn create_project(
    app: Router,
    token: &str,
    campaign_id: DbId,
    character_id: DbId,
    name: &str,
    goal: i32,
    parent: Option<DbId>,
) -> DbId {
    let body = serde_json::json!({
        "character_id": character_id,
        "name": name,
        "goal_points": goal,
        "parent_project_id": parent,
    });
    let response = post_json_auth(
        app,
        &format!("/api/v1/campaigns/{campaign_id}/projects"),
        token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["id"].as_i64().expect("created project must have an id")
}

// ---------------------------------------------------------------------------
// Creation and hierarchy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_project_appends_created_history(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let id = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "Forge a sword",
        10,
        None,
    )
    .await;

    let response = get_auth(app, &format!("/api/v1/projects/{id}/history"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "created");
    assert_eq!(entries[0]["new_points"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn nesting_beyond_max_depth_is_rejected(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    // A chain of six projects reaches depths 0 through 5.
    let mut parent = None;
    for level in 0..6 {
        let id = create_project(
            app.clone(),
            &token,
            campaign_id,
            character_id,
            &format!("level-{level}"),
            10,
            parent,
        )
        .await;
        parent = Some(id);
    }

    // A seventh level would put the child at depth 6.
    let body = serde_json::json!({
        "character_id": character_id,
        "name": "too-deep",
        "goal_points": 10,
        "parent_project_id": parent,
    });
    let response = post_json_auth(
        app,
        &format!("/api/v1/campaigns/{campaign_id}/projects"),
        &token,
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(
        json["error"].as_str().unwrap().contains("depth"),
        "error should name the depth limit: {json}"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reparenting_under_own_descendant_is_rejected(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let root = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "root",
        10,
        None,
    )
    .await;
    let child = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "child",
        10,
        Some(root),
    )
    .await;
    let grandchild = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "grandchild",
        10,
        Some(child),
    )
    .await;

    let body = serde_json::json!({ "parent_project_id": grandchild });
    let response = put_json_auth(app, &format!("/api/v1/projects/{root}"), &token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn self_parent_is_rejected(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let id = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "loner",
        10,
        None,
    )
    .await;

    let body = serde_json::json!({ "parent_project_id": id });
    let response = put_json_auth(app, &format!("/api/v1/projects/{id}"), &token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn detaching_to_root_with_explicit_null(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let root = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "root",
        10,
        None,
    )
    .await;
    let child = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "child",
        10,
        Some(root),
    )
    .await;

    let body = serde_json::json!({ "parent_project_id": null });
    let response =
        put_json_auth(app.clone(), &format!("/api/v1/projects/{child}"), &token, body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["parent_project_id"].is_null());
}

// ---------------------------------------------------------------------------
// Progress and auto-completion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn reaching_goal_auto_completes(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let id = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "quest",
        10,
        None,
    )
    .await;

    let body = serde_json::json!({ "points": 10 });
    let response =
        post_json_auth(app.clone(), &format!("/api/v1/projects/{id}/progress"), &token, body)
            .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["auto_completed"], true);
    assert_eq!(json["is_completed"], true);
    assert!(json["completed_at"].is_string());

    // Both the progress update and the completion are on the audit trail.
    let response = get_auth(app, &format!("/api/v1/projects/{id}/history"), &token).await;
    let json = body_json(response).await;
    let actions: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["completed", "updated_progress", "created"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn auto_complete_fires_exactly_once(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let id = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "one-shot",
        10,
        None,
    )
    .await;

    let body = serde_json::json!({ "points": 10 });
    let response =
        post_json_auth(app.clone(), &format!("/api/v1/projects/{id}/progress"), &token, body)
            .await;
    let json = body_json(response).await;
    assert_eq!(json["auto_completed"], true);
    let completed_at = json["completed_at"].as_str().unwrap().to_string();

    // A further update at the goal must not complete again or move the
    // completion timestamp.
    let body = serde_json::json!({ "points": 10 });
    let response =
        post_json_auth(app.clone(), &format!("/api/v1/projects/{id}/progress"), &token, body)
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["auto_completed"], false);
    assert_eq!(json["is_completed"], true);
    assert_eq!(json["completed_at"], completed_at.as_str());

    let response = get_auth(app, &format!("/api/v1/projects/{id}/history"), &token).await;
    let json = body_json(response).await;
    let completions = json
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["action"] == "completed")
        .count();
    assert_eq!(completions, 1, "completion must be recorded exactly once");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn increments_accumulate_and_complete(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let id = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "stages",
        10,
        None,
    )
    .await;

    let body = serde_json::json!({ "points": 4, "is_increment": true });
    let response =
        post_json_auth(app.clone(), &format!("/api/v1/projects/{id}/progress"), &token, body)
            .await;
    let json = body_json(response).await;
    assert_eq!(json["current_points"], 4);
    assert_eq!(json["auto_completed"], false);

    let body = serde_json::json!({ "points": 6, "is_increment": true });
    let response =
        post_json_auth(app, &format!("/api/v1/projects/{id}/progress"), &token, body).await;
    let json = body_json(response).await;
    assert_eq!(json["current_points"], 10);
    assert_eq!(json["auto_completed"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn progress_beyond_goal_is_rejected_not_clamped(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let id = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "bounded",
        10,
        None,
    )
    .await;

    let body = serde_json::json!({ "points": 11 });
    let response =
        post_json_auth(app.clone(), &format!("/api/v1/projects/{id}/progress"), &token, body)
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The stored value did not move on the failed update.
    let response = get_auth(app, &format!("/api/v1/projects/{id}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["current_points"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn aggregate_rolls_up_the_subtree(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let root = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "root",
        10,
        None,
    )
    .await;
    let child = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "child",
        5,
        Some(root),
    )
    .await;
    let _grandchild = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "grandchild",
        5,
        Some(child),
    )
    .await;

    let body = serde_json::json!({ "points": 5 });
    post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{root}/progress"),
        &token,
        body,
    )
    .await;
    let body = serde_json::json!({ "points": 5 });
    post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{child}/progress"),
        &token,
        body,
    )
    .await;

    let response = get_auth(app, &format!("/api/v1/projects/{root}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["aggregate"]["total_goal_points"], 20);
    assert_eq!(json["aggregate"]["total_current_points"], 10);
    assert_eq!(json["aggregate"]["total_percentage"], 50);
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn tree_view_nests_children(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let root = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "root",
        10,
        None,
    )
    .await;
    let child = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "child",
        10,
        Some(root),
    )
    .await;

    let response = get_auth(
        app,
        &format!("/api/v1/campaigns/{campaign_id}/projects?view=tree"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let forest = json.as_array().unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0]["id"], root);
    assert_eq!(forest[0]["children"][0]["id"], child);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn detail_can_include_children_subtree(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let root = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "root",
        10,
        None,
    )
    .await;
    let child = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "child",
        10,
        Some(root),
    )
    .await;

    let response = get_auth(
        app,
        &format!("/api/v1/projects/{root}?include_children=true"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["children"][0]["id"], child);
    assert!(
        json["children"][0]["character_name"].is_string(),
        "descendants carry their character's name"
    );
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn non_member_sees_not_found(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let (_outsider, outsider_token) = common::seed_user(&pool, "outsider").await;
    let app = common::build_test_app(pool);

    let id = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "hidden",
        10,
        None,
    )
    .await;

    let response = get_auth(app, &format!("/api/v1/projects/{id}"), &outsider_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn member_without_ownership_can_view_but_not_edit(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let (player, player_token) = common::seed_user(&pool, "player").await;
    common::seed_player(&pool, campaign_id, player.id).await;
    let app = common::build_test_app(pool);

    let id = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "gm-project",
        10,
        None,
    )
    .await;

    let response = get_auth(app.clone(), &format!("/api/v1/projects/{id}"), &player_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = serde_json::json!({ "points": 5 });
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{id}/progress"),
        &player_token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_hides_project_but_keeps_history(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let id = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "doomed",
        10,
        None,
    )
    .await;

    let response = delete_auth(app.clone(), &format!("/api/v1/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &format!("/api/v1/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, &format!("/api/v1/projects/{id}/history"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json[0]["action"], "deleted");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completing_twice_conflicts(pool: PgPool) {
    let (token, campaign_id, character_id, _) = seed_world(&pool).await;
    let app = common::build_test_app(pool);

    let id = create_project(
        app.clone(),
        &token,
        campaign_id,
        character_id,
        "once",
        10,
        None,
    )
    .await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{id}/complete"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{id}/complete"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
