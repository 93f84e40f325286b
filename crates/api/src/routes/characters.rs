//! Route definitions for characters.

use axum::routing::get;
use axum::Router;

use crate::handlers::characters;
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /                 list (caller's characters)
/// POST   /                 create
/// GET    /{id}             get_by_id
/// PUT    /{id}             update
/// DELETE /{id}             delete (soft)
/// GET    /{id}/projects    list_projects
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(characters::list).post(characters::create))
        .route(
            "/{id}",
            get(characters::get_by_id)
                .put(characters::update)
                .delete(characters::delete),
        )
        .route("/{id}/projects", get(characters::list_projects))
}
