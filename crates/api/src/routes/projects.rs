//! Route definitions for projects addressed directly by id.
//!
//! Create/list live under `/campaigns/{id}/projects`; the character-scoped
//! listing lives under `/characters/{id}/projects`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /{id}            get_by_id (?include_history=&include_children=)
/// PUT    /{id}            update (fields and parent; validator consulted)
/// DELETE /{id}            delete (soft, appends history)
/// POST   /{id}/progress   update_progress (then auto-complete check)
/// POST   /{id}/complete   complete (manual)
/// GET    /{id}/history    list_history (newest first)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/progress", post(projects::update_progress))
        .route("/{id}/complete", post(projects::complete))
        .route("/{id}/history", get(projects::list_history))
}
