//! Route definitions for encounters addressed directly by id.
//!
//! Create/list live under `/campaigns/{id}/encounters`.

use axum::routing::get;
use axum::Router;

use crate::handlers::encounters;
use crate::state::AppState;

/// Routes mounted at `/encounters`.
///
/// ```text
/// GET    /{id}   get_by_id
/// PUT    /{id}   update (GM)
/// DELETE /{id}   delete (GM, soft)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(encounters::get_by_id)
            .put(encounters::update)
            .delete(encounters::delete),
    )
}
