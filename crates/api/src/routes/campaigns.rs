//! Route definitions for campaigns and their nested sub-resources
//! (members, encounters, projects).

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{campaigns, encounters, projects};
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET    /                          list (caller's campaigns)
/// POST   /                          create (creator becomes GM)
/// GET    /{id}                      get_by_id
/// PUT    /{id}                      update (GM)
/// DELETE /{id}                      delete (GM, soft)
///
/// GET    /{id}/members              list_members
/// POST   /{id}/members              add_member (GM)
/// DELETE /{id}/members/{user_id}    remove_member (GM)
///
/// GET    /{id}/encounters           list
/// POST   /{id}/encounters           create (GM)
///
/// GET    /{id}/projects             list (?view=tree|flat&include_deleted=&include_completed=)
/// POST   /{id}/projects             create (validator consulted)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaigns::list).post(campaigns::create))
        .route(
            "/{id}",
            get(campaigns::get_by_id)
                .put(campaigns::update)
                .delete(campaigns::delete),
        )
        .route(
            "/{id}/members",
            get(campaigns::list_members).post(campaigns::add_member),
        )
        .route(
            "/{id}/members/{user_id}",
            delete(campaigns::remove_member),
        )
        .route(
            "/{id}/encounters",
            get(encounters::list).post(encounters::create),
        )
        .route(
            "/{id}/projects",
            get(projects::list_by_campaign).post(projects::create),
        )
}
