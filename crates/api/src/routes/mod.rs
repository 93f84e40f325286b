pub mod auth;
pub mod campaigns;
pub mod characters;
pub mod encounters;
pub mod health;
pub mod projects;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
/// /auth/me                            current user
///
/// /campaigns                          list, create
/// /campaigns/{id}                     get, update, delete
/// /campaigns/{id}/members             list, add
/// /campaigns/{id}/members/{user_id}   remove
/// /campaigns/{id}/encounters          list, create
/// /campaigns/{id}/projects            list (flat or tree), create
///
/// /characters                         list, create
/// /characters/{id}                    get, update, delete
/// /characters/{id}/projects           character's projects
///
/// /encounters/{id}                    get, update, delete
///
/// /projects/{id}                      get (with rollup), update, delete
/// /projects/{id}/progress             record progress (POST)
/// /projects/{id}/complete             mark completed (POST)
/// /projects/{id}/history              audit trail (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/campaigns", campaigns::router())
        .nest("/characters", characters::router())
        .nest("/encounters", encounters::router())
        .nest("/projects", projects::router())
}
