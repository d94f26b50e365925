use axum::Router;

use crate::state::AppState;

pub mod handlers;
pub mod model;
pub mod service;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
