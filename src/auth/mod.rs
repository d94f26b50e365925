use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod clock;
mod dto;
pub mod extractors;
pub mod guard;
pub mod handlers;
pub mod jwt;
pub mod password;

pub use dto::{AuthResponse, LoginRequest, SignupRequest};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
