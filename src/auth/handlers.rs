use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, SignupRequest},
        extractors::AuthUser,
        password::{hash_blocking, verify_blocking},
    },
    error::{AppError, AppResult},
    state::AppState,
    store::StoreError,
    users::model::{PublicUser, User},
    validation::{is_strong_password, is_valid_email, ValidationErrors},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let Json(payload) = payload?;
    let email = payload.email.trim().to_lowercase();

    let mut errors = ValidationErrors::new();
    let name = errors.required("name", &payload.name);
    if !is_valid_email(&email) {
        errors.push("email", "Please enter a valid email");
    }
    if !is_strong_password(&payload.password) {
        errors.push(
            "password",
            "Password must be at least 8 characters and contain uppercase, lowercase and a number",
        );
    }
    if let Err(errors) = errors.into_result() {
        warn!(email = %email, "signup rejected by validation");
        return Err(errors.into());
    }

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_blocking(payload.password).await?;
    let now = state.clock.now();
    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        password_hash,
        bio: String::new(),
        location: String::new(),
        website: None,
        github: None,
        linkedin: None,
        twitter: None,
        skills: Vec::new(),
        interests: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    match state.users.insert(&user).await {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            // lost a race with a concurrent signup for the same address
            return Err(AppError::Conflict("User already exists".into()));
        }
        Err(e) => return Err(e.into()),
    }

    let token = state.jwt.issue(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let email = payload.email.trim().to_lowercase();
    let invalid = || AppError::Unauthenticated("Invalid credentials".into());

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(invalid());
    };
    if !verify_blocking(payload.password, user.password_hash.clone()).await? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    let token = state.jwt.issue(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(%user_id, "token subject no longer exists");
        AppError::Unauthenticated("User not found".into())
    })?;
    Ok(Json(user.into()))
}
