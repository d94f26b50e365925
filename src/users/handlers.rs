use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use super::{
    model::{ProfileUpdate, PublicUser},
    service::update_profile,
};
use crate::{
    auth::{extractors::AuthUser, guard::require_owner},
    config::parse_list,
    discovery::matches_any_tag,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/search", get(search_by_skills))
        .route("/users/profile", put(update_own_profile))
        .route("/users/:id", get(get_user).put(update_user))
}

#[derive(Debug, Deserialize)]
pub struct SkillSearch {
    pub skills: Option<String>,
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<PublicUser>>> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

/// Users having any of the comma-separated `skills` values.
#[instrument(skip(state))]
pub async fn search_by_skills(
    State(state): State<AppState>,
    query: Result<Query<SkillSearch>, QueryRejection>,
) -> AppResult<Json<Vec<PublicUser>>> {
    let Query(params) = query?;
    let wanted = params.skills.as_deref().map(parse_list).unwrap_or_default();
    if wanted.is_empty() {
        return Err(AppError::BadRequest("Skills parameter is required".into()));
    }
    let users = state
        .users
        .list()
        .await?
        .into_iter()
        .filter(|u| matches_any_tag(&u.skills, &wanted))
        .map(PublicUser::from)
        .collect();
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<PublicUser>> {
    let Path(id) = path?;
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_own_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> AppResult<Json<PublicUser>> {
    let Json(update) = payload?;
    let user = update_profile(state.users.as_ref(), state.clock.as_ref(), user_id, &update).await?;
    Ok(Json(user.into()))
}

/// The path id is the owner; only that user may edit the profile.
#[instrument(skip(state, path, headers, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> AppResult<Json<PublicUser>> {
    let Path(id) = path?;
    let user_id = require_owner(&headers, &state.jwt, id)?;
    let Json(update) = payload?;
    let user = update_profile(state.users.as_ref(), state.clock.as_ref(), user_id, &update).await?;
    Ok(Json(user.into()))
}
