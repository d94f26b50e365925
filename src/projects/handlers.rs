use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::{
    model::{ProjectInput, ProjectView},
    service::{
        apply_update, create_project, delete_project, load_owned, require_existing_owner,
        with_owners,
    },
};
use crate::{
    auth::extractors::AuthUser,
    config::parse_list,
    discovery::matches_any_tag,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create))
        .route("/projects/search", get(search_by_tech))
        .route("/projects/user/:user_id", get(list_user_projects))
        .route(
            "/projects/:id",
            get(get_project).put(update).delete(delete),
        )
}

#[derive(Debug, Deserialize)]
pub struct TechSearch {
    pub tech: Option<String>,
}

#[instrument(skip(state))]
pub async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Vec<ProjectView>>> {
    let projects = state.projects.list().await?;
    Ok(Json(with_owners(state.users.as_ref(), projects).await?))
}

/// Projects whose tech stack contains any of the comma-separated `tech` values.
#[instrument(skip(state))]
pub async fn search_by_tech(
    State(state): State<AppState>,
    query: Result<Query<TechSearch>, QueryRejection>,
) -> AppResult<Json<Vec<ProjectView>>> {
    let Query(params) = query?;
    let wanted = params.tech.as_deref().map(parse_list).unwrap_or_default();
    if wanted.is_empty() {
        return Err(AppError::BadRequest("Tech parameter is required".into()));
    }
    let projects = state
        .projects
        .list()
        .await?
        .into_iter()
        .filter(|p| matches_any_tag(&p.tech_stack, &wanted))
        .collect();
    Ok(Json(with_owners(state.users.as_ref(), projects).await?))
}

#[instrument(skip(state))]
pub async fn list_user_projects(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Vec<ProjectView>>> {
    let Path(user_id) = path?;
    let projects = state.projects.list_by_owner(user_id).await?;
    Ok(Json(with_owners(state.users.as_ref(), projects).await?))
}

#[instrument(skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ProjectView>> {
    let Path(id) = path?;
    let project = state
        .projects
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Project"))?;
    let mut views = with_owners(state.users.as_ref(), vec![project]).await?;
    views.pop().map(Json).ok_or(AppError::NotFound("Project"))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> AppResult<(StatusCode, HeaderMap, Json<ProjectView>)> {
    let owner = require_existing_owner(state.users.as_ref(), user_id).await?;
    let Json(input) = payload?;
    let project = create_project(state.projects.as_ref(), state.clock.as_ref(), user_id, &input).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/projects/{}", project.id)) {
        headers.insert(LOCATION, location);
    }
    Ok((
        StatusCode::CREATED,
        headers,
        Json(ProjectView::new(project, Some(&owner))),
    ))
}

#[instrument(skip(state, path, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> AppResult<Json<ProjectView>> {
    let Path(id) = path?;
    // body errors surface only once the caller is known to own the project
    let project = load_owned(state.projects.as_ref(), user_id, id).await?;
    let Json(input) = payload?;
    let project = apply_update(state.projects.as_ref(), state.clock.as_ref(), project, &input).await?;
    // the write already happened; a failed owner lookup only drops the summary
    let owner = state.users.find_by_id(project.owner_id).await.unwrap_or_else(|e| {
        warn!(error = %e, project_id = %project.id, "owner lookup failed after update");
        None
    });
    Ok(Json(ProjectView::new(project, owner.as_ref())))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Value>> {
    let Path(id) = path?;
    delete_project(state.projects.as_ref(), user_id, id).await?;
    Ok(Json(json!({ "message": "Project deleted" })))
}
