use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{filter, TagSelection};
use crate::{
    config::parse_list,
    error::AppResult,
    projects::{model::ProjectView, service::with_owners},
    state::AppState,
    users::model::PublicUser,
};

pub fn discovery_routes() -> Router<AppState> {
    Router::new()
        .route("/discover/users", get(discover_users))
        .route("/discover/projects", get(discover_projects))
}

/// `q` is the name/title search; `tags` is a comma-separated list that must all match.
#[derive(Debug, Default, Deserialize)]
pub struct DiscoverParams {
    #[serde(default)]
    pub q: String,
    pub tags: Option<String>,
}

impl DiscoverParams {
    fn selection(&self) -> TagSelection {
        self.tags.as_deref().map(parse_list).unwrap_or_default().into_iter().collect()
    }
}

#[instrument(skip(state))]
pub async fn discover_users(
    State(state): State<AppState>,
    query: Result<Query<DiscoverParams>, QueryRejection>,
) -> AppResult<Json<Vec<PublicUser>>> {
    let Query(params) = query?;
    let users = state.users.list().await?;
    let tags = params.selection();
    let matched: Vec<PublicUser> = filter(&users, &params.q, tags.as_slice())
        .into_iter()
        .cloned()
        .map(PublicUser::from)
        .collect();
    debug!(total = users.len(), matched = matched.len(), "users filtered");
    Ok(Json(matched))
}

#[instrument(skip(state))]
pub async fn discover_projects(
    State(state): State<AppState>,
    query: Result<Query<DiscoverParams>, QueryRejection>,
) -> AppResult<Json<Vec<ProjectView>>> {
    let Query(params) = query?;
    let projects = state.projects.list().await?;
    let total = projects.len();
    let tags = params.selection();
    let matched = filter(&projects, &params.q, tags.as_slice())
        .into_iter()
        .cloned()
        .collect();
    let views = with_owners(state.users.as_ref(), matched).await?;
    debug!(total, matched = views.len(), "projects filtered");
    Ok(Json(views))
}
