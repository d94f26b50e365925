use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use super::model::{Project, ProjectInput, ProjectView};
use crate::users::model::User;
use crate::{
    auth::{clock::Clock, guard::ensure_owner},
    error::{AppError, AppResult},
    store::{ProjectRepo, UserRepo},
};

pub async fn create_project(
    repo: &dyn ProjectRepo,
    clock: &dyn Clock,
    owner_id: Uuid,
    input: &ProjectInput,
) -> AppResult<Project> {
    let changes = input.validate_new()?;
    let now = clock.now();
    let mut project = Project {
        id: Uuid::new_v4(),
        title: String::new(),
        description: String::new(),
        tech_stack: Vec::new(),
        github_url: None,
        demo_url: None,
        owner_id,
        collaborators: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    changes.apply(&mut project);
    repo.insert(&project).await?;
    info!(project_id = %project.id, %owner_id, "project created");
    Ok(project)
}

/// A valid token whose subject has no user record cannot own anything.
pub async fn require_existing_owner(users: &dyn UserRepo, owner_id: Uuid) -> AppResult<User> {
    users.find_by_id(owner_id).await?.ok_or_else(|| {
        warn!(%owner_id, "token subject has no user record");
        AppError::Unauthenticated("User not found".into())
    })
}

/// Loads the project and checks ownership; missing projects fail before the
/// ownership comparison.
pub async fn load_owned(repo: &dyn ProjectRepo, requester: Uuid, project_id: Uuid) -> AppResult<Project> {
    let project = repo
        .find_by_id(project_id)
        .await?
        .ok_or(AppError::NotFound("Project"))?;
    ensure_owner(requester, project.owner_id)?;
    Ok(project)
}

pub async fn update_project(
    repo: &dyn ProjectRepo,
    clock: &dyn Clock,
    requester: Uuid,
    project_id: Uuid,
    input: &ProjectInput,
) -> AppResult<Project> {
    let project = load_owned(repo, requester, project_id).await?;
    apply_update(repo, clock, project, input).await
}

/// Second half of [`update_project`] for a project already returned by [`load_owned`].
pub async fn apply_update(
    repo: &dyn ProjectRepo,
    clock: &dyn Clock,
    mut project: Project,
    input: &ProjectInput,
) -> AppResult<Project> {
    let project_id = project.id;
    input.validate_changes()?.apply(&mut project);
    project.updated_at = clock.now();

    let saved = repo.update(&project).await?.ok_or_else(|| {
        warn!(%project_id, "project vanished during update");
        AppError::NotFound("Project")
    })?;
    info!(%project_id, owner_id = %saved.owner_id, "project updated");
    Ok(saved)
}

pub async fn delete_project(repo: &dyn ProjectRepo, requester: Uuid, project_id: Uuid) -> AppResult<()> {
    load_owned(repo, requester, project_id).await?;
    if !repo.delete(project_id).await? {
        return Err(AppError::NotFound("Project"));
    }
    info!(%project_id, %requester, "project deleted");
    Ok(())
}

/// Attaches owner name/email to each project.
pub async fn with_owners(users: &dyn UserRepo, projects: Vec<Project>) -> AppResult<Vec<ProjectView>> {
    let mut ids: Vec<Uuid> = projects.iter().map(|p| p.owner_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let owners: HashMap<Uuid, _> = users
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(projects
        .into_iter()
        .map(|p| {
            let owner = owners.get(&p.owner_id);
            ProjectView::new(p, owner)
        })
        .collect())
}
