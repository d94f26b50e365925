use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ProjectRepo, StoreError, StoreResult, UserRepo};
use crate::{projects::model::Project, users::model::User};

/// Process-local store. Vectors keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    projects: RwLock<Vec<Project>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut projects: Vec<Project>) -> Vec<Project> {
    // reverse first so the stable sort keeps later inserts ahead on equal timestamps
    projects.reverse();
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    projects
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        Ok(users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        Ok(users.clone())
    }

    async fn update(&self, user: &User) -> StoreResult<Option<User>> {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        let Some(slot) = users.iter_mut().find(|u| u.id == user.id) else {
            return Ok(None);
        };
        let updated = User {
            id: slot.id,
            email: slot.email.clone(),
            password_hash: slot.password_hash.clone(),
            created_at: slot.created_at,
            ..user.clone()
        };
        *slot = updated.clone();
        Ok(Some(updated))
    }
}

#[async_trait]
impl ProjectRepo for MemoryStore {
    async fn insert(&self, project: &Project) -> StoreResult<()> {
        let mut projects = self.projects.write().unwrap_or_else(|e| e.into_inner());
        projects.push(project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let projects = self.projects.read().unwrap_or_else(|e| e.into_inner());
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Project>> {
        let projects = self.projects.read().unwrap_or_else(|e| e.into_inner());
        Ok(newest_first(projects.clone()))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Project>> {
        let projects = self.projects.read().unwrap_or_else(|e| e.into_inner());
        let owned = projects
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(newest_first(owned))
    }

    async fn update(&self, project: &Project) -> StoreResult<Option<Project>> {
        let mut projects = self.projects.write().unwrap_or_else(|e| e.into_inner());
        let Some(slot) = projects.iter_mut().find(|p| p.id == project.id) else {
            return Ok(None);
        };
        let updated = Project {
            owner_id: slot.owner_id,
            created_at: slot.created_at,
            ..project.clone()
        };
        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut projects = self.projects.write().unwrap_or_else(|e| e.into_inner());
        let before = projects.len();
        projects.retain(|p| p.id != id);
        Ok(projects.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;
    use crate::{projects::model::sample_project, users::model::sample_user};

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let ada = sample_user("Ada", &[]);
        UserRepo::insert(&store, &ada).await.unwrap();

        let mut twin = sample_user("Ada", &[]);
        twin.name = "Other Ada".into();
        let err = UserRepo::insert(&store, &twin).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
    }

    #[tokio::test]
    async fn project_update_never_moves_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let project = sample_project("X", &["Go"], owner);
        ProjectRepo::insert(&store, &project).await.unwrap();

        let mut hijack = project.clone();
        hijack.owner_id = Uuid::new_v4();
        hijack.title = "Y".into();
        let saved = ProjectRepo::update(&store, &hijack).await.unwrap().unwrap();

        assert_eq!(saved.owner_id, owner);
        assert_eq!(saved.title, "Y");
    }

    #[tokio::test]
    async fn list_is_newest_first_and_delete_removes() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let mut old = sample_project("old", &[], owner);
        old.created_at -= Duration::hours(1);
        let new = sample_project("new", &[], owner);
        ProjectRepo::insert(&store, &old).await.unwrap();
        ProjectRepo::insert(&store, &new).await.unwrap();
        ProjectRepo::insert(&store, &sample_project("other", &[], Uuid::new_v4()))
            .await
            .unwrap();

        let titles: Vec<_> = store
            .list_by_owner(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["new", "old"]);

        assert!(ProjectRepo::delete(&store, old.id).await.unwrap());
        assert!(!ProjectRepo::delete(&store, old.id).await.unwrap());
        assert_eq!(ProjectRepo::find_by_id(&store, old.id).await.unwrap(), None);
        assert!(ProjectRepo::update(&store, &old).await.unwrap().is_none());
    }
}
