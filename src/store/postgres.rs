use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{ProjectRepo, StoreError, StoreResult, UserRepo};
use crate::{projects::model::Project, users::model::User};

const USER_COLUMNS: &str = "id, name, email, password_hash, bio, location, website, github, \
                            linkedin, twitter, skills, interests, created_at, updated_at";

const PROJECT_COLUMNS: &str = "id, title, description, tech_stack, github_url, demo_url, \
                               owner_id, collaborators, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pub db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

fn map_unique(e: sqlx::Error, field: &'static str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(field),
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl UserRepo for PgStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, bio, location, website, github,
                               linkedin, twitter, skills, interests, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.bio)
        .bind(&user.location)
        .bind(&user.website)
        .bind(&user.github)
        .bind(&user.linkedin)
        .bind(&user.twitter)
        .bind(&user.skills)
        .bind(&user.interests)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| map_unique(e, "email"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn update(&self, user: &User) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = $2, bio = $3, location = $4, website = $5, github = $6,
                   linkedin = $7, twitter = $8, skills = $9, interests = $10, updated_at = $11
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.location)
        .bind(&user.website)
        .bind(&user.github)
        .bind(&user.linkedin)
        .bind(&user.twitter)
        .bind(&user.skills)
        .bind(&user.interests)
        .bind(user.updated_at)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl ProjectRepo for PgStore {
    async fn insert(&self, project: &Project) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, title, description, tech_stack, github_url, demo_url,
                                  owner_id, collaborators, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.tech_stack)
        .bind(&project.github_url)
        .bind(&project.demo_url)
        .bind(project.owner_id)
        .bind(&project.collaborators)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(project)
    }

    async fn list(&self) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(projects)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(projects)
    }

    async fn update(&self, project: &Project) -> StoreResult<Option<Project>> {
        // owner_id is never written after insert
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
               SET title = $2, description = $3, tech_stack = $4, github_url = $5,
                   demo_url = $6, updated_at = $7
             WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.tech_stack)
        .bind(&project.github_url)
        .bind(&project.demo_url)
        .bind(project.updated_at)
        .fetch_optional(&self.db)
        .await?;
        Ok(project)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
