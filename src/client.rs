//! Async HTTP client for the DevLinkUp JSON API.
//!
//! Holds the bearer token after signup or login and attaches it to every
//! request until [`ApiClient::clear_token`] is called.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::{AuthResponse, LoginRequest, SignupRequest},
    discovery::DiscoveryView,
    projects::model::{ProjectInput, ProjectView},
    users::model::{ProfileUpdate, PublicUser},
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; `message` is the server's `message` field when present.
    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Logs out locally.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        let message = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body["message"].as_str().map(str::to_owned))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_owned());
        Err(ClientError::Api { status, message })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let resp = self.authorize(self.client.get(self.url(path))).send().await?;
        Self::decode(resp).await
    }

    // auth

    /// `POST /api/auth/signup`; stores the returned token.
    pub async fn signup(&mut self, req: &SignupRequest) -> ClientResult<PublicUser> {
        let resp = self.client.post(self.url("/auth/signup")).json(req).send().await?;
        let auth: AuthResponse = Self::decode(resp).await?;
        self.token = Some(auth.token);
        Ok(auth.user)
    }

    /// `POST /api/auth/login`; stores the returned token.
    pub async fn login(&mut self, req: &LoginRequest) -> ClientResult<PublicUser> {
        let resp = self.client.post(self.url("/auth/login")).json(req).send().await?;
        let auth: AuthResponse = Self::decode(resp).await?;
        self.token = Some(auth.token);
        Ok(auth.user)
    }

    pub async fn me(&self) -> ClientResult<PublicUser> {
        self.get("/auth/me").await
    }

    // users

    pub async fn list_users(&self) -> ClientResult<Vec<PublicUser>> {
        self.get("/users").await
    }

    pub async fn get_user(&self, id: Uuid) -> ClientResult<PublicUser> {
        self.get(&format!("/users/{id}")).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<PublicUser> {
        let req = self.client.put(self.url("/users/profile")).json(update);
        Self::decode(self.authorize(req).send().await?).await
    }

    // projects

    pub async fn list_projects(&self) -> ClientResult<Vec<ProjectView>> {
        self.get("/projects").await
    }

    pub async fn get_project(&self, id: Uuid) -> ClientResult<ProjectView> {
        self.get(&format!("/projects/{id}")).await
    }

    pub async fn user_projects(&self, user_id: Uuid) -> ClientResult<Vec<ProjectView>> {
        self.get(&format!("/projects/user/{user_id}")).await
    }

    pub async fn create_project(&self, input: &ProjectInput) -> ClientResult<ProjectView> {
        let req = self.client.post(self.url("/projects")).json(input);
        Self::decode(self.authorize(req).send().await?).await
    }

    pub async fn update_project(&self, id: Uuid, input: &ProjectInput) -> ClientResult<ProjectView> {
        let req = self.client.put(self.url(&format!("/projects/{id}"))).json(input);
        Self::decode(self.authorize(req).send().await?).await
    }

    pub async fn delete_project(&self, id: Uuid) -> ClientResult<()> {
        let req = self.client.delete(self.url(&format!("/projects/{id}")));
        let _: serde_json::Value = Self::decode(self.authorize(req).send().await?).await?;
        Ok(())
    }

    // discovery

    /// Fetches users and projects concurrently into a fresh [`DiscoveryView`].
    /// Fails if either request fails.
    pub async fn load_discovery(&self) -> ClientResult<DiscoveryView> {
        let (users, projects) = tokio::try_join!(self.list_users(), self.list_projects())?;
        Ok(DiscoveryView::new(users, projects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::build_app, discovery::DiscoveryTab, state::AppState};

    async fn spawn_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_app(AppState::fake());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn project(title: &str, tech: &[&str]) -> ProjectInput {
        ProjectInput {
            title: Some(title.into()),
            description: Some("desc".into()),
            tech_stack: Some(tech.iter().map(|t| t.to_string()).collect()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn signup_create_and_discover() {
        let base = spawn_server().await;
        let mut client = ApiClient::new(&base).unwrap();

        let me = client
            .signup(&SignupRequest {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                password: "Secret123".into(),
            })
            .await
            .unwrap();
        assert!(client.token().is_some());
        assert_eq!(client.me().await.unwrap().id, me.id);

        client
            .update_profile(&ProfileUpdate {
                skills: Some(vec!["Rust".into()]),
                ..Default::default()
            })
            .await
            .unwrap();
        let created = client.create_project(&project("Linker", &["Rust"])).await.unwrap();
        assert_eq!(created.owner.id, me.id);
        assert_eq!(client.user_projects(me.id).await.unwrap().len(), 1);
        assert_eq!(client.get_user(me.id).await.unwrap().skills, vec!["Rust"]);

        let renamed = client
            .update_project(
                created.id,
                &ProjectInput {
                    title: Some("Linker 2".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.tech_stack, vec!["Rust"]);

        let mut view = client.load_discovery().await.unwrap();
        view.toggle_tag("Rust");
        assert_eq!(view.visible_count(), 1);
        view.tab = DiscoveryTab::Projects;
        view.set_search("link");
        assert_eq!(view.visible_count(), 1);

        client.delete_project(created.id).await.unwrap();
        match client.get_project(created.id).await {
            Err(ClientError::Api { status, .. }) => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn anonymous_mutation_is_unauthorized() {
        let base = spawn_server().await;
        let mut client = ApiClient::new(&base).unwrap().with_token("garbage");
        match client.me().await {
            Err(ClientError::Api { status, .. }) => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("unexpected {other:?}"),
        }
        client.clear_token();

        match client.create_project(&project("X", &[])).await {
            Err(ClientError::Api { status, .. }) => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("unexpected {other:?}"),
        }

        let err = client
            .login(&LoginRequest {
                email: "nobody@example.com".into(),
                password: "Secret123".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "401 Unauthorized: Invalid credentials");
    }
}
