use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, warn};

use crate::{
    auth::{
        clock::{Clock, SystemClock},
        jwt::JwtKeys,
    },
    config::AppConfig,
    store::{MemoryStore, PgStore, ProjectRepo, UserRepo},
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub projects: Arc<dyn ProjectRepo>,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub clock: Arc<dyn Clock>,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let state = match config.database_url.as_deref() {
            Some(url) => {
                let store = Arc::new(PgStore::connect(url).await?);
                if let Err(e) = store.migrate().await {
                    warn!(error = %e, "migration failed; continuing");
                }
                info!("using postgres store");
                Self::from_parts(config, store.clone(), store, clock)
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
                let store = Arc::new(MemoryStore::new());
                Self::from_parts(config, store.clone(), store, clock)
            }
        };
        Ok(state)
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserRepo>,
        projects: Arc<dyn ProjectRepo>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let jwt = JwtKeys::new(&config.jwt, clock.clone());
        Self {
            users,
            projects,
            config: Arc::new(config),
            jwt,
            clock,
        }
    }

    /// In-memory state for tests.
    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with_clock(Arc::new(SystemClock))
    }

    #[cfg(test)]
    pub fn fake_with_clock(clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(AppConfig::for_tests(), store.clone(), store, clock)
    }
}
