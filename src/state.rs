use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::auth::jwt::TokenKeys;
use crate::config::AppConfig;
use crate::users::repo::{PgUserRepository, UserRepository};
use crate::users::services::UserService;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub users: UserService,
    pub keys: TokenKeys,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let keys = TokenKeys::from_secret(&config.jwt.secret);
        let repo: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(db.clone()));
        let users = UserService::new(repo, keys.clone());

        Ok(Self { db, users, keys })
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
