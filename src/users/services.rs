use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::auth::jwt::TokenKeys;
use crate::auth::password::hash_password;
use crate::errors::{ServiceError, ServiceResult};
use crate::users::repo::UserRepository;
use crate::users::repo_types::{NewUser, User, UserUpdate};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Orchestrates repository lookups, password hashing and token issuance.
///
/// Uniqueness checks here are check-then-act against the repository: two
/// concurrent registrations can both pass the lookup, and the storage-level
/// unique index is what actually closes the race (see `PgUserRepository`).
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    keys: TokenKeys,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: TokenKeys) -> Self {
        Self { repo, keys }
    }

    pub(crate) fn repository(&self) -> Arc<dyn UserRepository> {
        Arc::clone(&self.repo)
    }

    /// Creates a user and returns a signed token for the new identity. The
    /// plaintext password and the stored hash are never returned.
    pub async fn register(&self, candidate: NewUser) -> ServiceResult<String> {
        if candidate.name.trim().is_empty() {
            return Err(ServiceError::Validation("name cannot be empty".into()));
        }
        if !is_valid_email(&candidate.email) {
            return Err(ServiceError::Validation("invalid email".into()));
        }
        if candidate.password.len() < 8 {
            return Err(ServiceError::Validation("password too short".into()));
        }

        if self.repo.find_by_email(&candidate.email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = hash_password(&candidate.password)?;
        let user = User {
            id: Uuid::new_v4(),
            name: candidate.name,
            email: candidate.email,
            password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        self.repo.save(&user).await?;

        let token = self.keys.issue(user.id, &user.name, &user.email)?;
        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(token)
    }

    pub async fn get_by_id(&self, id: Uuid) -> ServiceResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Returns every user. Ordering is whatever storage gives back.
    pub async fn get_all(&self) -> ServiceResult<Vec<User>> {
        self.repo.find_all().await
    }

    /// Applies a partial update. Rejected only when the update carries
    /// neither a name nor an email.
    pub async fn update(&self, id: Uuid, edits: UserUpdate) -> ServiceResult<()> {
        let edits = edits.normalized();
        if edits.is_empty() {
            return Err(ServiceError::Validation(
                "name and email cannot both be empty".into(),
            ));
        }

        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if let Some(email) = &edits.email {
            if !is_valid_email(email) {
                return Err(ServiceError::Validation("invalid email".into()));
            }
            if *email != current.email {
                if let Some(other) = self.repo.find_by_email(email).await? {
                    if other.id != id {
                        return Err(ServiceError::DuplicateEmail);
                    }
                }
            }
        }

        self.repo.update_fields(id, &edits).await?;
        info!(user_id = %id, "user updated");
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ServiceError::NotFound);
        }
        self.repo.delete(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
