use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                   // assigned at registration, immutable
    pub name: String,               // display name
    pub email: String,              // unique
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 hash, not exposed in JSON
    pub created_at: OffsetDateTime, // creation timestamp
}

/// Candidate identity submitted at registration, before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial-update projection: `None` or an empty string leaves the stored
/// field unchanged, never clears it.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserUpdate {
    /// Folds whitespace-only strings into `None` so "absent" and "empty"
    /// behave the same.
    pub fn normalized(self) -> Self {
        let clean = |field: Option<String>| field.filter(|v| !v.trim().is_empty());
        Self {
            name: clean(self.name),
            email: clean(self.email),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_drops_empty_and_whitespace_fields() {
        let update = UserUpdate {
            name: Some("  ".into()),
            email: Some("".into()),
        }
        .normalized();
        assert!(update.is_empty());

        let update = UserUpdate {
            name: Some("Alice".into()),
            email: None,
        }
        .normalized();
        assert_eq!(update.name.as_deref(), Some("Alice"));
        assert!(update.email.is_none());
    }
}
