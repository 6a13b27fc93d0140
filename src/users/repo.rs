use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::{ServiceError, ServiceResult};
use crate::users::repo_types::{User, UserUpdate};

/// Port for durable user storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: &User) -> ServiceResult<()>;
    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>>;
    async fn find_all(&self) -> ServiceResult<Vec<User>>;
    async fn update_fields(&self, id: Uuid, fields: &UserUpdate) -> ServiceResult<()>;
    async fn delete(&self, id: Uuid) -> ServiceResult<()>;
    async fn count(&self) -> ServiceResult<i64>;
}

/// Postgres-backed repository.
///
/// The unique index on `users.email` has the final word on the uniqueness
/// invariant; a write that loses the check-then-act race in the service
/// still comes back as `DuplicateEmail`.
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_sqlx(err: sqlx::Error) -> ServiceError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return ServiceError::DuplicateEmail;
        }
    }
    ServiceError::Repository(err.into())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn save(&self, user: &User) -> ServiceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(user)
    }

    // No ORDER BY: callers must not depend on ordering.
    async fn find_all(&self) -> ServiceResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(users)
    }

    async fn update_fields(&self, id: Uuid, fields: &UserUpdate) -> ServiceResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.email)
        .execute(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn count(&self) -> ServiceResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM users"#)
            .fetch_one(&self.db)
            .await
            .map_err(map_sqlx)?;
        Ok(count)
    }
}
