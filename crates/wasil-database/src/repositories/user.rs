//! User repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use wasil_core::error::ErrorKind;
use wasil_core::types::UserId;
use wasil_core::{AppError, AppResult};
use wasil_entity::user::User;

use super::persistence;
use crate::store::{UserStore, VerificationToken};

#[derive(Debug, FromRow)]
struct UserRow {
    id: UserId,
    email: String,
    password_hash: String,
    name: String,
    phone: Option<String>,
    country: Option<String>,
    address: Option<String>,
    photo_url: Option<String>,
    plan: String,
    role: String,
    email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            phone: row.phone,
            country: row.country,
            address: row.address,
            photo_url: row.photo_url,
            plan: row.plan.parse()?,
            role: row.role.parse()?,
            email_verified: row.email_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct VerificationRow {
    token_hash: String,
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

/// Repository for `users` and `email_verifications`.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, phone, country, address, photo_url, \
             plan, role, email_verified, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.country)
        .bind(&user.address)
        .bind(&user.photo_url)
        .bind(user.plan.as_str())
        .bind(user.role.as_str())
        .bind(user.email_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let duplicate =
                matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
            if duplicate {
                AppError::with_source(ErrorKind::Conflict, "Email is already registered", e)
            } else {
                AppError::with_source(ErrorKind::Persistence, "Failed to insert user", e)
            }
        })?;
        Ok(())
    }

    async fn find(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence("Failed to find user"))?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence("Failed to find user by email"))?
            .map(User::try_from)
            .transpose()
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, phone = $3, country = $4, address = $5, photo_url = $6, \
             plan = $7, role = $8, email_verified = $9, password_hash = $10, updated_at = $11 \
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.country)
        .bind(&user.address)
        .bind(&user.photo_url)
        .bind(user.plan.as_str())
        .bind(user.role.as_str())
        .bind(user.email_verified)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(persistence("Failed to update user"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {} not found", user.id)));
        }
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(persistence("Failed to list users"))?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn insert_verification(&self, token: &VerificationToken) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO email_verifications (token_hash, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(&token.token_hash)
        .bind(token.user_id)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(persistence("Failed to store verification token"))?;
        Ok(())
    }

    async fn take_verification(&self, token_hash: &str) -> AppResult<Option<VerificationToken>> {
        let row = sqlx::query_as::<_, VerificationRow>(
            "DELETE FROM email_verifications WHERE token_hash = $1 \
             RETURNING token_hash, user_id, expires_at",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence("Failed to consume verification token"))?;

        Ok(row.map(|r| VerificationToken {
            token_hash: r.token_hash,
            user_id: r.user_id,
            expires_at: r.expires_at,
        }))
    }
}
