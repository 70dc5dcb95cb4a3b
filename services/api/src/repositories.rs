//! Repositories for database operations
//!
//! Each method acquires a scoped connection from the pool for the duration
//! of a single statement; sqlx returns the connection on every exit path,
//! so no connection outlives a request.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{RegisterRequest, User};

pub mod opportunity;

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user, hashing the password when one is supplied
    ///
    /// Fails with `Conflict` when the name is already taken.
    pub async fn create(&self, payload: &RegisterRequest) -> ApiResult<User> {
        info!("Creating new user: {}", payload.name);

        let password_hash = match &payload.password {
            Some(password) => {
                let salt = SaltString::generate(&mut rand::thread_rng());
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| {
                        error!("Failed to hash password: {}", e);
                        ApiError::InternalServerError
                    })?
                    .to_string();
                Some(hash)
            }
            None => None,
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, password_hash)
            VALUES ($1, $2)
            RETURNING id, name, password_hash, token, created_at, updated_at
            "#,
        )
        .bind(&payload.name)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// List all users
    pub async fn get_all(&self) -> ApiResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password_hash, token, created_at, updated_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Find a user by name
    pub async fn find_by_name(&self, name: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password_hash, token, created_at, updated_at
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password_hash, token, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find the user currently holding a session token
    pub async fn find_by_token(&self, token: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password_hash, token, created_at, updated_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Store a user's current session token, overwriting any prior token
    ///
    /// A single-row update; concurrent logins by the same user are
    /// last-writer-wins.
    pub async fn store_token(&self, user_id: Uuid, token: &str) -> ApiResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET token = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("user not found".to_string()));
        }

        Ok(())
    }

    /// Verify a user's password against the stored argon2 hash
    ///
    /// Users registered without a password can never authenticate.
    pub fn verify_password(&self, user: &User, password: &str) -> ApiResult<bool> {
        let Some(stored_hash) = &user.password_hash else {
            return Ok(false);
        };

        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            error!("Failed to parse stored password hash: {}", e);
            ApiError::InternalServerError
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
