use crate::database::connection::DbPool;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Email {email} is already registered")]
    EmailTaken { email: String },
    #[error("Password hashing failed")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Provider,
    Manager,
    Driver,
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "provider" => Ok(UserRole::Provider),
            "manager" => Ok(UserRole::Manager),
            "driver" => Ok(UserRole::Driver),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub establishment_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

impl User {
    pub async fn create(pool: &DbPool, user: CreateUser) -> Result<Self, UserError> {
        let email = user.email.to_lowercase();
        if Self::find_by_email(pool, &email).await?.is_some() {
            return Err(UserError::EmailTaken { email });
        }

        let now = Utc::now();
        let hashed_password = hash(user.password.as_bytes(), DEFAULT_COST)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, phone, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
            .bind(Uuid::new_v4())
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(email)
            .bind(hashed_password)
            .bind(user.phone)
            .bind(user.role)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn find_all(pool: &DbPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;

        Ok(users)
    }

    pub async fn find_manager_of(
        pool: &DbPool,
        establishment_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = 'manager' AND establishment_id = $1",
        )
        .bind(establishment_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn toggle_active(pool: &DbPool, id: Uuid) -> Result<Self, UserError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET is_active = NOT is_active, updated_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(UserError::NotFound { id })?;

        Ok(user)
    }

    /// Promotes a user to manager of the given establishment.
    pub async fn assign_as_manager(
        pool: &DbPool,
        id: Uuid,
        establishment_id: Uuid,
    ) -> Result<Self, UserError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET role = 'manager', establishment_id = $2, updated_at = $3
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(establishment_id)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(UserError::NotFound { id })?;

        Ok(user)
    }

    pub fn verify_password(&self, password: &str) -> Result<bool, bcrypt::BcryptError> {
        verify(password, &self.password_hash)
    }

    pub async fn authenticate(
        pool: &DbPool,
        email: &str,
        password: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        if let Some(user) = Self::find_by_email(pool, &email.to_lowercase()).await? {
            if user.is_active && user.verify_password(password).unwrap_or(false) {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }
}
