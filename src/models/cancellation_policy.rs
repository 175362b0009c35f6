use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CancellationPolicyError {
    #[error("Cancellation policy with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CancellationPolicy {
    pub id: Uuid,
    pub short_description: Option<String>,
    pub rules: serde_json::Value,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateCancellationPolicy {
    pub short_description: Option<String>,
    pub rules: serde_json::Value,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCancellationPolicy {
    pub short_description: Option<String>,
    pub rules: Option<serde_json::Value>,
}

impl CancellationPolicy {
    pub async fn create(
        pool: &DbPool,
        policy: CreateCancellationPolicy,
    ) -> Result<Self, CancellationPolicyError> {
        let now = Utc::now();

        let policy = sqlx::query_as::<_, CancellationPolicy>(
            "INSERT INTO cancellation_policies (id, short_description, rules, created_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
            .bind(Uuid::new_v4())
            .bind(policy.short_description)
            .bind(policy.rules)
            .bind(policy.created_by)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await?;

        Ok(policy)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let policy = sqlx::query_as::<_, CancellationPolicy>(
            "SELECT * FROM cancellation_policies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(policy)
    }

    pub async fn find_all(pool: &DbPool) -> Result<Vec<Self>, sqlx::Error> {
        let policies = sqlx::query_as::<_, CancellationPolicy>(
            "SELECT * FROM cancellation_policies ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(policies)
    }

    pub async fn find_by_creator(pool: &DbPool, created_by: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let policies = sqlx::query_as::<_, CancellationPolicy>(
            "SELECT * FROM cancellation_policies WHERE created_by = $1 ORDER BY created_at DESC",
        )
        .bind(created_by)
        .fetch_all(pool)
        .await?;

        Ok(policies)
    }

    pub async fn update(
        pool: &DbPool,
        id: Uuid,
        update_data: UpdateCancellationPolicy,
    ) -> Result<Self, CancellationPolicyError> {
        let policy = sqlx::query_as::<_, CancellationPolicy>(
            "UPDATE cancellation_policies
             SET short_description = COALESCE($2, short_description),
                 rules = COALESCE($3, rules),
                 updated_at = $4
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update_data.short_description)
        .bind(update_data.rules)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(CancellationPolicyError::NotFound { id })?;

        Ok(policy)
    }

    pub async fn delete(pool: &DbPool, id: Uuid) -> Result<(), CancellationPolicyError> {
        let result = sqlx::query("DELETE FROM cancellation_policies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CancellationPolicyError::NotFound { id });
        }

        Ok(())
    }
}
