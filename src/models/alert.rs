use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

pub mod status {
    pub const PENDING: &str = "pending";
    pub const ACKNOWLEDGED: &str = "acknowledged";
    pub const RESOLVED: &str = "resolved";
}

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Alert with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub slot_id: Uuid,
    pub reporter_id: Uuid,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub viewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreateAlert {
    pub establishment_id: Uuid,
    pub slot_id: Uuid,
    pub reporter_id: Uuid,
    pub message: Option<String>,
}

impl Alert {
    pub async fn create(pool: &DbPool, alert: CreateAlert) -> Result<Self, AlertError> {
        let alert = sqlx::query_as::<_, Alert>(
            "INSERT INTO alerts (id, establishment_id, slot_id, reporter_id, message, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
            .bind(Uuid::new_v4())
            .bind(alert.establishment_id)
            .bind(alert.slot_id)
            .bind(alert.reporter_id)
            .bind(alert.message)
            .bind(status::PENDING)
            .bind(Utc::now())
            .fetch_one(pool)
            .await?;

        Ok(alert)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let alert = sqlx::query_as::<_, Alert>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(alert)
    }

    pub async fn find_by_establishment(
        pool: &DbPool,
        establishment_id: Uuid,
        status: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let alerts = match status {
            Some(status) => {
                sqlx::query_as::<_, Alert>(
                    "SELECT * FROM alerts WHERE establishment_id = $1 AND status = $2
                     ORDER BY created_at DESC LIMIT $3",
                )
                .bind(establishment_id)
                .bind(status)
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Alert>(
                    "SELECT * FROM alerts WHERE establishment_id = $1
                     ORDER BY created_at DESC LIMIT $2",
                )
                .bind(establishment_id)
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(alerts)
    }

    pub async fn mark_viewed(pool: &DbPool, id: Uuid) -> Result<Self, AlertError> {
        let alert = sqlx::query_as::<_, Alert>(
            "UPDATE alerts SET viewed_at = COALESCE(viewed_at, $2) WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(AlertError::NotFound { id })?;

        Ok(alert)
    }

    pub async fn update_status(pool: &DbPool, id: Uuid, status: &str) -> Result<Self, AlertError> {
        let alert =
            sqlx::query_as::<_, Alert>("UPDATE alerts SET status = $2 WHERE id = $1 RETURNING *")
                .bind(id)
                .bind(status)
                .fetch_optional(pool)
                .await?
                .ok_or(AlertError::NotFound { id })?;

        Ok(alert)
    }
}
