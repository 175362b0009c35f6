use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum OpinionError {
    #[error("Opinion with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("An opinion for this establishment already exists")]
    AlreadyExists,
    #[error("Rating must be between 1 and 5")]
    InvalidRating,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Opinion {
    pub id: Uuid,
    pub user_id: Uuid,
    pub establishment_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateOpinion {
    pub establishment_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
}

impl Opinion {
    pub async fn create(
        pool: &DbPool,
        user_id: Uuid,
        opinion: CreateOpinion,
    ) -> Result<Self, OpinionError> {
        if !(1..=5).contains(&opinion.rating) {
            return Err(OpinionError::InvalidRating);
        }

        let existing = sqlx::query_as::<_, Opinion>(
            "SELECT * FROM opinions WHERE user_id = $1 AND establishment_id = $2",
        )
        .bind(user_id)
        .bind(opinion.establishment_id)
        .fetch_optional(pool)
        .await?;
        if existing.is_some() {
            return Err(OpinionError::AlreadyExists);
        }

        let opinion = sqlx::query_as::<_, Opinion>(
            "INSERT INTO opinions (id, user_id, establishment_id, rating, comment, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(opinion.establishment_id)
        .bind(opinion.rating)
        .bind(opinion.comment)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(opinion)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let opinion = sqlx::query_as::<_, Opinion>("SELECT * FROM opinions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(opinion)
    }

    pub async fn find_by_establishment(
        pool: &DbPool,
        establishment_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let opinions = sqlx::query_as::<_, Opinion>(
            "SELECT * FROM opinions WHERE establishment_id = $1 ORDER BY created_at DESC",
        )
        .bind(establishment_id)
        .fetch_all(pool)
        .await?;

        Ok(opinions)
    }

    pub async fn find_by_user(pool: &DbPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let opinions = sqlx::query_as::<_, Opinion>(
            "SELECT * FROM opinions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(opinions)
    }

    pub async fn update_own(
        pool: &DbPool,
        id: Uuid,
        user_id: Uuid,
        rating: Option<i16>,
        comment: Option<String>,
    ) -> Result<Self, OpinionError> {
        if let Some(rating) = rating {
            if !(1..=5).contains(&rating) {
                return Err(OpinionError::InvalidRating);
            }
        }

        let opinion = sqlx::query_as::<_, Opinion>(
            "UPDATE opinions
             SET rating = COALESCE($3, rating),
                 comment = COALESCE($4, comment)
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .fetch_optional(pool)
        .await?
        .ok_or(OpinionError::NotFound { id })?;

        Ok(opinion)
    }
}
