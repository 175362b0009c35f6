use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum EstablishmentError {
    #[error("Establishment with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Establishment {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub street: String,
    pub street_number: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: String,
    pub location: serde_json::Value,
    pub perimeter: Option<serde_json::Value>,
    pub status: String,
    pub general_schedule: Option<serde_json::Value>,
    pub theoretical_capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEstablishment {
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub street: String,
    pub street_number: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: String,
    pub location: serde_json::Value,
    pub perimeter: Option<serde_json::Value>,
    pub general_schedule: Option<serde_json::Value>,
    pub theoretical_capacity: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEstablishment {
    pub name: Option<String>,
    pub description: Option<String>,
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub location: Option<serde_json::Value>,
    pub perimeter: Option<serde_json::Value>,
    pub status: Option<String>,
    pub general_schedule: Option<serde_json::Value>,
    pub theoretical_capacity: Option<i32>,
}

impl Establishment {
    pub async fn create(
        pool: &DbPool,
        establishment: CreateEstablishment,
    ) -> Result<Self, EstablishmentError> {
        let now = Utc::now();

        let establishment = sqlx::query_as::<_, Establishment>(
            "INSERT INTO establishments (id, owner_id, name, description, street, street_number, city, province, country, postal_code, location, perimeter, status, general_schedule, theoretical_capacity, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING *",
        )
            .bind(Uuid::new_v4())
            .bind(establishment.owner_id)
            .bind(establishment.name)
            .bind(establishment.description)
            .bind(establishment.street)
            .bind(establishment.street_number)
            .bind(establishment.city)
            .bind(establishment.province)
            .bind(establishment.country)
            .bind(establishment.postal_code)
            .bind(establishment.location)
            .bind(establishment.perimeter)
            .bind("active")
            .bind(establishment.general_schedule)
            .bind(establishment.theoretical_capacity)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await?;

        Ok(establishment)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let establishment =
            sqlx::query_as::<_, Establishment>("SELECT * FROM establishments WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(establishment)
    }

    pub async fn find_all(pool: &DbPool) -> Result<Vec<Self>, sqlx::Error> {
        let establishments = sqlx::query_as::<_, Establishment>(
            "SELECT * FROM establishments ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(establishments)
    }

    pub async fn find_by_owner(pool: &DbPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let establishments = sqlx::query_as::<_, Establishment>(
            "SELECT * FROM establishments WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(establishments)
    }

    pub async fn update(
        pool: &DbPool,
        id: Uuid,
        update_data: UpdateEstablishment,
    ) -> Result<Self, EstablishmentError> {
        let establishment = sqlx::query_as::<_, Establishment>(
            "UPDATE establishments
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 street = COALESCE($4, street),
                 street_number = COALESCE($5, street_number),
                 city = COALESCE($6, city),
                 province = COALESCE($7, province),
                 country = COALESCE($8, country),
                 postal_code = COALESCE($9, postal_code),
                 location = COALESCE($10, location),
                 perimeter = COALESCE($11, perimeter),
                 status = COALESCE($12, status),
                 general_schedule = COALESCE($13, general_schedule),
                 theoretical_capacity = COALESCE($14, theoretical_capacity),
                 updated_at = $15
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update_data.name)
        .bind(update_data.description)
        .bind(update_data.street)
        .bind(update_data.street_number)
        .bind(update_data.city)
        .bind(update_data.province)
        .bind(update_data.country)
        .bind(update_data.postal_code)
        .bind(update_data.location)
        .bind(update_data.perimeter)
        .bind(update_data.status)
        .bind(update_data.general_schedule)
        .bind(update_data.theoretical_capacity)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(EstablishmentError::NotFound { id })?;

        Ok(establishment)
    }

    pub async fn delete(pool: &DbPool, id: Uuid) -> Result<(), EstablishmentError> {
        let result = sqlx::query("DELETE FROM establishments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EstablishmentError::NotFound { id });
        }

        Ok(())
    }
}
