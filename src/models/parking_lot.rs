use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ParkingLotError {
    #[error("Parking lot with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ParkingLot {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub name: String,
    pub kind: String,
    pub supports_accessible: bool,
    pub supports_motorcycles: bool,
    pub supports_electric: bool,
    pub has_chargers: bool,
    pub charger_count: i32,
    pub tariff_id: Option<Uuid>,
    pub cancellation_policy_id: Option<Uuid>,
    pub status: String,
    pub location: serde_json::Value,
    pub perimeter: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateParkingLot {
    pub establishment_id: Uuid,
    pub name: String,
    pub kind: String,
    pub supports_accessible: bool,
    pub supports_motorcycles: bool,
    pub supports_electric: bool,
    pub has_chargers: bool,
    pub charger_count: i32,
    pub tariff_id: Option<Uuid>,
    pub cancellation_policy_id: Option<Uuid>,
    pub location: serde_json::Value,
    pub perimeter: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateParkingLot {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub supports_accessible: Option<bool>,
    pub supports_motorcycles: Option<bool>,
    pub supports_electric: Option<bool>,
    pub has_chargers: Option<bool>,
    pub charger_count: Option<i32>,
    pub tariff_id: Option<Uuid>,
    pub cancellation_policy_id: Option<Uuid>,
    pub status: Option<String>,
    pub location: Option<serde_json::Value>,
    pub perimeter: Option<serde_json::Value>,
}

impl ParkingLot {
    pub async fn create(pool: &DbPool, lot: CreateParkingLot) -> Result<Self, ParkingLotError> {
        let now = Utc::now();

        let lot = sqlx::query_as::<_, ParkingLot>(
            "INSERT INTO parking_lots (id, establishment_id, name, kind, supports_accessible, supports_motorcycles, supports_electric, has_chargers, charger_count, tariff_id, cancellation_policy_id, status, location, perimeter, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING *",
        )
            .bind(Uuid::new_v4())
            .bind(lot.establishment_id)
            .bind(lot.name)
            .bind(lot.kind)
            .bind(lot.supports_accessible)
            .bind(lot.supports_motorcycles)
            .bind(lot.supports_electric)
            .bind(lot.has_chargers)
            .bind(lot.charger_count)
            .bind(lot.tariff_id)
            .bind(lot.cancellation_policy_id)
            .bind("active")
            .bind(lot.location)
            .bind(lot.perimeter)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await?;

        Ok(lot)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let lot = sqlx::query_as::<_, ParkingLot>("SELECT * FROM parking_lots WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(lot)
    }

    pub async fn find_all(pool: &DbPool) -> Result<Vec<Self>, sqlx::Error> {
        let lots =
            sqlx::query_as::<_, ParkingLot>("SELECT * FROM parking_lots ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?;

        Ok(lots)
    }

    pub async fn find_by_establishment(
        pool: &DbPool,
        establishment_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let lots = sqlx::query_as::<_, ParkingLot>(
            "SELECT * FROM parking_lots WHERE establishment_id = $1 ORDER BY name",
        )
        .bind(establishment_id)
        .fetch_all(pool)
        .await?;

        Ok(lots)
    }

    pub async fn update(
        pool: &DbPool,
        id: Uuid,
        update_data: UpdateParkingLot,
    ) -> Result<Self, ParkingLotError> {
        let lot = sqlx::query_as::<_, ParkingLot>(
            "UPDATE parking_lots
             SET name = COALESCE($2, name),
                 kind = COALESCE($3, kind),
                 supports_accessible = COALESCE($4, supports_accessible),
                 supports_motorcycles = COALESCE($5, supports_motorcycles),
                 supports_electric = COALESCE($6, supports_electric),
                 has_chargers = COALESCE($7, has_chargers),
                 charger_count = COALESCE($8, charger_count),
                 tariff_id = COALESCE($9, tariff_id),
                 cancellation_policy_id = COALESCE($10, cancellation_policy_id),
                 status = COALESCE($11, status),
                 location = COALESCE($12, location),
                 perimeter = COALESCE($13, perimeter),
                 updated_at = $14
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update_data.name)
        .bind(update_data.kind)
        .bind(update_data.supports_accessible)
        .bind(update_data.supports_motorcycles)
        .bind(update_data.supports_electric)
        .bind(update_data.has_chargers)
        .bind(update_data.charger_count)
        .bind(update_data.tariff_id)
        .bind(update_data.cancellation_policy_id)
        .bind(update_data.status)
        .bind(update_data.location)
        .bind(update_data.perimeter)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(ParkingLotError::NotFound { id })?;

        Ok(lot)
    }

    pub async fn delete(pool: &DbPool, id: Uuid) -> Result<(), ParkingLotError> {
        let result = sqlx::query("DELETE FROM parking_lots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ParkingLotError::NotFound { id });
        }

        Ok(())
    }
}
