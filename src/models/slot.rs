use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Operational flag values. Stored as text, not an enum; the occupancy
/// projection only distinguishes `operational` from everything else.
pub mod operational_state {
    pub const OPERATIONAL: &str = "operational";
    pub const OCCUPIED: &str = "occupied";
    pub const BLOCKED: &str = "blocked";
    pub const MAINTENANCE: &str = "maintenance";
}

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Slot with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("No fields provided for update")]
    NoUpdateFields,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Slot {
    pub id: Uuid,
    pub parking_lot_id: Uuid,
    pub code: String,
    pub kind: String,
    pub width_cm: i32,
    pub length_cm: i32,
    pub local_geometry: Option<serde_json::Value>,
    pub operational_state: String,
    pub tariff_id: Option<Uuid>,
    pub is_reservable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateSlot {
    pub parking_lot_id: Uuid,
    pub code: String,
    pub kind: String,
    pub width_cm: i32,
    pub length_cm: i32,
    pub local_geometry: Option<serde_json::Value>,
    pub operational_state: String,
    pub tariff_id: Option<Uuid>,
    pub is_reservable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSlot {
    pub code: Option<String>,
    pub kind: Option<String>,
    pub width_cm: Option<i32>,
    pub length_cm: Option<i32>,
    pub local_geometry: Option<serde_json::Value>,
    pub operational_state: Option<String>,
    pub tariff_id: Option<Uuid>,
    pub is_reservable: Option<bool>,
}

impl UpdateSlot {
    fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.kind.is_none()
            && self.width_cm.is_none()
            && self.length_cm.is_none()
            && self.local_geometry.is_none()
            && self.operational_state.is_none()
            && self.tariff_id.is_none()
            && self.is_reservable.is_none()
    }
}

impl Slot {
    pub async fn create(pool: &DbPool, slot: CreateSlot) -> Result<Self, SlotError> {
        let now = Utc::now();

        let slot = sqlx::query_as::<_, Slot>(
            "INSERT INTO slots (id, parking_lot_id, code, kind, width_cm, length_cm, local_geometry, operational_state, tariff_id, is_reservable, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *",
        )
            .bind(Uuid::new_v4())
            .bind(slot.parking_lot_id)
            .bind(slot.code)
            .bind(slot.kind)
            .bind(slot.width_cm)
            .bind(slot.length_cm)
            .bind(slot.local_geometry)
            .bind(slot.operational_state)
            .bind(slot.tariff_id)
            .bind(slot.is_reservable)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await?;

        Ok(slot)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let slot = sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(slot)
    }

    pub async fn find_by_parking_lot(
        pool: &DbPool,
        parking_lot_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let slots =
            sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE parking_lot_id = $1 ORDER BY code")
                .bind(parking_lot_id)
                .fetch_all(pool)
                .await?;

        Ok(slots)
    }

    pub async fn update(
        pool: &DbPool,
        id: Uuid,
        update_data: UpdateSlot,
    ) -> Result<Self, SlotError> {
        if update_data.is_empty() {
            return Err(SlotError::NoUpdateFields);
        }

        let slot = sqlx::query_as::<_, Slot>(
            "UPDATE slots
             SET code = COALESCE($2, code),
                 kind = COALESCE($3, kind),
                 width_cm = COALESCE($4, width_cm),
                 length_cm = COALESCE($5, length_cm),
                 local_geometry = COALESCE($6, local_geometry),
                 operational_state = COALESCE($7, operational_state),
                 tariff_id = COALESCE($8, tariff_id),
                 is_reservable = COALESCE($9, is_reservable),
                 updated_at = $10
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update_data.code)
        .bind(update_data.kind)
        .bind(update_data.width_cm)
        .bind(update_data.length_cm)
        .bind(update_data.local_geometry)
        .bind(update_data.operational_state)
        .bind(update_data.tariff_id)
        .bind(update_data.is_reservable)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(SlotError::NotFound { id })?;

        Ok(slot)
    }

    /// Flips only the operational flag. Used by the settlement cascade and
    /// the alert flow.
    pub async fn set_operational_state(
        pool: &DbPool,
        id: Uuid,
        state: &str,
    ) -> Result<Self, SlotError> {
        let slot = sqlx::query_as::<_, Slot>(
            "UPDATE slots SET operational_state = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(state)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(SlotError::NotFound { id })?;

        Ok(slot)
    }

    pub async fn delete(pool: &DbPool, id: Uuid) -> Result<(), SlotError> {
        let result = sqlx::query("DELETE FROM slots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SlotError::NotFound { id });
        }

        Ok(())
    }
}
