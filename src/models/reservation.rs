use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ReservationError {
    #[error("Reservation with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Reservation window is invalid: end must be after start")]
    InvalidWindow,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    PendingPayment,
    Confirmed,
    Cancelled,
}

impl std::str::FromStr for ReservationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_payment" => Ok(ReservationStatus::PendingPayment),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationStatus::PendingPayment => "pending_payment",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: ReservationStatus,
    pub total_price: Option<Decimal>,
    pub currency: String,
    pub origin: String,
    pub qr_payload: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub slot_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub total_price: Option<Decimal>,
    pub currency: String,
    pub origin: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReservation {
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub total_price: Option<Decimal>,
    pub currency: Option<String>,
    pub origin: Option<String>,
}

/// The `[starts_at, ends_at)` window must be non-empty.
pub fn validate_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<(), ReservationError> {
    if ends_at <= starts_at {
        return Err(ReservationError::InvalidWindow);
    }
    Ok(())
}

fn generate_qr_payload(reservation_id: Uuid) -> String {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    format!("PKO-{}-{}", reservation_id.simple(), nonce)
}

impl Reservation {
    pub async fn create(
        pool: &DbPool,
        user_id: Uuid,
        reservation: CreateReservation,
    ) -> Result<Self, ReservationError> {
        validate_window(reservation.starts_at, reservation.ends_at)?;

        let now = Utc::now();
        let reservation = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, user_id, slot_id, starts_at, ends_at, status, total_price, currency, origin, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(reservation.slot_id)
            .bind(reservation.starts_at)
            .bind(reservation.ends_at)
            .bind(ReservationStatus::PendingPayment)
            .bind(reservation.total_price)
            .bind(reservation.currency)
            .bind(reservation.origin)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await?;

        Ok(reservation)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let reservation = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(reservation)
    }

    pub async fn find_by_user(
        pool: &DbPool,
        user_id: Uuid,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let reservations = match status {
            Some(status) => {
                sqlx::query_as::<_, Reservation>(
                    "SELECT * FROM reservations WHERE user_id = $1 AND status = $2 ORDER BY starts_at DESC",
                )
                .bind(user_id)
                .bind(status)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Reservation>(
                    "SELECT * FROM reservations WHERE user_id = $1 ORDER BY starts_at DESC",
                )
                .bind(user_id)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(reservations)
    }

    /// Non-cancelled reservations whose window contains `at`, for the given
    /// slots. Feeds the occupancy projection.
    pub async fn find_active_for_slots(
        pool: &DbPool,
        slot_ids: &[Uuid],
        at: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations
             WHERE slot_id = ANY($1) AND status != 'cancelled' AND starts_at <= $2 AND ends_at > $2",
        )
        .bind(slot_ids)
        .bind(at)
        .fetch_all(pool)
        .await?;

        Ok(reservations)
    }

    /// Partial update with date normalization. The merged window is
    /// re-validated even when only one bound is patched.
    pub async fn update(
        pool: &DbPool,
        id: Uuid,
        update_data: UpdateReservation,
    ) -> Result<Self, ReservationError> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(ReservationError::NotFound { id })?;

        let starts_at = update_data.starts_at.unwrap_or(existing.starts_at);
        let ends_at = update_data.ends_at.unwrap_or(existing.ends_at);
        validate_window(starts_at, ends_at)?;

        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations
             SET starts_at = $2,
                 ends_at = $3,
                 total_price = COALESCE($4, total_price),
                 currency = COALESCE($5, currency),
                 origin = COALESCE($6, origin),
                 updated_at = $7
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(starts_at)
        .bind(ends_at)
        .bind(update_data.total_price)
        .bind(update_data.currency)
        .bind(update_data.origin)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(ReservationError::NotFound { id })?;

        Ok(reservation)
    }

    /// Marks the reservation confirmed, attaching the slot when supplied and
    /// issuing the QR payload. The caller owns the slot-state side effect.
    pub async fn confirm(
        pool: &DbPool,
        id: Uuid,
        slot_id: Option<Uuid>,
    ) -> Result<Self, ReservationError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations
             SET status = $2,
                 slot_id = COALESCE($3, slot_id),
                 qr_payload = COALESCE(qr_payload, $4),
                 updated_at = $5
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(ReservationStatus::Confirmed)
        .bind(slot_id)
        .bind(generate_qr_payload(id))
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(ReservationError::NotFound { id })?;

        Ok(reservation)
    }

    /// Marks the reservation cancelled. The caller owns the slot release.
    pub async fn cancel(pool: &DbPool, id: Uuid) -> Result<Self, ReservationError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(ReservationStatus::Cancelled)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(ReservationError::NotFound { id })?;

        Ok(reservation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn window_rejects_non_positive_span() {
        let start = Utc::now();
        assert!(matches!(
            validate_window(start, start),
            Err(ReservationError::InvalidWindow)
        ));
        assert!(matches!(
            validate_window(start, start - Duration::hours(1)),
            Err(ReservationError::InvalidWindow)
        ));
    }

    #[test]
    fn window_accepts_positive_span() {
        let start = Utc::now();
        assert!(validate_window(start, start + Duration::minutes(30)).is_ok());
    }

    #[test]
    fn qr_payload_embeds_reservation_id() {
        let id = Uuid::new_v4();
        let payload = generate_qr_payload(id);
        assert!(payload.starts_with("PKO-"));
        assert!(payload.contains(&id.simple().to_string()));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&ReservationStatus::PendingPayment).unwrap();
        assert_eq!(json, "\"pending_payment\"");
        assert_eq!(ReservationStatus::Confirmed.to_string(), "confirmed");
    }
}
