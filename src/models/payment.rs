use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Domain payment statuses. Stored as text: unrecognized provider statuses
/// pass through lower-cased, so the column is deliberately not an enum.
pub mod status {
    pub const PENDING: &str = "pendiente";
    pub const APPROVED: &str = "aprobado";
    pub const CANCELLED: &str = "cancelado";
    pub const REJECTED: &str = "rechazado";
    pub const REFUNDED: &str = "reembolsado";
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Payment amount must be positive")]
    InvalidAmount,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub method: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub provider_tx_id: Option<String>,
    pub receipt_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub reservation_id: Uuid,
    pub method: String,
    pub amount: Decimal,
    pub currency: String,
}

/// Reconciliation patch applied when the provider reports a status change.
#[derive(Debug, Clone, Default)]
pub struct UpdatePaymentStatus {
    pub status: Option<String>,
    pub provider_tx_id: Option<String>,
    pub receipt_url: Option<String>,
}

impl Payment {
    pub async fn create(pool: &DbPool, payment: CreatePayment) -> Result<Self, PaymentError> {
        if payment.amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount);
        }

        let payment = sqlx::query_as::<_, Payment>(
            "INSERT INTO payments (id, reservation_id, method, amount, currency, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
            .bind(Uuid::new_v4())
            .bind(payment.reservation_id)
            .bind(payment.method)
            .bind(payment.amount)
            .bind(payment.currency)
            .bind(status::PENDING)
            .bind(Utc::now())
            .fetch_one(pool)
            .await?;

        Ok(payment)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(payment)
    }

    pub async fn find_by_reservation(
        pool: &DbPool,
        reservation_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE reservation_id = $1 ORDER BY created_at DESC",
        )
        .bind(reservation_id)
        .fetch_all(pool)
        .await?;

        Ok(payments)
    }

    pub async fn find_by_provider_tx_id(
        pool: &DbPool,
        provider_tx_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let payment =
            sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE provider_tx_id = $1")
                .bind(provider_tx_id)
                .fetch_optional(pool)
                .await?;

        Ok(payment)
    }

    /// Payments are mutated in place as provider statuses arrive; rows are
    /// never deleted.
    pub async fn update_status(
        pool: &DbPool,
        id: Uuid,
        update_data: UpdatePaymentStatus,
    ) -> Result<Self, PaymentError> {
        let payment = sqlx::query_as::<_, Payment>(
            "UPDATE payments
             SET status = COALESCE($2, status),
                 provider_tx_id = COALESCE($3, provider_tx_id),
                 receipt_url = COALESCE($4, receipt_url)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update_data.status)
        .bind(update_data.provider_tx_id)
        .bind(update_data.receipt_url)
        .fetch_optional(pool)
        .await?
        .ok_or(PaymentError::NotFound { id })?;

        Ok(payment)
    }
}
