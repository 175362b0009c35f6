use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TariffError {
    #[error("Tariff with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tariff {
    pub id: Uuid,
    pub name: String,
    pub currency: String,
    pub calculation_mode: String,
    pub base_price: Option<Decimal>,
    pub hourly_price: Option<Decimal>,
    pub fraction_minutes: Option<i32>,
    pub minimum_billable_minutes: Option<i32>,
    pub daily_cap: Option<Decimal>,
    pub rules: Option<serde_json::Value>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateTariff {
    pub name: String,
    pub currency: String,
    pub calculation_mode: String,
    pub base_price: Option<Decimal>,
    pub hourly_price: Option<Decimal>,
    pub fraction_minutes: Option<i32>,
    pub minimum_billable_minutes: Option<i32>,
    pub daily_cap: Option<Decimal>,
    pub rules: Option<serde_json::Value>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTariff {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub calculation_mode: Option<String>,
    pub base_price: Option<Decimal>,
    pub hourly_price: Option<Decimal>,
    pub fraction_minutes: Option<i32>,
    pub minimum_billable_minutes: Option<i32>,
    pub daily_cap: Option<Decimal>,
    pub rules: Option<serde_json::Value>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl Tariff {
    pub async fn create(pool: &DbPool, tariff: CreateTariff) -> Result<Self, TariffError> {
        let now = Utc::now();

        let tariff = sqlx::query_as::<_, Tariff>(
            "INSERT INTO tariffs (id, name, currency, calculation_mode, base_price, hourly_price, fraction_minutes, minimum_billable_minutes, daily_cap, rules, valid_from, valid_until, created_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING *",
        )
            .bind(Uuid::new_v4())
            .bind(tariff.name)
            .bind(tariff.currency)
            .bind(tariff.calculation_mode)
            .bind(tariff.base_price)
            .bind(tariff.hourly_price)
            .bind(tariff.fraction_minutes)
            .bind(tariff.minimum_billable_minutes)
            .bind(tariff.daily_cap)
            .bind(tariff.rules)
            .bind(tariff.valid_from)
            .bind(tariff.valid_until)
            .bind(tariff.created_by)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await?;

        Ok(tariff)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let tariff = sqlx::query_as::<_, Tariff>("SELECT * FROM tariffs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(tariff)
    }

    pub async fn find_all(pool: &DbPool) -> Result<Vec<Self>, sqlx::Error> {
        let tariffs = sqlx::query_as::<_, Tariff>("SELECT * FROM tariffs ORDER BY name")
            .fetch_all(pool)
            .await?;

        Ok(tariffs)
    }

    pub async fn update(
        pool: &DbPool,
        id: Uuid,
        update_data: UpdateTariff,
    ) -> Result<Self, TariffError> {
        let tariff = sqlx::query_as::<_, Tariff>(
            "UPDATE tariffs
             SET name = COALESCE($2, name),
                 currency = COALESCE($3, currency),
                 calculation_mode = COALESCE($4, calculation_mode),
                 base_price = COALESCE($5, base_price),
                 hourly_price = COALESCE($6, hourly_price),
                 fraction_minutes = COALESCE($7, fraction_minutes),
                 minimum_billable_minutes = COALESCE($8, minimum_billable_minutes),
                 daily_cap = COALESCE($9, daily_cap),
                 rules = COALESCE($10, rules),
                 valid_from = COALESCE($11, valid_from),
                 valid_until = COALESCE($12, valid_until),
                 updated_at = $13
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update_data.name)
        .bind(update_data.currency)
        .bind(update_data.calculation_mode)
        .bind(update_data.base_price)
        .bind(update_data.hourly_price)
        .bind(update_data.fraction_minutes)
        .bind(update_data.minimum_billable_minutes)
        .bind(update_data.daily_cap)
        .bind(update_data.rules)
        .bind(update_data.valid_from)
        .bind(update_data.valid_until)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(TariffError::NotFound { id })?;

        Ok(tariff)
    }

    pub async fn delete(pool: &DbPool, id: Uuid) -> Result<(), TariffError> {
        let result = sqlx::query("DELETE FROM tariffs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TariffError::NotFound { id });
        }

        Ok(())
    }
}
