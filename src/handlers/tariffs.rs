use crate::{
    config::Settings,
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::tariff::{CreateTariff, Tariff, TariffError, UpdateTariff},
    requests::tariff::{TariffRequest, UpdateTariffRequest},
    utils::helpers::ApiResponse,
};
use actix_web::{HttpResponse, Result, web};
use tracing::{error, info};
use uuid::Uuid;

pub async fn create(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    request: web::Json<TariffRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    if !user.can_manage_catalog() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::<()>::error(
            "Only providers can create tariffs".to_string(),
        )));
    }

    let create_tariff = CreateTariff {
        name: request.name.clone(),
        currency: request
            .currency
            .clone()
            .unwrap_or_else(|| settings.payments.default_currency.clone()),
        calculation_mode: request.calculation_mode.clone(),
        base_price: request.base_price,
        hourly_price: request.hourly_price,
        fraction_minutes: request.fraction_minutes,
        minimum_billable_minutes: request.minimum_billable_minutes,
        daily_cap: request.daily_cap,
        rules: request.rules.clone(),
        valid_from: request.valid_from,
        valid_until: request.valid_until,
        created_by: Some(user.user_id),
    };

    match Tariff::create(&pool, create_tariff).await {
        Ok(tariff) => {
            info!("Created tariff {}", tariff.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(tariff)))
        }
        Err(e) => {
            error!("Failed to create tariff: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create tariff".to_string())))
        }
    }
}

pub async fn index(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    match Tariff::find_all(&pool).await {
        Ok(tariffs) => Ok(HttpResponse::Ok().json(ApiResponse::success(tariffs))),
        Err(e) => {
            error!("Failed to list tariffs: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to list tariffs".to_string())))
        }
    }
}

pub async fn get_by_id(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let id = path.into_inner();
    match Tariff::find_by_id(&pool, id).await {
        Ok(Some(tariff)) => Ok(HttpResponse::Ok().json(ApiResponse::success(tariff))),
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error(format!("Tariff {} not found", id)))),
        Err(e) => {
            error!("Failed to load tariff {}: {}", id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to load tariff".to_string())))
        }
    }
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateTariffRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    if !user.can_manage_catalog() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::<()>::error(
            "Only providers can update tariffs".to_string(),
        )));
    }

    let id = path.into_inner();
    let update_data = UpdateTariff {
        name: request.name.clone(),
        currency: request.currency.clone(),
        calculation_mode: request.calculation_mode.clone(),
        base_price: request.base_price,
        hourly_price: request.hourly_price,
        fraction_minutes: request.fraction_minutes,
        minimum_billable_minutes: request.minimum_billable_minutes,
        daily_cap: request.daily_cap,
        rules: request.rules.clone(),
        valid_from: request.valid_from,
        valid_until: request.valid_until,
    };

    match Tariff::update(&pool, id, update_data).await {
        Ok(tariff) => Ok(HttpResponse::Ok().json(ApiResponse::success(tariff))),
        Err(TariffError::NotFound { id }) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error(format!("Tariff {} not found", id)))),
        Err(e) => {
            error!("Failed to update tariff {}: {}", id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update tariff".to_string())))
        }
    }
}

pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    if !user.can_manage_catalog() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::<()>::error(
            "Only providers can delete tariffs".to_string(),
        )));
    }

    let id = path.into_inner();
    match Tariff::delete(&pool, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success(()))),
        Err(TariffError::NotFound { id }) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error(format!("Tariff {} not found", id)))),
        Err(e) => {
            error!("Failed to delete tariff {}: {}", id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to delete tariff".to_string())))
        }
    }
}
