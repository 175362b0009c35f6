use crate::{
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::cancellation_policy::{
        CancellationPolicy, CancellationPolicyError, CreateCancellationPolicy,
        UpdateCancellationPolicy,
    },
    requests::cancellation_policy::{
        CancellationPolicyRequest, UpdateCancellationPolicyRequest,
    },
    utils::helpers::ApiResponse,
};
use actix_web::{HttpResponse, Result, web};
use tracing::{error, info};
use uuid::Uuid;

pub async fn create(
    pool: web::Data<DbPool>,
    request: web::Json<CancellationPolicyRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    if !user.can_manage_catalog() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::<()>::error(
            "Only providers can create cancellation policies".to_string(),
        )));
    }

    let create_policy = CreateCancellationPolicy {
        short_description: request.short_description.clone(),
        rules: request.rules.clone(),
        created_by: user.user_id,
    };

    match CancellationPolicy::create(&pool, create_policy).await {
        Ok(policy) => {
            info!("Created cancellation policy {}", policy.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(policy)))
        }
        Err(e) => {
            error!("Failed to create cancellation policy: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to create cancellation policy".to_string(),
            )))
        }
    }
}

pub async fn index(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    match CancellationPolicy::find_all(&pool).await {
        Ok(policies) => Ok(HttpResponse::Ok().json(ApiResponse::success(policies))),
        Err(e) => {
            error!("Failed to list cancellation policies: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to list cancellation policies".to_string(),
            )))
        }
    }
}

pub async fn mine(pool: web::Data<DbPool>, user: AuthenticatedUser) -> Result<HttpResponse> {
    match CancellationPolicy::find_by_creator(&pool, user.user_id).await {
        Ok(policies) => Ok(HttpResponse::Ok().json(ApiResponse::success(policies))),
        Err(e) => {
            error!("Failed to list cancellation policies: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to list cancellation policies".to_string(),
            )))
        }
    }
}

pub async fn get_by_id(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let id = path.into_inner();
    match CancellationPolicy::find_by_id(&pool, id).await {
        Ok(Some(policy)) => Ok(HttpResponse::Ok().json(ApiResponse::success(policy))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
            "Cancellation policy {} not found",
            id
        )))),
        Err(e) => {
            error!("Failed to load cancellation policy {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load cancellation policy".to_string(),
            )))
        }
    }
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateCancellationPolicyRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    if !user.can_manage_catalog() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::<()>::error(
            "Only providers can update cancellation policies".to_string(),
        )));
    }

    let id = path.into_inner();
    let update_data = UpdateCancellationPolicy {
        short_description: request.short_description.clone(),
        rules: request.rules.clone(),
    };

    match CancellationPolicy::update(&pool, id, update_data).await {
        Ok(policy) => Ok(HttpResponse::Ok().json(ApiResponse::success(policy))),
        Err(CancellationPolicyError::NotFound { id }) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Cancellation policy {} not found", id)),
        )),
        Err(e) => {
            error!("Failed to update cancellation policy {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to update cancellation policy".to_string(),
            )))
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
            "Only providers can delete cancellation policies".to_string(),
        )));
    }

    let id = path.into_inner();
    match CancellationPolicy::delete(&pool, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success(()))),
        Err(CancellationPolicyError::NotFound { id }) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Cancellation policy {} not found", id)),
        )),
        Err(e) => {
            error!("Failed to delete cancellation policy {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to delete cancellation policy".to_string(),
            )))
        }
    }
}
