use crate::{
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::opinion::{CreateOpinion, Opinion, OpinionError},
    requests::opinion::{OpinionRequest, UpdateOpinionRequest},
    utils::helpers::ApiResponse,
};
use actix_web::{HttpResponse, Result, web};
use tracing::{error, info};
use uuid::Uuid;

pub async fn create(
    pool: web::Data<DbPool>,
    request: web::Json<OpinionRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let create_opinion = CreateOpinion {
        establishment_id: request.establishment_id,
        rating: request.rating,
        comment: request.comment.clone(),
    };

    match Opinion::create(&pool, user.user_id, create_opinion).await {
        Ok(opinion) => {
            info!("User {} reviewed establishment {}", user.user_id, opinion.establishment_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(opinion)))
        }
        Err(e @ OpinionError::AlreadyExists) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::<()>::error(e.to_string())))
        }
        Err(e @ OpinionError::InvalidRating) => {
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string())))
        }
        Err(e) => {
            error!("Failed to create opinion: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create opinion".to_string())))
        }
    }
}

pub async fn by_establishment(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match Opinion::find_by_establishment(&pool, path.into_inner()).await {
        Ok(opinions) => Ok(HttpResponse::Ok().json(ApiResponse::success(opinions))),
        Err(e) => {
            error!("Failed to list opinions: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to list opinions".to_string())))
        }
    }
}

pub async fn mine(pool: web::Data<DbPool>, user: AuthenticatedUser) -> Result<HttpResponse> {
    match Opinion::find_by_user(&pool, user.user_id).await {
        Ok(opinions) => Ok(HttpResponse::Ok().json(ApiResponse::success(opinions))),
        Err(e) => {
            error!("Failed to list opinions: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to list opinions".to_string())))
        }
    }
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateOpinionRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    match Opinion::update_own(&pool, id, user.user_id, request.rating, request.comment.clone())
        .await
    {
        Ok(opinion) => Ok(HttpResponse::Ok().json(ApiResponse::success(opinion))),
        Err(e @ OpinionError::InvalidRating) => {
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string())))
        }
        Err(OpinionError::NotFound { id }) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error(format!("Opinion {} not found", id)))),
        Err(e) => {
            error!("Failed to update opinion {}: {}", id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update opinion".to_string())))
        }
    }
}
