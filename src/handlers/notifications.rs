use crate::{
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::notification::{Notification, NotificationError},
    utils::helpers::ApiResponse,
};
use actix_web::{HttpResponse, Result, web};
use tracing::error;
use uuid::Uuid;

const DEFAULT_LIST_LIMIT: i64 = 50;

pub async fn mine(pool: web::Data<DbPool>, user: AuthenticatedUser) -> Result<HttpResponse> {
    match Notification::find_by_user(&pool, user.user_id, DEFAULT_LIST_LIMIT).await {
        Ok(notifications) => Ok(HttpResponse::Ok().json(ApiResponse::success(notifications))),
        Err(e) => {
            error!("Failed to list notifications: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to list notifications".to_string(),
            )))
        }
    }
}

pub async fn mark_read(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    match Notification::mark_read(&pool, id, user.user_id).await {
        Ok(notification) => Ok(HttpResponse::Ok().json(ApiResponse::success(notification))),
        Err(NotificationError::NotFound { id }) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Notification {} not found", id)),
        )),
        Err(e) => {
            error!("Failed to mark notification {} read: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to update notification".to_string(),
            )))
        }
    }
}
