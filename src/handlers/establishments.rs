use crate::{
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::{
        establishment::{
            CreateEstablishment, Establishment, EstablishmentError, UpdateEstablishment,
        },
        user::{User, UserRole},
    },
    requests::establishment::{
        AssignManagerRequest, EstablishmentRequest, UpdateEstablishmentRequest,
    },
    utils::geo,
    utils::helpers::ApiResponse,
};
use actix_web::{HttpResponse, Result, web};
use tracing::{error, info};
use uuid::Uuid;

fn parse_location(value: &serde_json::Value) -> Option<serde_json::Value> {
    geo::parse_lat_lng(value).map(|point| geo::lat_lng_to_json(&point))
}

fn parse_perimeter(value: &serde_json::Value) -> Option<serde_json::Value> {
    geo::parse_polygon(value).map(|polygon| geo::polygon_to_json(&polygon))
}

async fn load_owned(
    pool: &DbPool,
    id: Uuid,
    user: &AuthenticatedUser,
) -> std::result::Result<Establishment, HttpResponse> {
    match Establishment::find_by_id(pool, id).await {
        Ok(Some(establishment)) => {
            if establishment.owner_id != user.user_id && !user.is_admin() {
                return Err(HttpResponse::Forbidden()
                    .json(ApiResponse::<()>::error("Access denied".to_string())));
            }
            Ok(establishment)
        }
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
            "Establishment {} not found",
            id
        )))),
        Err(e) => {
            error!("Failed to load establishment {}: {}", id, e);
            Err(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load establishment".to_string(),
            )))
        }
    }
}

pub async fn create(
    pool: web::Data<DbPool>,
    request: web::Json<EstablishmentRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    if !user.can_manage_catalog() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::<()>::error(
            "Only providers can create establishments".to_string(),
        )));
    }

    let Some(location) = parse_location(&request.location) else {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("Invalid location".to_string())));
    };
    let perimeter = match &request.perimeter {
        Some(value) => match parse_perimeter(value) {
            Some(polygon) => Some(polygon),
            None => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::<()>::error("Invalid perimeter".to_string())));
            }
        },
        None => None,
    };

    let create_establishment = CreateEstablishment {
        owner_id: user.user_id,
        name: request.name.clone(),
        description: request.description.clone(),
        street: request.street.clone(),
        street_number: request.street_number.clone(),
        city: request.city.clone(),
        province: request.province.clone(),
        country: request.country.clone(),
        postal_code: request.postal_code.clone(),
        location,
        perimeter,
        general_schedule: request.general_schedule.clone(),
        theoretical_capacity: request.theoretical_capacity.unwrap_or(0),
    };

    match Establishment::create(&pool, create_establishment).await {
        Ok(establishment) => {
            info!("Created establishment {} for {}", establishment.id, user.user_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(establishment)))
        }
        Err(e) => {
            error!("Failed to create establishment: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to create establishment".to_string(),
            )))
        }
    }
}

pub async fn index(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    match Establishment::find_all(&pool).await {
        Ok(establishments) => Ok(HttpResponse::Ok().json(ApiResponse::success(establishments))),
        Err(e) => {
            error!("Failed to list establishments: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to list establishments".to_string(),
            )))
        }
    }
}

pub async fn get_by_id(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let id = path.into_inner();
    match Establishment::find_by_id(&pool, id).await {
        Ok(Some(establishment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(establishment))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
            "Establishment {} not found",
            id
        )))),
        Err(e) => {
            error!("Failed to load establishment {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load establishment".to_string(),
            )))
        }
    }
}

pub async fn mine(pool: web::Data<DbPool>, user: AuthenticatedUser) -> Result<HttpResponse> {
    match Establishment::find_by_owner(&pool, user.user_id).await {
        Ok(establishments) => Ok(HttpResponse::Ok().json(ApiResponse::success(establishments))),
        Err(e) => {
            error!("Failed to list own establishments: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to list establishments".to_string(),
            )))
        }
    }
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateEstablishmentRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if let Err(response) = load_owned(&pool, id, &user).await {
        return Ok(response);
    }

    let location = match &request.location {
        Some(value) => match parse_location(value) {
            Some(point) => Some(point),
            None => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::<()>::error("Invalid location".to_string())));
            }
        },
        None => None,
    };
    let perimeter = match &request.perimeter {
        Some(value) => match parse_perimeter(value) {
            Some(polygon) => Some(polygon),
            None => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::<()>::error("Invalid perimeter".to_string())));
            }
        },
        None => None,
    };

    let update_data = UpdateEstablishment {
        name: request.name.clone(),
        description: request.description.clone(),
        street: request.street.clone(),
        street_number: request.street_number.clone(),
        city: request.city.clone(),
        province: request.province.clone(),
        country: request.country.clone(),
        postal_code: request.postal_code.clone(),
        location,
        perimeter,
        status: request.status.clone(),
        general_schedule: request.general_schedule.clone(),
        theoretical_capacity: request.theoretical_capacity,
    };

    match Establishment::update(&pool, id, update_data).await {
        Ok(establishment) => Ok(HttpResponse::Ok().json(ApiResponse::success(establishment))),
        Err(EstablishmentError::NotFound { id }) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Establishment {} not found", id)),
        )),
        Err(e) => {
            error!("Failed to update establishment {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to update establishment".to_string(),
            )))
        }
    }
}

pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if let Err(response) = load_owned(&pool, id, &user).await {
        return Ok(response);
    }

    match Establishment::delete(&pool, id).await {
        Ok(()) => {
            info!("Deleted establishment {}", id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success(())))
        }
        Err(EstablishmentError::NotFound { id }) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Establishment {} not found", id)),
        )),
        Err(e) => {
            error!("Failed to delete establishment {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to delete establishment".to_string(),
            )))
        }
    }
}

/// Assigns a user as the single manager of an establishment. Providers can
/// only manage their own establishments; admins and providers themselves
/// cannot be demoted into managers.
pub async fn assign_manager(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    request: web::Json<AssignManagerRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let establishment_id = path.into_inner();
    let establishment = match load_owned(&pool, establishment_id, &user).await {
        Ok(establishment) => establishment,
        Err(response) => return Ok(response),
    };

    match User::find_manager_of(&pool, establishment.id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::<()>::error(
                "Establishment already has a manager".to_string(),
            )));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to check current manager: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to assign manager".to_string(),
            )));
        }
    }

    let candidate = match User::find_by_id(&pool, request.user_id).await {
        Ok(Some(candidate)) => candidate,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
                "User {} not found",
                request.user_id
            ))));
        }
        Err(e) => {
            error!("Failed to load manager candidate: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to assign manager".to_string(),
            )));
        }
    };

    if matches!(candidate.role, UserRole::Admin | UserRole::Provider) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(
            "Admins and providers cannot be assigned as managers".to_string(),
        )));
    }
    if candidate.role == UserRole::Manager
        && candidate
            .establishment_id
            .is_some_and(|assigned| assigned != establishment.id)
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::<()>::error(
            "User already manages another establishment".to_string(),
        )));
    }

    match User::assign_as_manager(&pool, candidate.id, establishment.id).await {
        Ok(manager) => {
            info!(
                "Assigned {} as manager of establishment {}",
                manager.id, establishment.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(manager)))
        }
        Err(e) => {
            error!("Failed to assign manager: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to assign manager".to_string(),
            )))
        }
    }
}
