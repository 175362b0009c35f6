use crate::{
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::{
        establishment::Establishment,
        parking_lot::{CreateParkingLot, ParkingLot, ParkingLotError, UpdateParkingLot},
    },
    requests::parking_lot::{ParkingLotRequest, UpdateParkingLotRequest},
    services::occupancy::{self, OccupancyError},
    utils::geo,
    utils::helpers::ApiResponse,
};
use actix_web::{HttpResponse, Result, web};
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

async fn assert_establishment_owner(
    pool: &DbPool,
    establishment_id: Uuid,
    user: &AuthenticatedUser,
) -> std::result::Result<(), HttpResponse> {
    match Establishment::find_by_id(pool, establishment_id).await {
        Ok(Some(establishment)) => {
            if establishment.owner_id != user.user_id && !user.is_admin() {
                return Err(HttpResponse::Forbidden()
                    .json(ApiResponse::<()>::error("Access denied".to_string())));
            }
            Ok(())
        }
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
            "Establishment {} not found",
            establishment_id
        )))),
        Err(e) => {
            error!("Failed to load establishment {}: {}", establishment_id, e);
            Err(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load establishment".to_string(),
            )))
        }
    }
}

async fn load_owned(
    pool: &DbPool,
    id: Uuid,
    user: &AuthenticatedUser,
) -> std::result::Result<ParkingLot, HttpResponse> {
    match ParkingLot::find_by_id(pool, id).await {
        Ok(Some(lot)) => {
            assert_establishment_owner(pool, lot.establishment_id, user).await?;
            Ok(lot)
        }
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
            "Parking lot {} not found",
            id
        )))),
        Err(e) => {
            error!("Failed to load parking lot {}: {}", id, e);
            Err(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load parking lot".to_string(),
            )))
        }
    }
}

pub async fn create(
    pool: web::Data<DbPool>,
    request: web::Json<ParkingLotRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    if !user.can_manage_catalog() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::<()>::error(
            "Only providers can create parking lots".to_string(),
        )));
    }
    if let Err(response) = assert_establishment_owner(&pool, request.establishment_id, &user).await
    {
        return Ok(response);
    }

    let Some(location) = geo::parse_lat_lng(&request.location).map(|p| geo::lat_lng_to_json(&p))
    else {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("Invalid location".to_string())));
    };
    let perimeter = match &request.perimeter {
        Some(value) => match geo::parse_polygon(value).map(|p| geo::polygon_to_json(&p)) {
            Some(polygon) => Some(polygon),
            None => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::<()>::error("Invalid perimeter".to_string())));
            }
        },
        None => None,
    };

    let create_lot = CreateParkingLot {
        establishment_id: request.establishment_id,
        name: request.name.clone(),
        kind: request.kind.clone(),
        supports_accessible: request.supports_accessible.unwrap_or(false),
        supports_motorcycles: request.supports_motorcycles.unwrap_or(false),
        supports_electric: request.supports_electric.unwrap_or(false),
        has_chargers: request.has_chargers.unwrap_or(false),
        charger_count: request.charger_count.unwrap_or(0),
        tariff_id: request.tariff_id,
        cancellation_policy_id: request.cancellation_policy_id,
        location,
        perimeter,
    };

    match ParkingLot::create(&pool, create_lot).await {
        Ok(lot) => {
            info!("Created parking lot {} in establishment {}", lot.id, lot.establishment_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(lot)))
        }
        Err(e) => {
            error!("Failed to create parking lot: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to create parking lot".to_string(),
            )))
        }
    }
}

pub async fn index(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    match ParkingLot::find_all(&pool).await {
        Ok(lots) => Ok(HttpResponse::Ok().json(ApiResponse::success(lots))),
        Err(e) => {
            error!("Failed to list parking lots: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to list parking lots".to_string(),
            )))
        }
    }
}

pub async fn get_by_id(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let id = path.into_inner();
    match ParkingLot::find_by_id(&pool, id).await {
        Ok(Some(lot)) => Ok(HttpResponse::Ok().json(ApiResponse::success(lot))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
            "Parking lot {} not found",
            id
        )))),
        Err(e) => {
            error!("Failed to load parking lot {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load parking lot".to_string(),
            )))
        }
    }
}

pub async fn by_establishment(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match ParkingLot::find_by_establishment(&pool, path.into_inner()).await {
        Ok(lots) => Ok(HttpResponse::Ok().json(ApiResponse::success(lots))),
        Err(e) => {
            error!("Failed to list parking lots: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to list parking lots".to_string(),
            )))
        }
    }
}

/// Point-in-time occupancy for every slot in the lot.
pub async fn occupancy(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let id = path.into_inner();
    match occupancy::project_parking_lot(&pool, id, Utc::now()).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary))),
        Err(OccupancyError::ParkingLotNotFound(id)) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Parking lot {} not found", id)),
        )),
        Err(e) => {
            error!("Failed to project occupancy for {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to compute occupancy".to_string(),
            )))
        }
    }
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateParkingLotRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if let Err(response) = load_owned(&pool, id, &user).await {
        return Ok(response);
    }

    let location = match &request.location {
        Some(value) => match geo::parse_lat_lng(value).map(|p| geo::lat_lng_to_json(&p)) {
            Some(point) => Some(point),
            None => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::<()>::error("Invalid location".to_string())));
            }
        },
        None => None,
    };
    let perimeter = match &request.perimeter {
        Some(value) => match geo::parse_polygon(value).map(|p| geo::polygon_to_json(&p)) {
            Some(polygon) => Some(polygon),
            None => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::<()>::error("Invalid perimeter".to_string())));
            }
        },
        None => None,
    };

    let update_data = UpdateParkingLot {
        name: request.name.clone(),
        kind: request.kind.clone(),
        supports_accessible: request.supports_accessible,
        supports_motorcycles: request.supports_motorcycles,
        supports_electric: request.supports_electric,
        has_chargers: request.has_chargers,
        charger_count: request.charger_count,
        tariff_id: request.tariff_id,
        cancellation_policy_id: request.cancellation_policy_id,
        status: request.status.clone(),
        location,
        perimeter,
    };

    match ParkingLot::update(&pool, id, update_data).await {
        Ok(lot) => Ok(HttpResponse::Ok().json(ApiResponse::success(lot))),
        Err(ParkingLotError::NotFound { id }) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Parking lot {} not found", id)),
        )),
        Err(e) => {
            error!("Failed to update parking lot {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to update parking lot".to_string(),
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

    match ParkingLot::delete(&pool, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success(()))),
        Err(ParkingLotError::NotFound { id }) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Parking lot {} not found", id)),
        )),
        Err(e) => {
            error!("Failed to delete parking lot {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to delete parking lot".to_string(),
            )))
        }
    }
}
