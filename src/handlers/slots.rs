use crate::{
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::{
        establishment::Establishment,
        parking_lot::ParkingLot,
        slot::{CreateSlot, Slot, SlotError, UpdateSlot, operational_state},
    },
    requests::slot::{SlotRequest, UpdateSlotRequest},
    utils::geo,
    utils::helpers::ApiResponse,
};
use actix_web::{HttpResponse, Result, web};
use tracing::{error, info};
use uuid::Uuid;

async fn assert_lot_owner(
    pool: &DbPool,
    parking_lot_id: Uuid,
    user: &AuthenticatedUser,
) -> std::result::Result<(), HttpResponse> {
    let lot = match ParkingLot::find_by_id(pool, parking_lot_id).await {
        Ok(Some(lot)) => lot,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
                "Parking lot {} not found",
                parking_lot_id
            ))));
        }
        Err(e) => {
            error!("Failed to load parking lot {}: {}", parking_lot_id, e);
            return Err(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load parking lot".to_string(),
            )));
        }
    };

    match Establishment::find_by_id(pool, lot.establishment_id).await {
        Ok(Some(establishment))
            if establishment.owner_id == user.user_id || user.is_admin() =>
        {
            Ok(())
        }
        Ok(_) => Err(HttpResponse::Forbidden()
            .json(ApiResponse::<()>::error("Access denied".to_string()))),
        Err(e) => {
            error!("Failed to load establishment: {}", e);
            Err(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load establishment".to_string(),
            )))
        }
    }
}

fn parse_geometry(
    value: &Option<serde_json::Value>,
) -> std::result::Result<Option<serde_json::Value>, HttpResponse> {
    match value {
        Some(raw) => match geo::parse_polygon(raw).map(|p| geo::polygon_to_json(&p)) {
            Some(polygon) => Ok(Some(polygon)),
            None => Err(HttpResponse::BadRequest()
                .json(ApiResponse::<()>::error("Invalid slot geometry".to_string()))),
        },
        None => Ok(None),
    }
}

pub async fn create(
    pool: web::Data<DbPool>,
    request: web::Json<SlotRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    if !user.can_manage_catalog() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::<()>::error(
            "Only providers can create slots".to_string(),
        )));
    }
    if let Err(response) = assert_lot_owner(&pool, request.parking_lot_id, &user).await {
        return Ok(response);
    }

    let local_geometry = match parse_geometry(&request.local_geometry) {
        Ok(geometry) => geometry,
        Err(response) => return Ok(response),
    };

    let create_slot = CreateSlot {
        parking_lot_id: request.parking_lot_id,
        code: request.code.clone(),
        kind: request.kind.clone(),
        width_cm: request.width_cm,
        length_cm: request.length_cm,
        local_geometry,
        operational_state: request
            .operational_state
            .clone()
            .unwrap_or_else(|| operational_state::OPERATIONAL.to_string()),
        tariff_id: request.tariff_id,
        is_reservable: request.is_reservable.unwrap_or(true),
    };

    match Slot::create(&pool, create_slot).await {
        Ok(slot) => {
            info!("Created slot {} in parking lot {}", slot.id, slot.parking_lot_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(slot)))
        }
        Err(e) => {
            error!("Failed to create slot: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create slot".to_string())))
        }
    }
}

pub async fn get_by_id(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let id = path.into_inner();
    match Slot::find_by_id(&pool, id).await {
        Ok(Some(slot)) => Ok(HttpResponse::Ok().json(ApiResponse::success(slot))),
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error(format!("Slot {} not found", id)))),
        Err(e) => {
            error!("Failed to load slot {}: {}", id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to load slot".to_string())))
        }
    }
}

pub async fn by_parking_lot(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match Slot::find_by_parking_lot(&pool, path.into_inner()).await {
        Ok(slots) => Ok(HttpResponse::Ok().json(ApiResponse::success(slots))),
        Err(e) => {
            error!("Failed to list slots: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to list slots".to_string())))
        }
    }
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateSlotRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();

    let existing = match Slot::find_by_id(&pool, id).await {
        Ok(Some(slot)) => slot,
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::<()>::error(format!("Slot {} not found", id))));
        }
        Err(e) => {
            error!("Failed to load slot {}: {}", id, e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to load slot".to_string())));
        }
    };
    if let Err(response) = assert_lot_owner(&pool, existing.parking_lot_id, &user).await {
        return Ok(response);
    }

    let local_geometry = match parse_geometry(&request.local_geometry) {
        Ok(geometry) => geometry,
        Err(response) => return Ok(response),
    };

    let update_data = UpdateSlot {
        code: request.code.clone(),
        kind: request.kind.clone(),
        width_cm: request.width_cm,
        length_cm: request.length_cm,
        local_geometry,
        operational_state: request.operational_state.clone(),
        tariff_id: request.tariff_id,
        is_reservable: request.is_reservable,
    };

    match Slot::update(&pool, id, update_data).await {
        Ok(slot) => Ok(HttpResponse::Ok().json(ApiResponse::success(slot))),
        Err(SlotError::NoUpdateFields) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::<()>::error("No fields provided for update".to_string()),
        )),
        Err(SlotError::NotFound { id }) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error(format!("Slot {} not found", id)))),
        Err(e) => {
            error!("Failed to update slot {}: {}", id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update slot".to_string())))
        }
    }
}

pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();

    let existing = match Slot::find_by_id(&pool, id).await {
        Ok(Some(slot)) => slot,
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::<()>::error(format!("Slot {} not found", id))));
        }
        Err(e) => {
            error!("Failed to load slot {}: {}", id, e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to load slot".to_string())));
        }
    };
    if let Err(response) = assert_lot_owner(&pool, existing.parking_lot_id, &user).await {
        return Ok(response);
    }

    match Slot::delete(&pool, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success(()))),
        Err(SlotError::NotFound { id }) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error(format!("Slot {} not found", id)))),
        Err(e) => {
            error!("Failed to delete slot {}: {}", id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to delete slot".to_string())))
        }
    }
}
