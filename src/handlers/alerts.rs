use crate::{
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::{
        alert::{Alert, AlertError, CreateAlert, status},
        parking_lot::ParkingLot,
        slot::{Slot, operational_state},
        user::{User, UserRole},
    },
    requests::alert::{AlertListQuery, AlertRequest, UpdateAlertStatusRequest},
    services::alerts::{AlertBroadcaster, AlertEvent},
    utils::helpers::ApiResponse,
};
use actix_web::{HttpResponse, Result, web};
use futures_util::stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use uuid::Uuid;

const DEFAULT_LIST_LIMIT: i64 = 50;

/// Resolves the establishment a slot belongs to (slot -> parking lot ->
/// establishment).
async fn establishment_of_slot(
    pool: &DbPool,
    slot_id: Uuid,
) -> std::result::Result<(Slot, Uuid), HttpResponse> {
    let slot = match Slot::find_by_id(pool, slot_id).await {
        Ok(Some(slot)) => slot,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
                "Slot {} not found",
                slot_id
            ))));
        }
        Err(e) => {
            error!("Failed to load slot {}: {}", slot_id, e);
            return Err(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to load slot".to_string())));
        }
    };

    match ParkingLot::find_by_id(pool, slot.parking_lot_id).await {
        Ok(Some(lot)) => Ok((slot, lot.establishment_id)),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::<()>::error(
            "Parking lot not found for slot".to_string(),
        ))),
        Err(e) => {
            error!("Failed to load parking lot: {}", e);
            Err(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load parking lot".to_string(),
            )))
        }
    }
}

/// Managers only see alerts for their own establishment.
async fn manager_establishment(
    pool: &DbPool,
    user: &AuthenticatedUser,
) -> std::result::Result<Uuid, HttpResponse> {
    let record = match User::find_by_id(pool, user.user_id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return Err(HttpResponse::Unauthorized()
                .json(ApiResponse::<()>::error("Not authenticated".to_string())));
        }
        Err(e) => {
            error!("Failed to load user {}: {}", user.user_id, e);
            return Err(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to load user".to_string())));
        }
    };

    if record.role != UserRole::Manager {
        return Err(HttpResponse::Forbidden().json(ApiResponse::<()>::error(
            "Only managers can access alerts".to_string(),
        )));
    }
    record.establishment_id.ok_or_else(|| {
        HttpResponse::BadRequest().json(ApiResponse::<()>::error(
            "Manager has no establishment assigned".to_string(),
        ))
    })
}

async fn assert_alert_ownership(
    pool: &DbPool,
    alert_id: Uuid,
    user: &AuthenticatedUser,
) -> std::result::Result<Alert, HttpResponse> {
    let establishment_id = manager_establishment(pool, user).await?;

    let alert = match Alert::find_by_id(pool, alert_id).await {
        Ok(Some(alert)) => alert,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
                "Alert {} not found",
                alert_id
            ))));
        }
        Err(e) => {
            error!("Failed to load alert {}: {}", alert_id, e);
            return Err(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to load alert".to_string())));
        }
    };

    if alert.establishment_id != establishment_id {
        return Err(HttpResponse::Forbidden().json(ApiResponse::<()>::error(
            "Alert belongs to another establishment".to_string(),
        )));
    }
    Ok(alert)
}

/// Any authenticated user can report a problem on a slot. The slot is
/// blocked best-effort while the alert is handled.
pub async fn create(
    pool: web::Data<DbPool>,
    hub: web::Data<AlertBroadcaster>,
    request: web::Json<AlertRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let (slot, establishment_id) = match establishment_of_slot(&pool, request.slot_id).await {
        Ok(resolved) => resolved,
        Err(response) => return Ok(response),
    };

    let create_alert = CreateAlert {
        establishment_id,
        slot_id: slot.id,
        reporter_id: user.user_id,
        message: request.message.clone(),
    };

    let alert = match Alert::create(&pool, create_alert).await {
        Ok(alert) => alert,
        Err(e) => {
            error!("Failed to create alert: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create alert".to_string())));
        }
    };

    if let Err(e) =
        Slot::set_operational_state(&pool, slot.id, operational_state::BLOCKED).await
    {
        warn!("Created alert {} but failed to block slot {}: {}", alert.id, slot.id, e);
    }

    info!("Alert {} created for establishment {}", alert.id, establishment_id);
    hub.publish(establishment_id, AlertEvent::created(alert.clone()))
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(alert)))
}

pub async fn index(
    pool: web::Data<DbPool>,
    query: web::Query<AlertListQuery>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let establishment_id = match manager_establishment(&pool, &user).await {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 200);
    match Alert::find_by_establishment(&pool, establishment_id, query.status.as_deref(), limit)
        .await
    {
        Ok(alerts) => Ok(HttpResponse::Ok().json(ApiResponse::success(alerts))),
        Err(e) => {
            error!("Failed to list alerts: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to list alerts".to_string())))
        }
    }
}

pub async fn mark_read(
    pool: web::Data<DbPool>,
    hub: web::Data<AlertBroadcaster>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let alert_id = path.into_inner();
    if let Err(response) = assert_alert_ownership(&pool, alert_id, &user).await {
        return Ok(response);
    }

    match Alert::mark_viewed(&pool, alert_id).await {
        Ok(alert) => {
            hub.publish(alert.establishment_id, AlertEvent::updated(alert.clone()))
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(alert)))
        }
        Err(AlertError::NotFound { id }) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error(format!("Alert {} not found", id)))),
        Err(e) => {
            error!("Failed to mark alert {} read: {}", alert_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update alert".to_string())))
        }
    }
}

pub async fn update_status(
    pool: web::Data<DbPool>,
    hub: web::Data<AlertBroadcaster>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateAlertStatusRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let alert_id = path.into_inner();
    if let Err(response) = assert_alert_ownership(&pool, alert_id, &user).await {
        return Ok(response);
    }

    match Alert::update_status(&pool, alert_id, &request.status).await {
        Ok(alert) => {
            hub.publish(alert.establishment_id, AlertEvent::updated(alert.clone()))
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(alert)))
        }
        Err(AlertError::NotFound { id }) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error(format!("Alert {} not found", id)))),
        Err(e) => {
            error!("Failed to update alert {}: {}", alert_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update alert".to_string())))
        }
    }
}

/// Resolves the alert and returns the slot to occupied, best-effort.
pub async fn resolve(
    pool: web::Data<DbPool>,
    hub: web::Data<AlertBroadcaster>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let alert_id = path.into_inner();
    let alert = match assert_alert_ownership(&pool, alert_id, &user).await {
        Ok(alert) => alert,
        Err(response) => return Ok(response),
    };

    match Alert::update_status(&pool, alert_id, status::RESOLVED).await {
        Ok(updated) => {
            if let Err(e) =
                Slot::set_operational_state(&pool, alert.slot_id, operational_state::OCCUPIED)
                    .await
            {
                warn!(
                    "Resolved alert {} but failed to restore slot {}: {}",
                    alert_id, alert.slot_id, e
                );
            }
            hub.publish(updated.establishment_id, AlertEvent::updated(updated.clone()))
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
        }
        Err(AlertError::NotFound { id }) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error(format!("Alert {} not found", id)))),
        Err(e) => {
            error!("Failed to resolve alert {}: {}", alert_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to resolve alert".to_string())))
        }
    }
}

/// Server-sent events stream of alert activity for the manager's
/// establishment. Dropping the connection unsubscribes automatically.
pub async fn stream(
    pool: web::Data<DbPool>,
    hub: web::Data<AlertBroadcaster>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let establishment_id = match manager_establishment(&pool, &user).await {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    let receiver = hub.subscribe(establishment_id).await;
    let events = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(_) => continue,
                    };
                    let chunk = web::Bytes::from(format!("data: {}\n\n", payload));
                    return Some((Ok::<_, actix_web::Error>(chunk), receiver));
                }
                // Slow consumer: skip the missed events and keep streaming.
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(events))
}
