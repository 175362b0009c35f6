use crate::{
    config::Settings,
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::{
        reservation::{CreateReservation, Reservation, ReservationError, UpdateReservation},
        slot::{Slot, operational_state},
        user::User,
    },
    requests::payment::CreateReservationPaymentRequest,
    requests::reservation::{
        ConfirmReservationRequest, ReservationListQuery, ReservationRequest,
        UpdateReservationRequest,
    },
    services::email::Mailer,
    services::mercado_pago::MercadoPagoClient,
    services::payments::{CreateIntentInput, PaymentService, PaymentServiceError},
    services::paypal::PayPalClient,
    utils::helpers::ApiResponse,
};
use actix_web::{HttpResponse, Result, web};
use tracing::{error, info, warn};
use uuid::Uuid;

pub async fn create(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    request: web::Json<ReservationRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let create_reservation = CreateReservation {
        slot_id: request.slot_id,
        starts_at: request.starts_at,
        ends_at: request.ends_at,
        total_price: request.total_price,
        currency: request
            .currency
            .clone()
            .unwrap_or_else(|| settings.payments.default_currency.clone()),
        origin: request.origin.clone().unwrap_or_else(|| "web".to_string()),
    };

    match Reservation::create(&pool, user.user_id, create_reservation).await {
        Ok(reservation) => {
            info!("Created reservation {} for user {}", reservation.id, user.user_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(reservation)))
        }
        Err(ReservationError::InvalidWindow) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::<()>::error(ReservationError::InvalidWindow.to_string()),
        )),
        Err(e) => {
            error!("Failed to create reservation: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to create reservation".to_string(),
            )))
        }
    }
}

async fn load_owned(
    pool: &DbPool,
    id: Uuid,
    user: &AuthenticatedUser,
) -> std::result::Result<Reservation, HttpResponse> {
    match Reservation::find_by_id(pool, id).await {
        Ok(Some(reservation)) => {
            if reservation.user_id != user.user_id && !user.is_admin() {
                return Err(HttpResponse::Forbidden()
                    .json(ApiResponse::<()>::error("Access denied".to_string())));
            }
            Ok(reservation)
        }
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
            "Reservation {} not found",
            id
        )))),
        Err(e) => {
            error!("Failed to load reservation {}: {}", id, e);
            Err(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load reservation".to_string(),
            )))
        }
    }
}

pub async fn get_by_id(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    match load_owned(&pool, path.into_inner(), &user).await {
        Ok(reservation) => Ok(HttpResponse::Ok().json(ApiResponse::success(reservation))),
        Err(response) => Ok(response),
    }
}

pub async fn my_reservations(
    pool: web::Data<DbPool>,
    query: web::Query<ReservationListQuery>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let status = match query.status.as_deref() {
        Some(raw) => match raw.parse() {
            Ok(status) => Some(status),
            Err(()) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(format!(
                    "Unknown reservation status: {}",
                    raw
                ))));
            }
        },
        None => None,
    };

    match Reservation::find_by_user(&pool, user.user_id, status).await {
        Ok(reservations) => Ok(HttpResponse::Ok().json(ApiResponse::success(reservations))),
        Err(e) => {
            error!("Failed to list reservations: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to list reservations".to_string(),
            )))
        }
    }
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateReservationRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if let Err(response) = load_owned(&pool, id, &user).await {
        return Ok(response);
    }

    let update_data = UpdateReservation {
        starts_at: request.starts_at,
        ends_at: request.ends_at,
        total_price: request.total_price,
        currency: request.currency.clone(),
        origin: request.origin.clone(),
    };

    match Reservation::update(&pool, id, update_data).await {
        Ok(reservation) => Ok(HttpResponse::Ok().json(ApiResponse::success(reservation))),
        Err(ReservationError::InvalidWindow) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::<()>::error(ReservationError::InvalidWindow.to_string()),
        )),
        Err(ReservationError::NotFound { id }) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Reservation {} not found", id)),
        )),
        Err(e) => {
            error!("Failed to update reservation {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to update reservation".to_string(),
            )))
        }
    }
}

/// Confirms the reservation and, as the cross-aggregate follow-up, marks the
/// attached slot occupied. The slot write is best-effort: a failure is
/// logged for later reconciliation, the confirmation stands.
pub async fn confirm(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    request: Option<web::Json<ConfirmReservationRequest>>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if let Err(response) = load_owned(&pool, id, &user).await {
        return Ok(response);
    }

    let slot_id = request.and_then(|r| r.slot_id);
    match Reservation::confirm(&pool, id, slot_id).await {
        Ok(reservation) => {
            if let Some(slot_id) = reservation.slot_id {
                if let Err(e) =
                    Slot::set_operational_state(&pool, slot_id, operational_state::OCCUPIED).await
                {
                    warn!("Confirmed reservation {} but failed to occupy slot {}: {}", id, slot_id, e);
                }
            }
            info!("Confirmed reservation {}", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(reservation)))
        }
        Err(ReservationError::NotFound { id }) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Reservation {} not found", id)),
        )),
        Err(e) => {
            error!("Failed to confirm reservation {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to confirm reservation".to_string(),
            )))
        }
    }
}

/// Cancels the reservation and releases the slot back to operational,
/// best-effort like the confirm side effect.
pub async fn cancel(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    mailer: web::Data<Mailer>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if let Err(response) = load_owned(&pool, id, &user).await {
        return Ok(response);
    }

    match Reservation::cancel(&pool, id).await {
        Ok(reservation) => {
            if let Some(slot_id) = reservation.slot_id {
                if let Err(e) =
                    Slot::set_operational_state(&pool, slot_id, operational_state::OPERATIONAL)
                        .await
                {
                    warn!("Cancelled reservation {} but failed to release slot {}: {}", id, slot_id, e);
                }
            }

            if let Ok(Some(owner)) = User::find_by_id(&pool, reservation.user_id).await {
                mailer.send_reservation_cancelled(&owner, &reservation).await;
            }

            info!("Cancelled reservation {}", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(reservation)))
        }
        Err(ReservationError::NotFound { id }) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Reservation {} not found", id)),
        )),
        Err(e) => {
            error!("Failed to cancel reservation {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to cancel reservation".to_string(),
            )))
        }
    }
}

/// Creates a payment intent for this reservation.
pub async fn create_payment(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    paypal: web::Data<PayPalClient>,
    mercado_pago: web::Data<MercadoPagoClient>,
    mailer: web::Data<Mailer>,
    path: web::Path<Uuid>,
    request: web::Json<CreateReservationPaymentRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if let Err(response) = load_owned(&pool, id, &user).await {
        return Ok(response);
    }

    let service = PaymentService::new(&pool, &paypal, &mercado_pago, &mailer, &settings);
    let result = service
        .create_intent(CreateIntentInput {
            reservation_id: id,
            amount: request.amount,
            currency: request.currency.clone(),
            description: request.description.clone(),
            method_hint: request.method.clone(),
            back_urls: request.back_urls.clone(),
        })
        .await;

    match result {
        Ok(intent) => Ok(HttpResponse::Created().json(ApiResponse::success(intent))),
        Err(e @ PaymentServiceError::UnsupportedMethod { .. }) => {
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string())))
        }
        Err(PaymentServiceError::Payment(e)) => {
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string())))
        }
        Err(e) => {
            error!("Failed to create payment intent for reservation {}: {}", id, e);
            Ok(HttpResponse::BadGateway().json(ApiResponse::<()>::error(
                "Failed to create payment intent".to_string(),
            )))
        }
    }
}
