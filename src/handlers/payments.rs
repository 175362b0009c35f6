use crate::{
    config::Settings,
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::{payment::Payment, reservation::Reservation},
    requests::payment::{CreateIntentRequest, ReturnQuery, WebhookQuery},
    services::email::Mailer,
    services::mercado_pago::MercadoPagoClient,
    services::payments::{CreateIntentInput, PaymentService, PaymentServiceError},
    services::paypal::PayPalClient,
    utils::helpers::ApiResponse,
};
use actix_web::{HttpResponse, Result, web};
use tracing::{error, info, warn};
use uuid::Uuid;

pub async fn create_intent(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    paypal: web::Data<PayPalClient>,
    mercado_pago: web::Data<MercadoPagoClient>,
    mailer: web::Data<Mailer>,
    request: web::Json<CreateIntentRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    info!(
        "Creating payment intent for reservation {} by user {}",
        request.reservation_id, user.user_id
    );

    let service = PaymentService::new(&pool, &paypal, &mercado_pago, &mailer, &settings);
    let result = service
        .create_intent(CreateIntentInput {
            reservation_id: request.reservation_id,
            amount: request.amount,
            currency: request.currency.clone(),
            description: request.description.clone(),
            method_hint: request.method.clone(),
            back_urls: request.back_urls.clone(),
        })
        .await;

    match result {
        Ok(intent) => Ok(HttpResponse::Created().json(ApiResponse::success(intent))),
        Err(PaymentServiceError::ReservationNotFound(id)) => Ok(HttpResponse::NotFound().json(
            ApiResponse::<()>::error(format!("Reservation {} not found", id)),
        )),
        Err(e @ PaymentServiceError::UnsupportedMethod { .. }) => {
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string())))
        }
        Err(PaymentServiceError::Payment(e)) => {
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string())))
        }
        Err(e) => {
            error!("Failed to create payment intent: {}", e);
            Ok(HttpResponse::BadGateway().json(ApiResponse::<()>::error(
                "Failed to create payment intent".to_string(),
            )))
        }
    }
}

pub async fn get_payment(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let payment_id = path.into_inner();

    let payment = match Payment::find_by_id(&pool, payment_id).await {
        Ok(Some(payment)) => payment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
                "Payment {} not found",
                payment_id
            ))));
        }
        Err(e) => {
            error!("Failed to load payment {}: {}", payment_id, e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load payment".to_string(),
            )));
        }
    };

    if !user.is_admin() {
        match Reservation::find_by_id(&pool, payment.reservation_id).await {
            Ok(Some(reservation)) if reservation.user_id == user.user_id => {}
            Ok(_) => {
                return Ok(HttpResponse::Forbidden()
                    .json(ApiResponse::<()>::error("Access denied".to_string())));
            }
            Err(e) => {
                error!("Failed to check payment ownership: {}", e);
                return Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                    "Failed to load payment".to_string(),
                )));
            }
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(payment)))
}

pub async fn list_by_reservation(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let reservation_id = path.into_inner();

    match Reservation::find_by_id(&pool, reservation_id).await {
        Ok(Some(reservation)) if reservation.user_id == user.user_id || user.is_admin() => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Forbidden()
                .json(ApiResponse::<()>::error("Access denied".to_string())));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
                "Reservation {} not found",
                reservation_id
            ))));
        }
        Err(e) => {
            error!("Failed to load reservation {}: {}", reservation_id, e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to list payments".to_string(),
            )));
        }
    }

    match Payment::find_by_reservation(&pool, reservation_id).await {
        Ok(payments) => Ok(HttpResponse::Ok().json(ApiResponse::success(payments))),
        Err(e) => {
            error!("Failed to list payments: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to list payments".to_string(),
            )))
        }
    }
}

/// Provider webhook. Accepts the PayPal JSON event form and the Mercado
/// Pago query-string form; always answers `200 {ok:true}` so the provider
/// does not retry-storm on internal failures.
pub async fn webhook(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    paypal: web::Data<PayPalClient>,
    mercado_pago: web::Data<MercadoPagoClient>,
    mailer: web::Data<Mailer>,
    query: web::Query<WebhookQuery>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let service = PaymentService::new(&pool, &paypal, &mercado_pago, &mailer, &settings);
    let event: Option<serde_json::Value> = serde_json::from_slice(&body).ok();

    // `data.id` in the current form, `id` in the legacy topic form.
    let data_id = query
        .data_id
        .clone()
        .or_else(|| {
            event
                .as_ref()
                .and_then(|e| e["data"]["id"].as_str().map(str::to_string))
        })
        .or_else(|| query.topic.as_ref().and_then(|_| query.id.clone()));

    if let Some(data_id) = data_id {
        let topic = query
            .kind
            .clone()
            .or_else(|| query.topic.clone())
            .unwrap_or_else(|| "payment".to_string());

        match service.handle_mp_notification(&topic, &data_id).await {
            Ok(Some(report)) => info!(
                "Reconciled Mercado Pago notification {}: status={:?} failures={:?}",
                data_id, report.domain_status, report.failures
            ),
            Ok(None) => warn!("Unmatched Mercado Pago notification: {}", data_id),
            Err(e) => error!("Mercado Pago reconciliation failed for {}: {}", data_id, e),
        }
    } else if let Some(event) = event.filter(|e| e.get("resource").is_some()) {
        match service.handle_paypal_event(&event).await {
            Ok(Some(report)) => info!(
                "Reconciled PayPal event: status={:?} failures={:?}",
                report.domain_status, report.failures
            ),
            Ok(None) => warn!("Unmatched PayPal event"),
            Err(e) => error!("PayPal reconciliation failed: {}", e),
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

fn static_page(title: &str, message: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body style="font-family: Arial, sans-serif; text-align: center; padding-top: 4rem;">
    <h1>{title}</h1>
    <p>{message}</p>
    <p>You can close this window and return to the app.</p>
</body>
</html>"#
        ))
}

/// PayPal success redirect: capture the order synchronously, then render a
/// confirmation page. Reconciliation failures still render the page; the
/// webhook path will settle the payment later.
pub async fn return_success(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    paypal: web::Data<PayPalClient>,
    mercado_pago: web::Data<MercadoPagoClient>,
    mailer: web::Data<Mailer>,
    query: web::Query<ReturnQuery>,
) -> Result<HttpResponse> {
    if let Some(order_id) = query.token.as_deref() {
        let service = PaymentService::new(&pool, &paypal, &mercado_pago, &mailer, &settings);
        match service.capture_by_order_id(order_id).await {
            Ok(Some(report)) => info!(
                "Captured order {}: status={:?} failures={:?}",
                order_id, report.domain_status, report.failures
            ),
            Ok(None) => warn!("Captured order {} has no matching payment", order_id),
            Err(e) => error!("Capture failed for order {}: {}", order_id, e),
        }
    }

    Ok(static_page(
        "Payment received",
        "Thanks! Your payment was processed and your reservation is being confirmed.",
    ))
}

pub async fn return_pending(_query: web::Query<ReturnQuery>) -> Result<HttpResponse> {
    Ok(static_page(
        "Payment pending",
        "Your payment is still being processed. We will confirm your reservation as soon as the provider notifies us.",
    ))
}

pub async fn return_failure(_query: web::Query<ReturnQuery>) -> Result<HttpResponse> {
    Ok(static_page(
        "Payment not completed",
        "The payment was cancelled or rejected. No charges were made.",
    ))
}
