use lazy_static::lazy_static;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::Settings;
use crate::database::connection::DbPool;
use crate::models::notification::{CreateNotification, Notification};
use crate::models::payment::{CreatePayment, Payment, PaymentError, UpdatePaymentStatus, status};
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::slot::{Slot, operational_state};
use crate::models::user::User;
use crate::services::email::Mailer;
use crate::services::mercado_pago::{
    CreatePreferenceInput, MercadoPagoClient, MercadoPagoError, PreferenceItem,
};
use crate::services::paypal::{
    BackUrls, CreateOrderInput, PayPalClient, PayPalError, ProviderOrder,
};

/// Fallback method tags tried after the caller's hint, in order. The
/// payments table historically accepted a narrower set than the configured
/// providers, so intent creation resolves against the configured list
/// instead of retrying rejected inserts.
const FALLBACK_METHODS: [&str; 6] = [
    "paypal",
    "mercadopago",
    "mp",
    "online",
    "tarjeta",
    "efectivo",
];

lazy_static! {
    static ref PAYPAL_STATUS_MAP: HashMap<&'static str, &'static str> = HashMap::from([
        ("COMPLETED", status::APPROVED),
        ("APPROVED", status::PENDING),
        ("CREATED", status::PENDING),
        ("SAVED", status::PENDING),
        ("PAYER_ACTION_REQUIRED", status::PENDING),
        ("PENDING", status::PENDING),
        ("VOIDED", status::CANCELLED),
        ("DECLINED", status::REJECTED),
        ("REFUNDED", status::REFUNDED),
        ("PARTIALLY_REFUNDED", status::REFUNDED),
    ]);
    static ref MP_STATUS_MAP: HashMap<&'static str, &'static str> = HashMap::from([
        ("approved", status::APPROVED),
        ("pending", status::PENDING),
        ("in_process", status::PENDING),
        ("authorized", status::PENDING),
        ("rejected", status::REJECTED),
        ("cancelled", status::CANCELLED),
        ("refunded", status::REFUNDED),
        ("charged_back", status::REFUNDED),
    ]);
}

/// Maps a PayPal order/capture status to the domain status. Unknown
/// statuses pass through lower-cased rather than failing the webhook.
pub fn map_paypal_status(provider_status: &str) -> String {
    let normalized = provider_status.to_uppercase();
    PAYPAL_STATUS_MAP
        .get(normalized.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| provider_status.to_lowercase())
}

/// Same contract as [`map_paypal_status`] for the Mercado Pago vocabulary.
pub fn map_mp_status(provider_status: &str) -> String {
    let normalized = provider_status.to_lowercase();
    MP_STATUS_MAP
        .get(normalized.as_str())
        .map(|s| s.to_string())
        .unwrap_or(normalized)
}

/// Ordered, de-duplicated candidate list: the caller's hint first, then the
/// fixed fallbacks.
pub fn method_candidates(hint: Option<&str>) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let hinted = hint.map(|h| h.trim().to_lowercase()).filter(|h| !h.is_empty());
    for candidate in hinted.iter().map(String::as_str).chain(FALLBACK_METHODS) {
        if !candidates.iter().any(|c| c == candidate) {
            candidates.push(candidate.to_string());
        }
    }
    candidates
}

/// Picks the first candidate present in the configured accepted list.
pub fn resolve_method(
    hint: Option<&str>,
    accepted: &[String],
) -> Result<String, PaymentServiceError> {
    let candidates = method_candidates(hint);
    candidates
        .iter()
        .find(|candidate| {
            accepted
                .iter()
                .any(|a| a.eq_ignore_ascii_case(candidate.as_str()))
        })
        .cloned()
        .ok_or(PaymentServiceError::UnsupportedMethod { tried: candidates })
}

#[derive(Error, Debug)]
pub enum PaymentServiceError {
    #[error("No accepted payment method among candidates: {tried:?}")]
    UnsupportedMethod { tried: Vec<String> },
    #[error("Reservation with ID {0} not found")]
    ReservationNotFound(Uuid),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("PayPal provider error: {0}")]
    PayPal(#[from] PayPalError),
    #[error("Mercado Pago provider error: {0}")]
    MercadoPago(#[from] MercadoPagoError),
}

#[derive(Debug, Clone)]
pub struct CreateIntentInput {
    pub reservation_id: Uuid,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub method_hint: Option<String>,
    pub back_urls: Option<BackUrls>,
}

/// A persisted Payment plus the provider payload the caller uses to
/// redirect the end user.
#[derive(Debug, Serialize)]
pub struct PaymentIntent {
    pub payment: Payment,
    pub order: ProviderOrder,
}

/// Cross-aggregate follow-ups after an approved settlement. Executed one by
/// one; failures are recorded, never silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeAction {
    ConfirmReservation { reservation_id: Uuid },
    OccupySlot { slot_id: Uuid },
    NotifyUser { user_id: Uuid },
}

#[derive(Debug, Default)]
pub struct CascadePlan {
    pub actions: Vec<CascadeAction>,
    pub skipped: Vec<String>,
}

/// Decides the follow-up actions for a settled payment. A cancelled
/// reservation is never resurrected by a late approval: the payment keeps
/// the approved status (the funds did move) but the reservation and slot
/// are left untouched.
pub fn cascade_plan(domain_status: &str, reservation: &Reservation) -> CascadePlan {
    if domain_status != status::APPROVED {
        return CascadePlan::default();
    }

    if reservation.status == ReservationStatus::Cancelled {
        return CascadePlan {
            actions: Vec::new(),
            skipped: vec![format!(
                "reservation {} is cancelled; approval recorded on payment only",
                reservation.id
            )],
        };
    }

    let mut actions = vec![CascadeAction::ConfirmReservation {
        reservation_id: reservation.id,
    }];
    if let Some(slot_id) = reservation.slot_id {
        actions.push(CascadeAction::OccupySlot { slot_id });
    }
    actions.push(CascadeAction::NotifyUser {
        user_id: reservation.user_id,
    });

    CascadePlan {
        actions,
        skipped: Vec::new(),
    }
}

/// Outcome of one reconciliation pass. The webhook endpoint reports success
/// to the provider regardless; this report is what gets logged and returned
/// to internal callers.
#[derive(Debug, Default, Serialize)]
pub struct SettlementReport {
    pub payment: Option<Payment>,
    pub domain_status: Option<String>,
    pub reservation_confirmed: bool,
    pub slot_occupied: bool,
    pub skipped: Vec<String>,
    pub failures: Vec<String>,
}

pub struct PaymentService<'a> {
    pool: &'a DbPool,
    paypal: &'a PayPalClient,
    mercado_pago: &'a MercadoPagoClient,
    mailer: &'a Mailer,
    settings: &'a Settings,
}

impl<'a> PaymentService<'a> {
    pub fn new(
        pool: &'a DbPool,
        paypal: &'a PayPalClient,
        mercado_pago: &'a MercadoPagoClient,
        mailer: &'a Mailer,
        settings: &'a Settings,
    ) -> Self {
        Self {
            pool,
            paypal,
            mercado_pago,
            mailer,
            settings,
        }
    }

    fn default_back_urls(&self) -> BackUrls {
        let base = self.settings.server.public_url();
        BackUrls {
            success: Some(format!("{base}/api/payments/return/success")),
            pending: Some(format!("{base}/api/payments/return/pending")),
            failure: Some(format!("{base}/api/payments/return/failure")),
        }
    }

    /// Creates the Payment row and the matching provider order/preference.
    /// If the provider call fails the Payment stays `pendiente` without a
    /// provider reference; rows are never deleted, so the attempt remains
    /// inspectable and retryable.
    pub async fn create_intent(
        &self,
        input: CreateIntentInput,
    ) -> Result<PaymentIntent, PaymentServiceError> {
        let reservation = Reservation::find_by_id(self.pool, input.reservation_id)
            .await?
            .ok_or(PaymentServiceError::ReservationNotFound(input.reservation_id))?;

        let method = resolve_method(
            input.method_hint.as_deref(),
            &self.settings.payments.accepted_methods,
        )?;
        let currency = input
            .currency
            .unwrap_or_else(|| self.settings.payments.default_currency.clone());

        let payment = Payment::create(
            self.pool,
            CreatePayment {
                reservation_id: reservation.id,
                method: method.clone(),
                amount: input.amount,
                currency: currency.clone(),
            },
        )
        .await?;

        let back_urls = input.back_urls.unwrap_or_else(|| self.default_back_urls());
        let description = input
            .description
            .clone()
            .unwrap_or_else(|| "Parking reservation".to_string());

        let order = if matches!(method.as_str(), "mercadopago" | "mp") {
            self.mercado_pago
                .create_preference(CreatePreferenceInput {
                    external_reference: payment.id.to_string(),
                    items: vec![PreferenceItem {
                        title: description,
                        description: None,
                        quantity: 1,
                        currency_id: currency,
                        unit_price: input.amount,
                    }],
                    back_urls,
                    notification_url: None,
                })
                .await?
        } else {
            self.paypal
                .create_order(CreateOrderInput {
                    reference_id: payment.id.to_string(),
                    amount: input.amount,
                    currency,
                    description: Some(description),
                    back_urls,
                })
                .await?
        };

        let payment = Payment::update_status(
            self.pool,
            payment.id,
            UpdatePaymentStatus {
                provider_tx_id: Some(order.id.clone()),
                ..Default::default()
            },
        )
        .await?;

        info!(
            payment_id = %payment.id,
            reservation_id = %payment.reservation_id,
            method = %payment.method,
            provider_tx_id = %order.id,
            "Created payment intent"
        );

        Ok(PaymentIntent { payment, order })
    }

    /// Persists a provider-reported status and, on approval, runs the
    /// confirmation cascade. Cascade failures are collected in the report
    /// and logged; they never propagate, so webhook responses stay 200.
    pub async fn apply_provider_status(
        &self,
        payment: Payment,
        domain_status: String,
        provider_tx_id: Option<String>,
        receipt_url: Option<String>,
    ) -> Result<SettlementReport, PaymentServiceError> {
        let payment = Payment::update_status(
            self.pool,
            payment.id,
            UpdatePaymentStatus {
                status: Some(domain_status.clone()),
                provider_tx_id,
                receipt_url,
            },
        )
        .await?;

        let mut report = SettlementReport {
            domain_status: Some(domain_status.clone()),
            ..Default::default()
        };

        let Some(reservation) = Reservation::find_by_id(self.pool, payment.reservation_id).await?
        else {
            report
                .failures
                .push(format!("reservation {} not found", payment.reservation_id));
            report.payment = Some(payment);
            return Ok(report);
        };

        let plan = cascade_plan(&domain_status, &reservation);
        for note in &plan.skipped {
            warn!(payment_id = %payment.id, "{note}");
        }
        report.skipped = plan.skipped;

        for action in plan.actions {
            if let Err(message) = self.execute_cascade_action(&action, &payment).await {
                error!(payment_id = %payment.id, "Settlement cascade action failed: {message}");
                report.failures.push(message);
            } else {
                match action {
                    CascadeAction::ConfirmReservation { .. } => {
                        report.reservation_confirmed = true
                    }
                    CascadeAction::OccupySlot { .. } => report.slot_occupied = true,
                    CascadeAction::NotifyUser { .. } => {}
                }
            }
        }

        report.payment = Some(payment);
        Ok(report)
    }

    async fn execute_cascade_action(
        &self,
        action: &CascadeAction,
        payment: &Payment,
    ) -> Result<(), String> {
        match action {
            CascadeAction::ConfirmReservation { reservation_id } => {
                Reservation::confirm(self.pool, *reservation_id, None)
                    .await
                    .map(|_| ())
                    .map_err(|e| format!("confirm reservation {reservation_id}: {e}"))
            }
            CascadeAction::OccupySlot { slot_id } => {
                Slot::set_operational_state(self.pool, *slot_id, operational_state::OCCUPIED)
                    .await
                    .map(|_| ())
                    .map_err(|e| format!("occupy slot {slot_id}: {e}"))
            }
            CascadeAction::NotifyUser { user_id } => {
                Notification::create(
                    self.pool,
                    CreateNotification {
                        user_id: *user_id,
                        kind: "payment_approved".to_string(),
                        title: "Payment approved".to_string(),
                        body: Some(format!(
                            "Your payment of {} {} was approved.",
                            payment.amount, payment.currency
                        )),
                    },
                )
                .await
                .map_err(|e| format!("notify user {user_id}: {e}"))?;

                if let Ok(Some(user)) = User::find_by_id(self.pool, *user_id).await {
                    self.mailer.send_payment_approved(&user, payment).await;
                }
                Ok(())
            }
        }
    }

    /// Webhook reconciliation for a PayPal event. Returns `None` when the
    /// event does not resolve to a known payment; the endpoint still
    /// answers 200.
    pub async fn handle_paypal_event(
        &self,
        event: &serde_json::Value,
    ) -> Result<Option<SettlementReport>, PaymentServiceError> {
        let Some(resource) = event.get("resource") else {
            return Ok(None);
        };

        let order_id = resource["id"].as_str().map(str::to_string);
        let mut reference = paypal_external_reference(resource);
        let mut provider_status = resource["status"].as_str().map(str::to_string);

        // The capture/refund resources do not always echo the reference;
        // re-read the order from the provider in that case.
        if reference.is_none() {
            if let Some(order_id) = order_id.as_deref() {
                let order = self.paypal.get_order(order_id).await?;
                reference = paypal_external_reference(&order);
                if provider_status.is_none() {
                    provider_status = order["status"].as_str().map(str::to_string);
                }
            }
        }

        let Some(provider_status) = provider_status else {
            return Ok(None);
        };
        let domain_status = map_paypal_status(&provider_status);

        let payment = self
            .find_payment(reference.as_deref(), order_id.as_deref())
            .await?;
        let Some(payment) = payment else {
            warn!(?order_id, "PayPal event does not match any payment");
            return Ok(None);
        };

        let receipt_url = paypal_self_link(resource);
        self.apply_provider_status(payment, domain_status, order_id, receipt_url)
            .await
            .map(Some)
    }

    /// Webhook reconciliation for a Mercado Pago notification
    /// (`type`/`topic` + `data.id` form).
    pub async fn handle_mp_notification(
        &self,
        topic: &str,
        data_id: &str,
    ) -> Result<Option<SettlementReport>, PaymentServiceError> {
        match topic {
            "payment" => {
                let mp_payment = self.mercado_pago.get_payment(data_id).await?;
                let reference = mp_payment["external_reference"].as_str().map(str::to_string);
                let Some(provider_status) = mp_payment["status"].as_str() else {
                    return Ok(None);
                };
                let receipt_url = mp_payment["receipt_url"]
                    .as_str()
                    .or_else(|| mp_payment["ticket_url"].as_str())
                    .map(str::to_string);

                let Some(payment) = self.find_payment(reference.as_deref(), None).await? else {
                    warn!(data_id, "Mercado Pago payment does not match any payment");
                    return Ok(None);
                };

                let tx_id = json_id_to_string(&mp_payment["id"]);
                self.apply_provider_status(
                    payment,
                    map_mp_status(provider_status),
                    tx_id,
                    receipt_url,
                )
                .await
                .map(Some)
            }
            "merchant_order" => {
                let order = self.mercado_pago.get_merchant_order(data_id).await?;
                let reference = order["external_reference"].as_str().map(str::to_string);
                let Some(last) = order["payments"]
                    .as_array()
                    .and_then(|payments| payments.last())
                else {
                    return Ok(None);
                };
                let Some(provider_status) = last["status"].as_str() else {
                    return Ok(None);
                };

                let Some(payment) = self.find_payment(reference.as_deref(), None).await? else {
                    warn!(data_id, "Merchant order does not match any payment");
                    return Ok(None);
                };

                self.apply_provider_status(
                    payment,
                    map_mp_status(provider_status),
                    json_id_to_string(&last["id"]),
                    None,
                )
                .await
                .map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Synchronous return flow: capture the order, then reconcile exactly
    /// like a webhook would.
    pub async fn capture_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<SettlementReport>, PaymentServiceError> {
        let capture = self.paypal.capture_order(order_id).await?;

        let provider_status = capture["status"]
            .as_str()
            .or_else(|| {
                capture["purchase_units"][0]["payments"]["captures"][0]["status"].as_str()
            })
            .unwrap_or("COMPLETED");
        let domain_status = map_paypal_status(provider_status);
        let receipt_url = paypal_self_link(&capture);

        let Some(payment) = Payment::find_by_provider_tx_id(self.pool, order_id).await? else {
            warn!(order_id, "Captured order does not match any payment");
            return Ok(None);
        };

        self.apply_provider_status(
            payment,
            domain_status,
            Some(order_id.to_string()),
            receipt_url,
        )
        .await
        .map(Some)
    }

    /// The external reference is our payment id; fall back to the stored
    /// provider reference when the echo is missing.
    async fn find_payment(
        &self,
        reference: Option<&str>,
        order_id: Option<&str>,
    ) -> Result<Option<Payment>, PaymentServiceError> {
        if let Some(payment_id) = reference.and_then(|r| Uuid::parse_str(r).ok()) {
            if let Some(payment) = Payment::find_by_id(self.pool, payment_id).await? {
                return Ok(Some(payment));
            }
        }
        if let Some(order_id) = order_id {
            return Ok(Payment::find_by_provider_tx_id(self.pool, order_id).await?);
        }
        Ok(None)
    }
}

fn paypal_external_reference(resource: &serde_json::Value) -> Option<String> {
    resource["purchase_units"][0]["reference_id"]
        .as_str()
        .or_else(|| resource["custom_id"].as_str())
        .map(str::to_string)
}

fn paypal_self_link(resource: &serde_json::Value) -> Option<String> {
    resource["links"]
        .as_array()
        .and_then(|links| links.iter().find(|l| l["rel"].as_str() == Some("self")))
        .and_then(|l| l["href"].as_str())
        .map(str::to_string)
}

fn json_id_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn accepted(methods: &[&str]) -> Vec<String> {
        methods.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn candidates_start_with_hint_and_deduplicate() {
        let candidates = method_candidates(Some("mercadopago"));
        assert_eq!(candidates[0], "mercadopago");
        assert_eq!(
            candidates.iter().filter(|c| *c == "mercadopago").count(),
            1
        );
        assert_eq!(candidates.len(), FALLBACK_METHODS.len());

        let no_hint = method_candidates(None);
        assert_eq!(no_hint[0], "paypal");
    }

    #[test]
    fn unsupported_hint_falls_back_to_accepted_method() {
        let method = resolve_method(Some("applepay"), &accepted(&["paypal", "mercadopago"]));
        assert_eq!(method.unwrap(), "paypal");
    }

    #[test]
    fn hint_wins_when_accepted() {
        let method = resolve_method(Some("MP"), &accepted(&["paypal", "mp"]));
        assert_eq!(method.unwrap(), "mp");
    }

    #[test]
    fn no_accepted_method_reports_candidates_tried() {
        let error = resolve_method(Some("applepay"), &accepted(&["bitcoin"])).unwrap_err();
        match error {
            PaymentServiceError::UnsupportedMethod { tried } => {
                assert_eq!(tried[0], "applepay");
                assert!(tried.contains(&"paypal".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn paypal_statuses_map_to_domain_vocabulary() {
        assert_eq!(map_paypal_status("COMPLETED"), status::APPROVED);
        assert_eq!(map_paypal_status("completed"), status::APPROVED);
        assert_eq!(map_paypal_status("APPROVED"), status::PENDING);
        assert_eq!(map_paypal_status("CREATED"), status::PENDING);
        assert_eq!(map_paypal_status("SAVED"), status::PENDING);
        assert_eq!(map_paypal_status("PAYER_ACTION_REQUIRED"), status::PENDING);
        assert_eq!(map_paypal_status("PENDING"), status::PENDING);
        assert_eq!(map_paypal_status("VOIDED"), status::CANCELLED);
        assert_eq!(map_paypal_status("DECLINED"), status::REJECTED);
        assert_eq!(map_paypal_status("REFUNDED"), status::REFUNDED);
        assert_eq!(map_paypal_status("PARTIALLY_REFUNDED"), status::REFUNDED);
    }

    #[test]
    fn mp_statuses_map_to_domain_vocabulary() {
        assert_eq!(map_mp_status("approved"), status::APPROVED);
        assert_eq!(map_mp_status("pending"), status::PENDING);
        assert_eq!(map_mp_status("in_process"), status::PENDING);
        assert_eq!(map_mp_status("authorized"), status::PENDING);
        assert_eq!(map_mp_status("rejected"), status::REJECTED);
        assert_eq!(map_mp_status("cancelled"), status::CANCELLED);
        assert_eq!(map_mp_status("refunded"), status::REFUNDED);
        assert_eq!(map_mp_status("charged_back"), status::REFUNDED);
    }

    #[test]
    fn unknown_statuses_pass_through_lower_cased() {
        assert_eq!(map_paypal_status("WEIRD_STATE"), "weird_state");
        assert_eq!(map_mp_status("Some_New_State"), "some_new_state");
        // Mapping is pure: replaying the same status yields the same result.
        assert_eq!(map_paypal_status("COMPLETED"), map_paypal_status("COMPLETED"));
    }

    fn reservation_with(
        status: ReservationStatus,
        slot_id: Option<Uuid>,
    ) -> Reservation {
        let now = Utc::now();
        Reservation {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            slot_id,
            starts_at: now,
            ends_at: now + Duration::hours(2),
            status,
            total_price: None,
            currency: "ARS".to_string(),
            origin: "web".to_string(),
            qr_payload: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn approved_payment_confirms_occupies_and_notifies() {
        let slot_id = Uuid::new_v4();
        let reservation = reservation_with(ReservationStatus::PendingPayment, Some(slot_id));
        let plan = cascade_plan(status::APPROVED, &reservation);

        assert_eq!(
            plan.actions,
            vec![
                CascadeAction::ConfirmReservation {
                    reservation_id: reservation.id
                },
                CascadeAction::OccupySlot { slot_id },
                CascadeAction::NotifyUser {
                    user_id: reservation.user_id
                },
            ]
        );
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn approved_payment_without_slot_skips_slot_action() {
        let reservation = reservation_with(ReservationStatus::PendingPayment, None);
        let plan = cascade_plan(status::APPROVED, &reservation);
        assert!(!plan
            .actions
            .iter()
            .any(|a| matches!(a, CascadeAction::OccupySlot { .. })));
    }

    #[test]
    fn cancelled_reservation_is_not_resurrected() {
        let reservation = reservation_with(ReservationStatus::Cancelled, Some(Uuid::new_v4()));
        let plan = cascade_plan(status::APPROVED, &reservation);
        assert!(plan.actions.is_empty());
        assert_eq!(plan.skipped.len(), 1);
    }

    #[test]
    fn non_approved_statuses_have_no_cascade() {
        let reservation = reservation_with(ReservationStatus::PendingPayment, Some(Uuid::new_v4()));
        for domain_status in [status::PENDING, status::REJECTED, status::CANCELLED, status::REFUNDED] {
            let plan = cascade_plan(domain_status, &reservation);
            assert!(plan.actions.is_empty(), "{domain_status} should not cascade");
        }
    }

    #[test]
    fn paypal_reference_extraction_prefers_purchase_unit() {
        let resource = serde_json::json!({
            "id": "ORDER-1",
            "purchase_units": [{"reference_id": "11111111-2222-3333-4444-555555555555"}],
            "custom_id": "ignored",
        });
        assert_eq!(
            paypal_external_reference(&resource).unwrap(),
            "11111111-2222-3333-4444-555555555555"
        );

        let capture_only = serde_json::json!({"id": "CAP-1", "custom_id": "ref-9"});
        assert_eq!(paypal_external_reference(&capture_only).unwrap(), "ref-9");
        assert!(paypal_external_reference(&serde_json::json!({"id": "X"})).is_none());
    }

    #[test]
    fn numeric_provider_ids_become_strings() {
        assert_eq!(
            json_id_to_string(&serde_json::json!(123456789)).unwrap(),
            "123456789"
        );
        assert_eq!(json_id_to_string(&serde_json::json!("abc")).unwrap(), "abc");
        assert!(json_id_to_string(&serde_json::Value::Null).is_none());
    }
}
