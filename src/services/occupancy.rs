use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::database::connection::DbPool;
use crate::models::parking_lot::ParkingLot;
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::slot::{Slot, operational_state};

#[derive(Error, Debug)]
pub enum OccupancyError {
    #[error("Parking lot with ID {0} not found")]
    ParkingLotNotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Serialize)]
pub struct SlotOccupancy {
    pub id: Uuid,
    pub code: String,
    pub derived_state: String,
    pub occupied: bool,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct OccupancySummary {
    pub parking_lot_id: Uuid,
    pub at: DateTime<Utc>,
    pub total: usize,
    pub occupied: usize,
    pub free: usize,
    pub slots: Vec<SlotOccupancy>,
}

/// Whether this reservation holds the given slot at the given instant.
/// Cancelled reservations never hold a slot; the window is `[starts_at,
/// ends_at)`.
pub fn reservation_occupies(reservation: &Reservation, slot_id: Uuid, at: DateTime<Utc>) -> bool {
    reservation.slot_id == Some(slot_id)
        && reservation.status != ReservationStatus::Cancelled
        && reservation.starts_at <= at
        && reservation.ends_at > at
}

/// Point-in-time projection over a slot set. A slot is occupied when its
/// operational flag is anything but `operational`, or when an active
/// reservation overlaps the instant.
pub fn project(
    parking_lot_id: Uuid,
    slots: &[Slot],
    reservations: &[Reservation],
    at: DateTime<Utc>,
) -> OccupancySummary {
    let details: Vec<SlotOccupancy> = slots
        .iter()
        .map(|slot| {
            let reserved_now = reservations
                .iter()
                .any(|reservation| reservation_occupies(reservation, slot.id, at));
            let flag_occupies = slot.operational_state != operational_state::OPERATIONAL;
            let occupied = flag_occupies || reserved_now;

            let derived_state = if reserved_now && !flag_occupies {
                operational_state::OCCUPIED.to_string()
            } else {
                slot.operational_state.clone()
            };

            SlotOccupancy {
                id: slot.id,
                code: slot.code.clone(),
                derived_state,
                occupied,
                available: !occupied && slot.is_reservable,
            }
        })
        .collect();

    let occupied = details.iter().filter(|slot| slot.occupied).count();

    OccupancySummary {
        parking_lot_id,
        at,
        total: details.len(),
        occupied,
        free: details.len() - occupied,
        slots: details,
    }
}

/// Recomputed on every query; there is no cache or incremental index.
pub async fn project_parking_lot(
    pool: &DbPool,
    parking_lot_id: Uuid,
    at: DateTime<Utc>,
) -> Result<OccupancySummary, OccupancyError> {
    let lot = ParkingLot::find_by_id(pool, parking_lot_id)
        .await?
        .ok_or(OccupancyError::ParkingLotNotFound(parking_lot_id))?;

    let slots = Slot::find_by_parking_lot(pool, lot.id).await?;
    if slots.is_empty() {
        return Ok(project(lot.id, &[], &[], at));
    }

    let slot_ids: Vec<Uuid> = slots.iter().map(|slot| slot.id).collect();
    let reservations = Reservation::find_active_for_slots(pool, &slot_ids, at).await?;

    Ok(project(lot.id, &slots, &reservations, at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn slot(state: &str, reservable: bool) -> Slot {
        let now = Utc::now();
        Slot {
            id: Uuid::new_v4(),
            parking_lot_id: Uuid::new_v4(),
            code: "A-01".to_string(),
            kind: "car".to_string(),
            width_cm: 250,
            length_cm: 500,
            local_geometry: None,
            operational_state: state.to_string(),
            tariff_id: None,
            is_reservable: reservable,
            created_at: now,
            updated_at: now,
        }
    }

    fn reservation_for(slot_id: Uuid, status: ReservationStatus, at: DateTime<Utc>) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            slot_id: Some(slot_id),
            starts_at: at - Duration::hours(1),
            ends_at: at + Duration::hours(1),
            status,
            total_price: None,
            currency: "ARS".to_string(),
            origin: "web".to_string(),
            qr_payload: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn blocked_slot_is_occupied_without_reservations() {
        let now = Utc::now();
        let blocked = slot(operational_state::BLOCKED, true);
        let summary = project(blocked.parking_lot_id, &[blocked], &[], now);

        assert_eq!(summary.total, 1);
        assert_eq!(summary.occupied, 1);
        assert_eq!(summary.free, 0);
        assert!(summary.slots[0].occupied);
        assert!(!summary.slots[0].available);
        assert_eq!(summary.slots[0].derived_state, operational_state::BLOCKED);
    }

    #[test]
    fn active_reservation_occupies_operational_slot() {
        let now = Utc::now();
        let free_slot = slot(operational_state::OPERATIONAL, true);
        let reservation = reservation_for(free_slot.id, ReservationStatus::PendingPayment, now);
        let summary = project(free_slot.parking_lot_id, &[free_slot], &[reservation], now);

        assert!(summary.slots[0].occupied);
        assert_eq!(summary.slots[0].derived_state, operational_state::OCCUPIED);
    }

    #[test]
    fn cancelled_reservation_leaves_slot_free() {
        let now = Utc::now();
        let free_slot = slot(operational_state::OPERATIONAL, true);
        let reservation = reservation_for(free_slot.id, ReservationStatus::Cancelled, now);
        let summary = project(free_slot.parking_lot_id, &[free_slot], &[reservation], now);

        assert!(!summary.slots[0].occupied);
        assert!(summary.slots[0].available);
        assert_eq!(summary.free, 1);
    }

    #[test]
    fn window_is_half_open() {
        let now = Utc::now();
        let target = slot(operational_state::OPERATIONAL, true);
        let mut reservation = reservation_for(target.id, ReservationStatus::Confirmed, now);

        reservation.starts_at = now;
        reservation.ends_at = now + Duration::hours(1);
        assert!(reservation_occupies(&reservation, target.id, now));

        // The end bound is exclusive.
        assert!(!reservation_occupies(
            &reservation,
            target.id,
            reservation.ends_at
        ));
    }

    #[test]
    fn non_reservable_free_slot_is_not_available() {
        let now = Utc::now();
        let fixed = slot(operational_state::OPERATIONAL, false);
        let summary = project(fixed.parking_lot_id, &[fixed], &[], now);

        assert!(!summary.slots[0].occupied);
        assert!(!summary.slots[0].available);
    }
}
