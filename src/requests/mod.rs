pub mod alert;
pub mod cancellation_policy;
pub mod establishment;
pub mod opinion;
pub mod parking_lot;
pub mod payment;
pub mod reservation;
pub mod slot;
pub mod tariff;
