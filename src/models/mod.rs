pub mod alert;
pub mod auth;
pub mod cancellation_policy;
pub mod establishment;
pub mod notification;
pub mod opinion;
pub mod parking_lot;
pub mod payment;
pub mod reservation;
pub mod slot;
pub mod tariff;
pub mod user;
