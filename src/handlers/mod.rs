pub mod alerts;
pub mod auth;
pub mod cancellation_policies;
pub mod establishments;
pub mod notifications;
pub mod opinions;
pub mod parking_lots;
pub mod payments;
pub mod reservations;
pub mod slots;
pub mod tariffs;
pub mod users;
