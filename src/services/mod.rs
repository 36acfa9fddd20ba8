pub mod accounts;
pub mod auth;
pub mod bookings;
pub mod contact;
pub mod sync;
pub mod views;
