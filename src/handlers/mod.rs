pub mod admin;
pub mod bookings;
pub mod catalog;
pub mod contact;
pub mod health;
pub mod profile;
