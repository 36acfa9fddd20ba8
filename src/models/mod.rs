pub mod booking;
pub mod business;
pub mod contact;
pub mod profile;
pub mod service;

pub use booking::{AdminBooking, Booking, BookingStatus};
pub use business::BusinessInfo;
pub use contact::{ContactMessage, ContactStatus};
pub use profile::{Profile, ProfileSummary, Role};
pub use service::Service;
