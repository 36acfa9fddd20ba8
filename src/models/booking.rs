use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::profile::ProfileSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub owner_id: String,
    pub service_name: String,
    pub price: i64,
    pub pet_name: String,
    pub pet_type: String,
    pub pet_breed: Option<String>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "confirmed" => BookingStatus::Confirmed,
            "completed" => BookingStatus::Completed,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Pending,
        }
    }

    /// The admin status toggle: pending, confirmed, completed, then back
    /// to pending. Cancelled bookings cannot advance.
    pub fn advanced(&self) -> Option<BookingStatus> {
        match self {
            BookingStatus::Pending => Some(BookingStatus::Confirmed),
            BookingStatus::Confirmed => Some(BookingStatus::Completed),
            BookingStatus::Completed => Some(BookingStatus::Pending),
            BookingStatus::Cancelled => None,
        }
    }

    /// Cancellation is only legal before the service has been delivered.
    pub fn cancellable(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// A booking enriched with its owner's profile for the admin view.
/// `owner` is None when no profile row matches the booking's owner id;
/// consumers must handle the absence explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct AdminBooking {
    #[serde(flatten)]
    pub booking: Booking,
    pub owner: Option<ProfileSummary>,
}

