use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A bookable service from the catalog. Bookings snapshot `name` and `price`
/// at creation time; later catalog edits never touch existing bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub duration_minutes: i64,
    pub category: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}
