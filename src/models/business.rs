use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Single-row (`id = "default"`) business card shown on the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessInfo {
    pub id: String,
    pub business_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub business_hours: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BusinessInfo {
    /// Fallback card served when the row has not been created yet or the
    /// lookup fails. Matches what the marketing pages show by default.
    pub fn default_card(now: NaiveDateTime) -> Self {
        Self {
            id: "default".to_string(),
            business_name: "Bark & Brew".to_string(),
            phone: "+91 79 1234 5678".to_string(),
            email: "hello@barkandbrew.com".to_string(),
            address: "Sector 17, Gandhinagar".to_string(),
            city: "Gandhinagar".to_string(),
            state: "Gujarat".to_string(),
            postal_code: "382017".to_string(),
            country: "India".to_string(),
            business_hours: "Mon-Sun: 7AM - 8PM".to_string(),
            description: "Where pets meet perfect coffee. Experience the best pet café and professional care services in the heart of Gandhinagar.".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
