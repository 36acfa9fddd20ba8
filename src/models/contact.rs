use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub inquiry_type: Option<String>,
    pub status: ContactStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Nominal flow is new → read → replied → closed; the admin dashboard may
/// set any of the four directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Read,
    Replied,
    Closed,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
            ContactStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "read" => ContactStatus::Read,
            "replied" => ContactStatus::Replied,
            "closed" => ContactStatus::Closed,
            _ => ContactStatus::New,
        }
    }

    /// Strict variant for admin input: unknown strings are rejected instead
    /// of silently defaulting to `new`.
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(ContactStatus::New),
            "read" => Some(ContactStatus::Read),
            "replied" => Some(ContactStatus::Replied),
            "closed" => Some(ContactStatus::Closed),
            _ => None,
        }
    }
}
