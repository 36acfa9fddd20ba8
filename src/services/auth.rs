use axum::http::HeaderMap;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Role;

pub const SUBJECT_HEADER: &str = "x-subject-id";
pub const EMAIL_HEADER: &str = "x-subject-email";
pub const NAME_HEADER: &str = "x-subject-name";
pub const PHONE_HEADER: &str = "x-subject-phone";

/// Claims forwarded by the identity-terminating proxy. Only the subject
/// id is mandatory; the rest seed profile provisioning when present.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, AppError> {
    let subject_id = header_value(headers, SUBJECT_HEADER).ok_or(AppError::Unauthorized)?;

    Ok(Identity {
        subject_id,
        email: header_value(headers, EMAIL_HEADER),
        name: header_value(headers, NAME_HEADER),
        phone: header_value(headers, PHONE_HEADER),
    })
}

/// Resolve a subject's role. Missing profile or a failed lookup both
/// come back as User so a store hiccup can never grant admin access.
pub fn resolve_role(conn: &Connection, subject_id: &str) -> Role {
    match queries::get_role(conn, subject_id) {
        Ok(Some(role)) => role,
        Ok(None) => Role::User,
        Err(e) => {
            tracing::warn!(error = %e, subject_id, "role lookup failed, treating as user");
            Role::User
        }
    }
}

/// What a caller is trying to do. Every privileged code path funnels
/// through `authorize` with one of these.
#[derive(Debug, Clone)]
pub enum Action {
    ManageAllBookings,
    ManageUsers,
    ManageMessages,
    ManageBusinessInfo,
    CancelBooking { owner_id: String },
}

pub fn authorize(conn: &Connection, subject_id: &str, action: &Action) -> Result<(), AppError> {
    let role = resolve_role(conn, subject_id);
    if role == Role::Admin {
        return Ok(());
    }

    match action {
        Action::CancelBooking { owner_id } if owner_id == subject_id => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}
