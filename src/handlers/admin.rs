use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BusinessInfo, ContactMessage, Profile};
use crate::services::auth::{self, Action, Identity};
use crate::services::views::BookingStats;
use crate::services::{accounts, bookings, contact, views};
use crate::state::AppState;

fn require(
    state: &Arc<AppState>,
    headers: &HeaderMap,
    action: Action,
) -> Result<Identity, AppError> {
    let identity = auth::identity_from_headers(headers)?;
    let db = state.db.lock().unwrap();
    auth::authorize(&db, &identity.subject_id, &action)?;
    Ok(identity)
}

// ── Bookings ──

// GET /api/admin/bookings
pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    require(&state, &headers, Action::ManageAllBookings)?;

    let view = views::admin_view(&state)?;
    Ok(Json(view))
}

// POST /api/admin/bookings/:id/advance
pub async fn advance_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    require(&state, &headers, Action::ManageAllBookings)?;

    let booking = bookings::advance(&state, &id)?;
    Ok(Json(booking))
}

// DELETE /api/admin/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require(&state, &headers, Action::ManageAllBookings)?;

    bookings::delete(&state, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

// GET /api/admin/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BookingStats>, AppError> {
    require(&state, &headers, Action::ManageAllBookings)?;

    let (all_bookings, total_users) = {
        let db = state.db.lock().unwrap();
        (queries::get_all_bookings(&db)?, queries::count_profiles(&db)?)
    };

    Ok(Json(views::compute_stats(&all_bookings, total_users)))
}

// ── Users ──

// GET /api/admin/users
pub async fn get_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Profile>>, AppError> {
    require(&state, &headers, Action::ManageUsers)?;

    let profiles = {
        let db = state.db.lock().unwrap();
        queries::get_all_profiles(&db)?
    };
    Ok(Json(profiles))
}

// POST /api/admin/users/:id/role
pub async fn toggle_user_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    require(&state, &headers, Action::ManageUsers)?;

    let profile = accounts::toggle_role(&state, &id)?;
    Ok(Json(profile))
}

// DELETE /api/admin/users/:id
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require(&state, &headers, Action::ManageUsers)?;

    accounts::delete_account(&state, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

// ── Contact Messages ──

// GET /api/admin/messages
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ContactMessage>>, AppError> {
    require(&state, &headers, Action::ManageMessages)?;

    let messages = {
        let db = state.db.lock().unwrap();
        queries::get_all_contact_messages(&db)?
    };
    Ok(Json(messages))
}

// POST /api/admin/messages/:id/status
#[derive(Deserialize)]
pub struct MessageStatusRequest {
    pub status: String,
}

pub async fn update_message_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<MessageStatusRequest>,
) -> Result<Json<ContactMessage>, AppError> {
    require(&state, &headers, Action::ManageMessages)?;

    let message = contact::set_status(&state, &id, &body.status)?;
    Ok(Json(message))
}

// DELETE /api/admin/messages/:id
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require(&state, &headers, Action::ManageMessages)?;

    contact::remove(&state, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

// ── Business Info ──

// POST /api/admin/business-info
//
// Partial update: absent fields keep their current value, with the
// default card as the base when nothing is stored yet.
#[derive(Deserialize)]
pub struct BusinessInfoUpdate {
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub business_hours: Option<String>,
    pub description: Option<String>,
}

pub async fn update_business_info(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<BusinessInfoUpdate>,
) -> Result<Json<BusinessInfo>, AppError> {
    require(&state, &headers, Action::ManageBusinessInfo)?;

    let info = {
        let db = state.db.lock().unwrap();
        let now = Utc::now().naive_utc();
        let mut info =
            queries::get_business_info(&db)?.unwrap_or_else(|| BusinessInfo::default_card(now));

        if let Some(v) = body.business_name {
            info.business_name = v;
        }
        if let Some(v) = body.phone {
            info.phone = v;
        }
        if let Some(v) = body.email {
            info.email = v;
        }
        if let Some(v) = body.address {
            info.address = v;
        }
        if let Some(v) = body.city {
            info.city = v;
        }
        if let Some(v) = body.state {
            info.state = v;
        }
        if let Some(v) = body.postal_code {
            info.postal_code = v;
        }
        if let Some(v) = body.country {
            info.country = v;
        }
        if let Some(v) = body.business_hours {
            info.business_hours = v;
        }
        if let Some(v) = body.description {
            info.description = v;
        }
        info.updated_at = now;

        queries::save_business_info(&db, &info)?;
        info
    };

    Ok(Json(info))
}
