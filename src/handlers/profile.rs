use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::Profile;
use crate::services::{accounts, auth};
use crate::state::AppState;

// GET /api/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Profile>, AppError> {
    let identity = auth::identity_from_headers(&headers)?;
    let profile = accounts::ensure_profile(&state, &identity)?;
    Ok(Json(profile))
}

// POST /api/profile
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub phone: Option<String>,
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let identity = auth::identity_from_headers(&headers)?;
    accounts::ensure_profile(&state, &identity)?;

    let profile = accounts::update_contact(
        &state,
        &identity.subject_id,
        &body.name,
        body.phone.as_deref(),
    )?;
    Ok(Json(profile))
}
