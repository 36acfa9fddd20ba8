use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppError;
use crate::models::ContactMessage;
use crate::services::contact::{self, NewContactMessage};
use crate::state::AppState;

// POST /api/contact
pub async fn submit_message(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewContactMessage>,
) -> Result<(StatusCode, Json<ContactMessage>), AppError> {
    let record = contact::submit(&state, body)?;
    Ok((StatusCode::CREATED, Json(record)))
}
