use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BusinessInfo, Service};
use crate::state::AppState;

// GET /api/services
pub async fn get_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = {
        let db = state.db.lock().unwrap();
        queries::get_active_services(&db)?
    };
    Ok(Json(services))
}

// GET /api/business-info
//
// Public. Serves the stored card, with the built-in default covering
// both an unsaved row and a failed read.
pub async fn get_business_info(State(state): State<Arc<AppState>>) -> Json<BusinessInfo> {
    let info = {
        let db = state.db.lock().unwrap();
        match queries::get_business_info(&db) {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(error = %e, "business info read failed, serving default card");
                None
            }
        }
    };
    Json(info.unwrap_or_else(|| BusinessInfo::default_card(Utc::now().naive_utc())))
}
