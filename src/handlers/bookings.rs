use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::Json;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::errors::AppError;
use crate::models::{Booking, Role};
use crate::services::bookings::{self, NewBookingRequest};
use crate::services::{accounts, auth, views};
use crate::state::AppState;

// GET /api/bookings
//
// The owner dashboard read. Provisions the caller's profile on first
// sight, then partitions the cached booking collection.
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let identity = auth::identity_from_headers(&headers)?;
    accounts::ensure_profile(&state, &identity)?;

    let view = views::owner_view(&state, &identity.subject_id)?;
    Ok(Json(view))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let identity = auth::identity_from_headers(&headers)?;
    accounts::ensure_profile(&state, &identity)?;

    let booking = bookings::create(&state, &identity, body)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let identity = auth::identity_from_headers(&headers)?;

    let booking = bookings::cancel(&state, &identity.subject_id, &id)?;
    Ok(Json(booking))
}

// GET /api/bookings/events — SSE subscription
//
// Opens with a full snapshot of the caller's view, then pushes a fresh
// snapshot after every change that touches it: the whole collection is
// replaced each time, never patched. Admins subscribe to every change,
// everyone else only to their own bookings.
pub async fn booking_events(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    let identity = auth::identity_from_headers(&headers)?;

    let is_admin = {
        let db = state.db.lock().unwrap();
        auth::resolve_role(&db, &identity.subject_id) == Role::Admin
    };
    let subject_id = identity.subject_id.clone();

    let initial = if is_admin {
        views::admin_view(&state)?
    } else {
        views::owner_view(&state, &subject_id)?
    };
    let initial_stream = tokio_stream::once(Ok::<_, Infallible>(
        Event::default()
            .data(initial.to_string())
            .event("bookings_snapshot"),
    ));

    let rx = state.bookings_tx.subscribe();
    let stream_state = state.clone();
    let live_stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(change) if is_admin || change.owner_id == subject_id => {
            snapshot_event(&stream_state, is_admin, &subject_id).map(Ok)
        }
        Ok(_) => None,
        // A lagged receiver missed events; the next snapshot covers them.
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(_)) => {
            snapshot_event(&stream_state, is_admin, &subject_id).map(Ok)
        }
    });

    let keepalive_stream = tokio_stream::StreamExt::map(
        tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(Duration::from_secs(30))),
        |_| Ok(Event::default().comment("keepalive")),
    );

    let combined = initial_stream.chain(live_stream);
    Ok(Sse::new(StreamExt::merge(combined, keepalive_stream)))
}

/// Rebuild the subscriber's view for one push. A failed rebuild is
/// logged and skipped; the subscription itself stays up.
fn snapshot_event(state: &Arc<AppState>, is_admin: bool, subject_id: &str) -> Option<Event> {
    let view = if is_admin {
        views::admin_view(state)
    } else {
        views::owner_view(state, subject_id)
    };

    match view {
        Ok(view) => Some(
            Event::default()
                .data(view.to_string())
                .event("bookings_snapshot"),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "failed to rebuild bookings snapshot");
            None
        }
    }
}
