use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::services::sync::{BookingChange, SyncCache};

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub cache: SyncCache,
    pub bookings_tx: broadcast::Sender<BookingChange>,
}
