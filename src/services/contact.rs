use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{ContactMessage, ContactStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub inquiry_type: Option<String>,
}

/// Accept a message from the public contact form. No identity needed,
/// walk-ins ask about parties and grooming without an account.
pub fn submit(state: &Arc<AppState>, req: NewContactMessage) -> Result<ContactMessage, AppError> {
    let name = req.name.trim();
    let email = req.email.trim();
    let subject = req.subject.trim();
    let message = req.message.trim();

    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("a valid email is required".to_string()));
    }
    if subject.is_empty() {
        return Err(AppError::Validation("subject is required".to_string()));
    }
    if message.is_empty() {
        return Err(AppError::Validation("message is required".to_string()));
    }

    let now = Utc::now().naive_utc();
    let record = ContactMessage {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: req.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
        subject: subject.to_string(),
        message: message.to_string(),
        inquiry_type: req
            .inquiry_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        status: ContactStatus::New,
        created_at: now,
        updated_at: now,
    };

    let db = state.db.lock().unwrap();
    queries::create_contact_message(&db, &record)?;

    Ok(record)
}

/// Move a message through the triage states. Unknown status strings
/// from the admin UI are rejected rather than coerced.
pub fn set_status(state: &Arc<AppState>, id: &str, status: &str) -> Result<ContactMessage, AppError> {
    let status = ContactStatus::try_parse(status)
        .ok_or_else(|| AppError::Validation(format!("unknown message status: {status}")))?;

    let db = state.db.lock().unwrap();
    if !queries::update_contact_message_status(&db, id, status)? {
        return Err(AppError::NotFound(format!("contact message {id}")));
    }

    queries::get_contact_message_by_id(&db, id)?
        .ok_or_else(|| AppError::NotFound(format!("contact message {id}")))
}

pub fn remove(state: &Arc<AppState>, id: &str) -> Result<(), AppError> {
    let db = state.db.lock().unwrap();
    if !queries::delete_contact_message(&db, id)? {
        return Err(AppError::NotFound(format!("contact message {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db;
    use crate::services::sync::SyncCache;
    use std::sync::Mutex;

    fn test_state() -> Arc<AppState> {
        let conn = db::init_db(":memory:").unwrap();
        let (tx, _) = tokio::sync::broadcast::channel(16);
        Arc::new(AppState {
            db: Arc::new(Mutex::new(conn)),
            config: AppConfig {
                port: 3000,
                database_url: ":memory:".to_string(),
                tz_offset_minutes: 330,
                bootstrap_admin_subject: String::new(),
                cors_origin: "*".to_string(),
            },
            cache: SyncCache::new(),
            bookings_tx: tx,
        })
    }

    fn valid_message() -> NewContactMessage {
        NewContactMessage {
            name: "  Asha  ".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            subject: "Birthday party".to_string(),
            message: "Can we book the playground for a party of six dogs?".to_string(),
            inquiry_type: Some("events".to_string()),
        }
    }

    #[test]
    fn test_submit_trims_and_starts_as_new() {
        let state = test_state();
        let record = submit(&state, valid_message()).unwrap();

        assert_eq!(record.name, "Asha");
        assert_eq!(record.status, ContactStatus::New);

        let db = state.db.lock().unwrap();
        assert_eq!(queries::get_all_contact_messages(&db).unwrap().len(), 1);
    }

    #[test]
    fn test_submit_rejects_bad_email() {
        let state = test_state();
        let mut req = valid_message();
        req.email = "not-an-email".to_string();
        assert!(matches!(
            submit(&state, req),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_submit_rejects_empty_message() {
        let state = test_state();
        let mut req = valid_message();
        req.message = "   ".to_string();
        assert!(matches!(
            submit(&state, req),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_set_status_moves_through_triage() {
        let state = test_state();
        let record = submit(&state, valid_message()).unwrap();

        let updated = set_status(&state, &record.id, "read").unwrap();
        assert_eq!(updated.status, ContactStatus::Read);

        let updated = set_status(&state, &record.id, "replied").unwrap();
        assert_eq!(updated.status, ContactStatus::Replied);
    }

    #[test]
    fn test_set_status_rejects_unknown_value() {
        let state = test_state();
        let record = submit(&state, valid_message()).unwrap();

        assert!(matches!(
            set_status(&state, &record.id, "archived"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_set_status_unknown_id_is_not_found() {
        let state = test_state();
        assert!(matches!(
            set_status(&state, "nope", "read"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_deletes_the_message() {
        let state = test_state();
        let record = submit(&state, valid_message()).unwrap();

        remove(&state, &record.id).unwrap();

        let db = state.db.lock().unwrap();
        assert!(queries::get_all_contact_messages(&db).unwrap().is_empty());
    }
}
