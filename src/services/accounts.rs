use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Profile, Role};
use crate::services::auth::Identity;
use crate::services::sync;
use crate::state::AppState;

fn display_name(identity: &Identity) -> String {
    if let Some(name) = &identity.name {
        return name.clone();
    }
    if let Some(email) = &identity.email {
        if let Some(local) = email.split('@').next() {
            if !local.is_empty() {
                return local.to_string();
            }
        }
    }
    "Guest".to_string()
}

/// Fetch the caller's profile, creating it on first sight. The subject
/// named in BOOTSTRAP_ADMIN_SUBJECT is provisioned as admin so a fresh
/// deployment has a way into the admin surface; everyone else starts
/// as a plain user.
pub fn ensure_profile(state: &Arc<AppState>, identity: &Identity) -> Result<Profile, AppError> {
    let db = state.db.lock().unwrap();

    if let Some(profile) = queries::get_profile_by_subject(&db, &identity.subject_id)? {
        return Ok(profile);
    }

    let role = if !state.config.bootstrap_admin_subject.is_empty()
        && identity.subject_id == state.config.bootstrap_admin_subject
    {
        Role::Admin
    } else {
        Role::User
    };

    let now = Utc::now().naive_utc();
    let profile = Profile {
        id: Uuid::new_v4().to_string(),
        subject_id: identity.subject_id.clone(),
        email: identity.email.clone().unwrap_or_default(),
        name: display_name(identity),
        phone: identity.phone.clone(),
        role,
        created_at: now,
        updated_at: now,
    };
    queries::create_profile(&db, &profile)?;
    tracing::info!(subject_id = %profile.subject_id, "provisioned profile");

    Ok(profile)
}

pub fn update_contact(
    state: &Arc<AppState>,
    subject_id: &str,
    name: &str,
    phone: Option<&str>,
) -> Result<Profile, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let phone = phone.map(str::trim).filter(|p| !p.is_empty());

    let db = state.db.lock().unwrap();
    if !queries::update_profile_contact(&db, subject_id, name, phone)? {
        return Err(AppError::NotFound(format!("profile for {subject_id}")));
    }
    queries::get_profile_by_subject(&db, subject_id)?
        .ok_or_else(|| AppError::NotFound(format!("profile for {subject_id}")))
}

/// Flip a profile between user and admin.
pub fn toggle_role(state: &Arc<AppState>, profile_id: &str) -> Result<Profile, AppError> {
    let db = state.db.lock().unwrap();
    let profile = queries::get_profile_by_id(&db, profile_id)?
        .ok_or_else(|| AppError::NotFound(format!("profile {profile_id}")))?;

    let next = profile.role.toggled();
    queries::update_profile_role(&db, profile_id, next)?;

    queries::get_profile_by_id(&db, profile_id)?
        .ok_or_else(|| AppError::NotFound(format!("profile {profile_id}")))
}

/// Remove an account and everything it owns. Bookings go first; if
/// that sweep fails the profile is still removed, leaving orphaned
/// booking rows rather than a half-deleted account.
pub fn delete_account(state: &Arc<AppState>, profile_id: &str) -> Result<(), AppError> {
    let subject_id = {
        let db = state.db.lock().unwrap();
        let profile = queries::get_profile_by_id(&db, profile_id)?
            .ok_or_else(|| AppError::NotFound(format!("profile {profile_id}")))?;

        match queries::delete_bookings_for_owner(&db, &profile.subject_id) {
            Ok(count) if count > 0 => {
                tracing::info!(subject_id = %profile.subject_id, count, "deleted bookings for account");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, subject_id = %profile.subject_id, "failed to delete bookings for account");
            }
        }

        queries::delete_profile(&db, profile_id)?;
        profile.subject_id
    };
    sync::publish_change(state, &subject_id);

    Ok(())
}
