use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Offset of the café's fixed business timezone from UTC, in minutes.
    /// Booking dates are judged against "today" in this timezone.
    pub tz_offset_minutes: i32,
    /// Subject id granted the admin role when its profile is first
    /// provisioned. Empty means no bootstrap admin.
    pub bootstrap_admin_subject: String,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "barkbrew.db".to_string()),
            tz_offset_minutes: env::var("TZ_OFFSET_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(330),
            bootstrap_admin_subject: env::var("BOOTSTRAP_ADMIN_SUBJECT").unwrap_or_default(),
            cors_origin: env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string()),
        }
    }
}
