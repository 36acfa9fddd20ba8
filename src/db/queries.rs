use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    AdminBooking, Booking, BookingStatus, BusinessInfo, ContactMessage, ContactStatus, Profile,
    ProfileSummary, Role, Service,
};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";

fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FMT).unwrap_or_else(|_| Utc::now().date_naive())
}

fn parse_time(s: &str) -> NaiveTime {
    // Accepts both "10:00" and "10:00:00"; time inputs send the former.
    NaiveTime::parse_from_str(s, TIME_FMT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .unwrap_or_default()
}

// ── Bookings ──

const BOOKING_COLS: &str = "id, owner_id, service_name, price, pet_name, pet_type, pet_breed, \
                            booking_date, booking_time, status, phone, notes, created_at, updated_at";

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, owner_id, service_name, price, pet_name, pet_type, pet_breed,
                               booking_date, booking_time, status, phone, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            booking.id,
            booking.owner_id,
            booking.service_name,
            booking.price,
            booking.pet_name,
            booking.pet_type,
            booking.pet_breed,
            booking.booking_date.format(DATE_FMT).to_string(),
            booking.booking_time.format(TIME_FMT).to_string(),
            booking.status.as_str(),
            booking.phone,
            booking.notes,
            booking.created_at.format(DATETIME_FMT).to_string(),
            booking.updated_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let sql = format!("SELECT {BOOKING_COLS} FROM bookings WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_booking_row(row)));

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_bookings_for_owner(conn: &Connection, owner_id: &str) -> anyhow::Result<Vec<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLS} FROM bookings WHERE owner_id = ?1
         ORDER BY booking_date ASC, booking_time ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![owner_id], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_all_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let sql = format!("SELECT {BOOKING_COLS} FROM bookings ORDER BY created_at DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Joined admin read: every booking plus its owner's profile summary,
/// None where no profile row matches the owner id.
pub fn get_all_bookings_with_owner(conn: &Connection) -> anyhow::Result<Vec<AdminBooking>> {
    let cols = BOOKING_COLS
        .split(", ")
        .map(|c| format!("b.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT {cols}, p.name, p.email, p.phone
         FROM bookings b LEFT JOIN user_profiles p ON p.subject_id = b.owner_id
         ORDER BY b.created_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let owner_name: Option<String> = row.get(14)?;
        let owner = match owner_name {
            Some(name) => Some(ProfileSummary {
                name,
                email: row.get(15)?,
                phone: row.get(16)?,
            }),
            None => None,
        };
        Ok((parse_booking_row(row), owner))
    })?;

    let mut enriched = vec![];
    for row in rows {
        let (booking, owner) = row?;
        enriched.push(AdminBooking {
            booking: booking?,
            owner,
        });
    }
    Ok(enriched)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(DATETIME_FMT).to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn delete_bookings_for_owner(conn: &Connection, owner_id: &str) -> anyhow::Result<usize> {
    let count = conn.execute(
        "DELETE FROM bookings WHERE owner_id = ?1",
        params![owner_id],
    )?;
    Ok(count)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let owner_id: String = row.get(1)?;
    let service_name: String = row.get(2)?;
    let price: i64 = row.get(3)?;
    let pet_name: String = row.get(4)?;
    let pet_type: String = row.get(5)?;
    let pet_breed: Option<String> = row.get(6)?;
    let date_str: String = row.get(7)?;
    let time_str: String = row.get(8)?;
    let status_str: String = row.get(9)?;
    let phone: Option<String> = row.get(10)?;
    let notes: Option<String> = row.get(11)?;
    let created_at_str: String = row.get(12)?;
    let updated_at_str: String = row.get(13)?;

    Ok(Booking {
        id,
        owner_id,
        service_name,
        price,
        pet_name,
        pet_type,
        pet_breed,
        booking_date: parse_date(&date_str),
        booking_time: parse_time(&time_str),
        status: BookingStatus::parse(&status_str),
        phone,
        notes,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

// ── Profiles ──

const PROFILE_COLS: &str = "id, subject_id, email, name, phone, role, created_at, updated_at";

pub fn create_profile(conn: &Connection, profile: &Profile) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO user_profiles (id, subject_id, email, name, phone, role, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            profile.id,
            profile.subject_id,
            profile.email,
            profile.name,
            profile.phone,
            profile.role.as_str(),
            profile.created_at.format(DATETIME_FMT).to_string(),
            profile.updated_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_profile_by_subject(
    conn: &Connection,
    subject_id: &str,
) -> anyhow::Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLS} FROM user_profiles WHERE subject_id = ?1");
    let result = conn.query_row(&sql, params![subject_id], parse_profile_row);

    match result {
        Ok(profile) => Ok(Some(profile)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_profile_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLS} FROM user_profiles WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], parse_profile_row);

    match result {
        Ok(profile) => Ok(Some(profile)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_profiles(conn: &Connection) -> anyhow::Result<Vec<Profile>> {
    let sql = format!("SELECT {PROFILE_COLS} FROM user_profiles ORDER BY created_at DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], parse_profile_row)?;

    let mut profiles = vec![];
    for row in rows {
        profiles.push(row?);
    }
    Ok(profiles)
}

/// Narrow role lookup for capability checks.
pub fn get_role(conn: &Connection, subject_id: &str) -> anyhow::Result<Option<Role>> {
    let result = conn.query_row(
        "SELECT role FROM user_profiles WHERE subject_id = ?1",
        params![subject_id],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(role) => Ok(Some(Role::parse(&role))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Profile summaries keyed by subject id, for the client-side merge
/// path when the joined booking read is unavailable.
pub fn get_profiles_for_subjects(
    conn: &Connection,
    subject_ids: &[String],
) -> anyhow::Result<Vec<(String, ProfileSummary)>> {
    if subject_ids.is_empty() {
        return Ok(vec![]);
    }

    let placeholders = (1..=subject_ids.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT subject_id, name, email, phone FROM user_profiles WHERE subject_id IN ({placeholders})"
    );

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> = subject_ids
        .iter()
        .map(|s| s as &dyn rusqlite::types::ToSql)
        .collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| {
        Ok((
            row.get::<_, String>(0)?,
            ProfileSummary {
                name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
            },
        ))
    })?;

    let mut summaries = vec![];
    for row in rows {
        summaries.push(row?);
    }
    Ok(summaries)
}

pub fn update_profile_contact(
    conn: &Connection,
    subject_id: &str,
    name: &str,
    phone: Option<&str>,
) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(DATETIME_FMT).to_string();
    let count = conn.execute(
        "UPDATE user_profiles SET name = ?1, phone = ?2, updated_at = ?3 WHERE subject_id = ?4",
        params![name, phone, now, subject_id],
    )?;
    Ok(count > 0)
}

pub fn update_profile_role(conn: &Connection, id: &str, role: Role) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(DATETIME_FMT).to_string();
    let count = conn.execute(
        "UPDATE user_profiles SET role = ?1, updated_at = ?2 WHERE id = ?3",
        params![role.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn delete_profile(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM user_profiles WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn count_profiles(conn: &Connection) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM user_profiles", [], |row| row.get(0))?;
    Ok(count)
}

fn parse_profile_row(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
    let role: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Profile {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        email: row.get(2)?,
        name: row.get(3)?,
        phone: row.get(4)?,
        role: Role::parse(&role),
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

// ── Services ──

pub fn get_active_services(conn: &Connection) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, price, duration_minutes, category, is_active, created_at
         FROM services WHERE is_active = 1 ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([], parse_service_row)?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

pub fn get_service_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        "SELECT id, name, description, price, duration_minutes, category, is_active, created_at
         FROM services WHERE id = ?1",
        params![id],
        parse_service_row,
    );

    match result {
        Ok(service) => Ok(Some(service)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_service_row(row: &rusqlite::Row) -> rusqlite::Result<Service> {
    let created_at: String = row.get(7)?;

    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        duration_minutes: row.get(4)?,
        category: row.get(5)?,
        is_active: row.get::<_, i64>(6)? != 0,
        created_at: parse_datetime(&created_at),
    })
}

// ── Contact Messages ──

pub fn create_contact_message(conn: &Connection, message: &ContactMessage) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO contact_messages (id, name, email, phone, subject, message, inquiry_type, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            message.id,
            message.name,
            message.email,
            message.phone,
            message.subject,
            message.message,
            message.inquiry_type,
            message.status.as_str(),
            message.created_at.format(DATETIME_FMT).to_string(),
            message.updated_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_all_contact_messages(conn: &Connection) -> anyhow::Result<Vec<ContactMessage>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, phone, subject, message, inquiry_type, status, created_at, updated_at
         FROM contact_messages ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map([], parse_contact_row)?;

    let mut messages = vec![];
    for row in rows {
        messages.push(row?);
    }
    Ok(messages)
}

pub fn get_contact_message_by_id(
    conn: &Connection,
    id: &str,
) -> anyhow::Result<Option<ContactMessage>> {
    let result = conn.query_row(
        "SELECT id, name, email, phone, subject, message, inquiry_type, status, created_at, updated_at
         FROM contact_messages WHERE id = ?1",
        params![id],
        parse_contact_row,
    );

    match result {
        Ok(message) => Ok(Some(message)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_contact_message_status(
    conn: &Connection,
    id: &str,
    status: ContactStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(DATETIME_FMT).to_string();
    let count = conn.execute(
        "UPDATE contact_messages SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn delete_contact_message(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM contact_messages WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_contact_row(row: &rusqlite::Row) -> rusqlite::Result<ContactMessage> {
    let status: String = row.get(7)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;

    Ok(ContactMessage {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        subject: row.get(4)?,
        message: row.get(5)?,
        inquiry_type: row.get(6)?,
        status: ContactStatus::parse(&status),
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

// ── Business Info ──

pub fn get_business_info(conn: &Connection) -> anyhow::Result<Option<BusinessInfo>> {
    let result = conn.query_row(
        "SELECT id, business_name, phone, email, address, city, state, postal_code, country,
                business_hours, description, created_at, updated_at
         FROM business_info WHERE id = 'default'",
        [],
        |row| {
            let created_at: String = row.get(11)?;
            let updated_at: String = row.get(12)?;
            Ok(BusinessInfo {
                id: row.get(0)?,
                business_name: row.get(1)?,
                phone: row.get(2)?,
                email: row.get(3)?,
                address: row.get(4)?,
                city: row.get(5)?,
                state: row.get(6)?,
                postal_code: row.get(7)?,
                country: row.get(8)?,
                business_hours: row.get(9)?,
                description: row.get(10)?,
                created_at: parse_datetime(&created_at),
                updated_at: parse_datetime(&updated_at),
            })
        },
    );

    match result {
        Ok(info) => Ok(Some(info)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_business_info(conn: &Connection, info: &BusinessInfo) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO business_info (id, business_name, phone, email, address, city, state,
                                    postal_code, country, business_hours, description, created_at, updated_at)
         VALUES ('default', ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
         ON CONFLICT(id) DO UPDATE SET
           business_name = excluded.business_name,
           phone = excluded.phone,
           email = excluded.email,
           address = excluded.address,
           city = excluded.city,
           state = excluded.state,
           postal_code = excluded.postal_code,
           country = excluded.country,
           business_hours = excluded.business_hours,
           description = excluded.description,
           updated_at = excluded.updated_at",
        params![
            info.business_name,
            info.phone,
            info.email,
            info.address,
            info.city,
            info.state,
            info.postal_code,
            info.country,
            info.business_hours,
            info.description,
            info.created_at.format(DATETIME_FMT).to_string(),
            info.updated_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}
