use crate::error::StoreError;
use crate::status::RsvpStatus;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Guest record
/// Only `rsvp_status` (and its `responded_at` stamp) is touched by the confirmation flow
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Guest {
    /// Opaque identifier embedded in confirmation links
    /// Generated on import when the guest list leaves it blank
    #[serde(default)]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub event_name: String,

    #[serde(default)]
    pub rsvp_status: RsvpStatus,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last time a confirmation link was applied
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
}

impl Guest {
    pub fn new(name: &str, email: &str, event_name: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            event_name: event_name.to_string(),
            rsvp_status: RsvpStatus::Pending,
            created_at: Some(Utc::now()),
            responded_at: None,
        }
    }

    /// Fill in identity and creation time for rows coming from a guest list
    pub fn init_fields(&mut self) {
        if self.id.trim().is_empty() {
            self.id = uuid::Uuid::new_v4().to_string();
        }
        if self.created_at.is_none() {
            self.created_at = Some(Utc::now());
        }
    }
}

// ============================================================================
// GUEST STORE CAPABILITY
// ============================================================================

/// The single capability the confirmation flow needs from storage:
/// set one guest's RSVP status, reporting success or failure.
pub trait GuestStore {
    fn set_rsvp_status(&self, guest_id: &str, status: RsvpStatus) -> Result<(), StoreError>;
}

/// SQLite-backed guest store shared between request handlers
pub struct SqliteGuestStore {
    conn: Mutex<Connection>,
}

impl SqliteGuestStore {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        setup_database(&conn)?;
        info!(path = %path.display(), "guest store opened");
        Ok(Self::from_connection(conn))
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Run a closure against the underlying connection
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        f(&conn)
    }
}

impl GuestStore for SqliteGuestStore {
    fn set_rsvp_status(&self, guest_id: &str, status: RsvpStatus) -> Result<(), StoreError> {
        self.with_conn(|conn| set_rsvp_status(conn, guest_id, status))
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL is unsupported for in-memory databases; sqlite reports "memory" and carries on
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS guests (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL DEFAULT '',
            event_name TEXT NOT NULL DEFAULT '',
            rsvp_status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT,
            responded_at TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_guests_status ON guests(rsvp_status)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// GUEST LIST IMPORT
// ============================================================================

/// Load a guest list CSV (`id,name,email,event_name`, `id` may be blank)
pub fn load_guests_csv(csv_path: &Path) -> Result<Vec<Guest>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut guests = Vec::new();

    for result in rdr.deserialize() {
        let mut guest: Guest = result.context("Failed to deserialize guest")?;
        guest.init_fields();
        guests.push(guest);
    }

    Ok(guests)
}

/// Insert guests, skipping identifiers already present
pub fn insert_guests(conn: &Connection, guests: &[Guest]) -> Result<usize, StoreError> {
    let mut inserted = 0;
    let mut duplicates = 0;

    for guest in guests {
        let result = conn.execute(
            "INSERT INTO guests (id, name, email, event_name, rsvp_status, created_at, responded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                guest.id,
                guest.name,
                guest.email,
                guest.event_name,
                guest.rsvp_status.as_str(),
                guest.created_at.map(|dt| dt.to_rfc3339()),
                guest.responded_at.map(|dt| dt.to_rfc3339()),
            ],
        );

        match result {
            Ok(_) => inserted += 1,
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                duplicates += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(inserted, duplicates, "guest list imported");

    Ok(inserted)
}

// ============================================================================
// QUERIES
// ============================================================================

const GUEST_COLUMNS: &str =
    "id, name, email, event_name, rsvp_status, created_at, responded_at";

fn parse_timestamp(idx: usize, value: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
                })
        })
        .transpose()
}

fn guest_from_row(row: &Row<'_>) -> rusqlite::Result<Guest> {
    let status: String = row.get(4)?;
    let rsvp_status = status.parse::<RsvpStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(Guest {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        event_name: row.get(3)?,
        rsvp_status,
        created_at: parse_timestamp(5, row.get(5)?)?,
        responded_at: parse_timestamp(6, row.get(6)?)?,
    })
}

pub fn get_guest(conn: &Connection, guest_id: &str) -> Result<Option<Guest>, StoreError> {
    let guest = conn
        .query_row(
            &format!("SELECT {} FROM guests WHERE id = ?1", GUEST_COLUMNS),
            params![guest_id],
            guest_from_row,
        )
        .optional()?;

    Ok(guest)
}

pub fn get_all_guests(conn: &Connection) -> Result<Vec<Guest>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM guests ORDER BY event_name, name",
        GUEST_COLUMNS
    ))?;

    let guests = stmt
        .query_map([], guest_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(guests)
}

pub fn verify_count(conn: &Connection) -> Result<i64, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM guests", [], |row| row.get(0))?;
    Ok(count)
}

/// Single-row, single-statement status assignment. Last write wins.
/// An identifier matching no row is reported as `NotFound`.
pub fn set_rsvp_status(
    conn: &Connection,
    guest_id: &str,
    status: RsvpStatus,
) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE guests SET rsvp_status = ?1, responded_at = ?2 WHERE id = ?3",
        params![status.as_str(), Utc::now().to_rfc3339(), guest_id],
    )?;

    if changed == 0 {
        return Err(StoreError::NotFound(guest_id.to_string()));
    }

    debug!(guest_id, status = %status, "rsvp status written");
    Ok(())
}
