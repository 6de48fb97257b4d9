//! Database schema and record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    last_name TEXT NOT NULL,
    first_name TEXT NOT NULL,
    phone TEXT NOT NULL,
    email TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reservations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL,
    service_type TEXT NOT NULL,
    restaurant_name TEXT,
    num_people INTEGER,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    details TEXT NOT NULL,
    created_at TEXT NOT NULL,

    FOREIGN KEY (client_id) REFERENCES clients(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_reservations_client ON reservations(client_id);
";

// ============================================================================
// Identifiers
// ============================================================================

/// Store-assigned client identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub i64);

/// Store-assigned reservation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub i64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Clients
// ============================================================================

/// Client record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// "Last First", as shown on selection buttons
    pub fn display_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

/// Fields of a client that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub email: String,
}

// ============================================================================
// Reservations
// ============================================================================

/// Kind of service a reservation is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Restaurant,
    Transfer,
    Instructor,
    Massage,
    SkiService,
}

impl ServiceType {
    pub const ALL: [ServiceType; 5] = [
        ServiceType::Restaurant,
        ServiceType::Transfer,
        ServiceType::Instructor,
        ServiceType::Massage,
        ServiceType::SkiService,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Restaurant => "restaurant",
            ServiceType::Transfer => "transfer",
            ServiceType::Instructor => "instructor",
            ServiceType::Massage => "massage",
            ServiceType::SkiService => "ski_service",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown service type: {s}"))
    }
}

/// Service-specific payload of a reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "service_type", rename_all = "snake_case")]
pub enum ServiceDetails {
    Restaurant {
        restaurant_name: String,
        num_people: u32,
    },
    Transfer {
        departure: String,
        arrival: String,
        num_people: u32,
    },
    Instructor {
        language: String,
        sport: String,
        start_date: String,
        end_date: String,
        num_instructors: u32,
        num_people: u32,
    },
    Massage {
        massage_type: String,
        duration_minutes: u32,
    },
    SkiService {
        details: String,
    },
}

impl ServiceDetails {
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceDetails::Restaurant { .. } => ServiceType::Restaurant,
            ServiceDetails::Transfer { .. } => ServiceType::Transfer,
            ServiceDetails::Instructor { .. } => ServiceType::Instructor,
            ServiceDetails::Massage { .. } => ServiceType::Massage,
            ServiceDetails::SkiService { .. } => ServiceType::SkiService,
        }
    }

    /// Restaurant name column (restaurant branch only)
    pub fn restaurant_name(&self) -> Option<&str> {
        match self {
            ServiceDetails::Restaurant {
                restaurant_name, ..
            } => Some(restaurant_name),
            _ => None,
        }
    }

    /// Party size column, for branches that collect one
    pub fn num_people(&self) -> Option<u32> {
        match self {
            ServiceDetails::Restaurant { num_people, .. }
            | ServiceDetails::Transfer { num_people, .. }
            | ServiceDetails::Instructor { num_people, .. } => Some(*num_people),
            ServiceDetails::Massage { .. } | ServiceDetails::SkiService { .. } => None,
        }
    }
}

/// Reservation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub client_id: ClientId,
    pub details: ServiceDetails,
    pub date: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
}

/// Fields of a reservation that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub client_id: ClientId,
    pub details: ServiceDetails,
    pub date: String,
    pub time: String,
}

/// Sort key for a `DD.MM.YY` date and `HHhMM` time pair.
///
/// Tokens are stored as entered, so ordering compares year, month, day, hour
/// and minute numerically where they parse and falls back to the raw text.
pub fn schedule_key(date: &str, time: &str) -> (Vec<NumOrText>, Vec<NumOrText>) {
    let mut date_parts: Vec<NumOrText> = date.split('.').map(NumOrText::parse).collect();
    date_parts.reverse();
    let time_parts = time.split('h').map(NumOrText::parse).collect();
    (date_parts, time_parts)
}

/// A token component that sorts numerically when it can
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NumOrText {
    Num(u64),
    Text(String),
}

impl NumOrText {
    fn parse(part: &str) -> Self {
        let trimmed = part.trim();
        trimmed
            .parse()
            .map_or_else(|_| NumOrText::Text(trimmed.to_string()), NumOrText::Num)
    }
}
