//! Database module for the concierge
//!
//! Provides persistence for clients and their reservations.

mod schema;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid stored data: {0}")]
    Corrupt(String),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),
    #[error("Reservation not found: {0}")]
    ReservationNotFound(ReservationId),
    #[error("Database lock poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> DbResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    // ==================== Client Operations ====================

    /// Insert a client and return the stored record
    pub fn create_client(&self, client: &NewClient) -> DbResult<Client> {
        let conn = self.lock()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO clients (last_name, first_name, phone, email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                client.last_name,
                client.first_name,
                client.phone,
                client.email,
                now.to_rfc3339()
            ],
        )?;
        let id = ClientId(conn.last_insert_rowid());

        tracing::info!(client_id = %id, "Client created");

        Ok(Client {
            id,
            last_name: client.last_name.clone(),
            first_name: client.first_name.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
            created_at: now,
        })
    }

    /// Get client by ID
    pub fn get_client(&self, id: ClientId) -> DbResult<Client> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, last_name, first_name, phone, email, created_at
             FROM clients WHERE id = ?1",
            params![id.0],
            parse_client_row,
        )
        .optional()?
        .ok_or(DbError::ClientNotFound(id))
    }

    /// List all clients in creation order
    pub fn list_clients(&self) -> DbResult<Vec<Client>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, last_name, first_name, phone, email, created_at
             FROM clients ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], parse_client_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Delete a client and all its reservations
    pub fn delete_client(&self, id: ClientId) -> DbResult<()> {
        let conn = self.lock()?;

        // Reservations are deleted by CASCADE
        let deleted = conn.execute("DELETE FROM clients WHERE id = ?1", params![id.0])?;

        if deleted == 0 {
            return Err(DbError::ClientNotFound(id));
        }
        tracing::info!(client_id = %id, "Client and reservations deleted");
        Ok(())
    }

    // ==================== Reservation Operations ====================

    /// Insert a reservation for an existing client
    pub fn create_reservation(&self, reservation: &NewReservation) -> DbResult<Reservation> {
        let conn = self.lock()?;
        let now = Utc::now();

        let client_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE id = ?1)",
            params![reservation.client_id.0],
            |row| row.get(0),
        )?;
        if !client_exists {
            return Err(DbError::ClientNotFound(reservation.client_id));
        }

        let details = &reservation.details;
        let details_json = serde_json::to_string(details)?;

        conn.execute(
            "INSERT INTO reservations (client_id, service_type, restaurant_name, num_people, date, time, details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                reservation.client_id.0,
                details.service_type().as_str(),
                details.restaurant_name(),
                details.num_people(),
                reservation.date,
                reservation.time,
                details_json,
                now.to_rfc3339(),
            ],
        )?;
        let id = ReservationId(conn.last_insert_rowid());

        tracing::info!(
            reservation_id = %id,
            client_id = %reservation.client_id,
            service_type = %details.service_type(),
            "Reservation created"
        );

        Ok(Reservation {
            id,
            client_id: reservation.client_id,
            details: details.clone(),
            date: reservation.date.clone(),
            time: reservation.time.clone(),
            created_at: now,
        })
    }

    /// Reservations of a client, ordered by date then time
    pub fn list_reservations_for_client(&self, client_id: ClientId) -> DbResult<Vec<Reservation>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, client_id, service_type, date, time, details, created_at
             FROM reservations WHERE client_id = ?1 ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![client_id.0], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut reservations = Vec::new();
        for row in rows {
            let (id, client_id, service_type, date, time, details, created_at) = row?;
            let details: ServiceDetails = serde_json::from_str(&details)?;
            if details.service_type().as_str() != service_type {
                return Err(DbError::Corrupt(format!(
                    "reservation {id}: column says {service_type}, details say {}",
                    details.service_type()
                )));
            }
            reservations.push(Reservation {
                id: ReservationId(id),
                client_id: ClientId(client_id),
                details,
                date,
                time,
                created_at: parse_datetime(&created_at),
            });
        }

        reservations.sort_by_cached_key(|r| schedule_key(&r.date, &r.time));
        Ok(reservations)
    }

    /// Delete a single reservation
    pub fn delete_reservation(&self, id: ReservationId) -> DbResult<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM reservations WHERE id = ?1", params![id.0])?;

        if deleted == 0 {
            return Err(DbError::ReservationNotFound(id));
        }
        tracing::info!(reservation_id = %id, "Reservation deleted");
        Ok(())
    }
}

/// Parse a client row from the database
fn parse_client_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: ClientId(row.get(0)?),
        last_name: row.get(1)?,
        first_name: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
