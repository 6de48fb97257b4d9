//! Record store abstraction
//!
//! The engine only sees this trait, so flows can be exercised against an
//! in-memory store in tests and against SQLite in production.

#[cfg(test)]
pub mod testing;

use crate::db::{
    Client, ClientId, Database, DbError, NewClient, NewReservation, Reservation, ReservationId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a record store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("store unavailable: {0}")]
    Backend(String),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ClientNotFound(id) => StoreError::NotFound {
                entity: "client",
                id: id.0,
            },
            DbError::ReservationNotFound(id) => StoreError::NotFound {
                entity: "reservation",
                id: id.0,
            },
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Durable storage for clients and reservations
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_client(&self, client: &NewClient) -> Result<Client, StoreError>;

    async fn get_client(&self, id: ClientId) -> Result<Client, StoreError>;

    /// All clients in creation order
    async fn list_clients(&self) -> Result<Vec<Client>, StoreError>;

    /// Delete a client together with its reservations
    async fn delete_client(&self, id: ClientId) -> Result<(), StoreError>;

    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Reservation, StoreError>;

    /// Reservations of a client ordered by date, then time
    async fn list_reservations_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Reservation>, StoreError>;

    async fn delete_reservation(&self, id: ReservationId) -> Result<(), StoreError>;
}

// ============================================================================
// Arc implementation for trait objects
// ============================================================================

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn create_client(&self, client: &NewClient) -> Result<Client, StoreError> {
        (**self).create_client(client).await
    }

    async fn get_client(&self, id: ClientId) -> Result<Client, StoreError> {
        (**self).get_client(id).await
    }

    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        (**self).list_clients().await
    }

    async fn delete_client(&self, id: ClientId) -> Result<(), StoreError> {
        (**self).delete_client(id).await
    }

    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Reservation, StoreError> {
        (**self).create_reservation(reservation).await
    }

    async fn list_reservations_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Reservation>, StoreError> {
        (**self).list_reservations_for_client(client_id).await
    }

    async fn delete_reservation(&self, id: ReservationId) -> Result<(), StoreError> {
        (**self).delete_reservation(id).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

/// Adapter to use Database as a `RecordStore`
#[derive(Clone)]
pub struct DatabaseStore {
    db: Database,
}

impl DatabaseStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for DatabaseStore {
    async fn create_client(&self, client: &NewClient) -> Result<Client, StoreError> {
        Ok(self.db.create_client(client)?)
    }

    async fn get_client(&self, id: ClientId) -> Result<Client, StoreError> {
        Ok(self.db.get_client(id)?)
    }

    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        Ok(self.db.list_clients()?)
    }

    async fn delete_client(&self, id: ClientId) -> Result<(), StoreError> {
        Ok(self.db.delete_client(id)?)
    }

    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Reservation, StoreError> {
        Ok(self.db.create_reservation(reservation)?)
    }

    async fn list_reservations_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Reservation>, StoreError> {
        Ok(self.db.list_reservations_for_client(client_id)?)
    }

    async fn delete_reservation(&self, id: ReservationId) -> Result<(), StoreError> {
        Ok(self.db.delete_reservation(id)?)
    }
}
