//! In-memory record store for tests
//!
//! Mirrors the SQLite semantics the engine relies on (store-assigned ids,
//! cascade on client delete, date/time ordering) and adds write counting and
//! failure injection.

use super::{RecordStore, StoreError};
use crate::db::{
    schedule_key, Client, ClientId, NewClient, NewReservation, Reservation, ReservationId,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    next_client_id: i64,
    next_reservation_id: i64,
    clients: Vec<Client>,
    reservations: Vec<Reservation>,
}

/// Record store backed by vectors
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with clients
    pub fn with_clients(names: &[(&str, &str)]) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.lock().unwrap();
            for (last, first) in names {
                tables.next_client_id += 1;
                let id = ClientId(tables.next_client_id);
                tables.clients.push(Client {
                    id,
                    last_name: (*last).to_string(),
                    first_name: (*first).to_string(),
                    phone: "+41 791234567".to_string(),
                    email: format!("{}@example.com", first.to_lowercase()),
                    created_at: Utc::now(),
                });
            }
        }
        store
    }

    /// Make every subsequent create/delete fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn clients(&self) -> Vec<Client> {
        self.tables.lock().unwrap().clients.clone()
    }

    pub fn reservations(&self) -> Vec<Reservation> {
        self.tables.lock().unwrap().reservations.clone()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Backend("injected write failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_client(&self, client: &NewClient) -> Result<Client, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        tables.next_client_id += 1;
        let created = Client {
            id: ClientId(tables.next_client_id),
            last_name: client.last_name.clone(),
            first_name: client.first_name.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
            created_at: Utc::now(),
        };
        tables.clients.push(created.clone());
        self.record_write();
        Ok(created)
    }

    async fn get_client(&self, id: ClientId) -> Result<Client, StoreError> {
        self.tables
            .lock()
            .unwrap()
            .clients
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "client",
                id: id.0,
            })
    }

    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        Ok(self.clients())
    }

    async fn delete_client(&self, id: ClientId) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.clients.len();
        tables.clients.retain(|c| c.id != id);
        if tables.clients.len() == before {
            return Err(StoreError::NotFound {
                entity: "client",
                id: id.0,
            });
        }
        tables.reservations.retain(|r| r.client_id != id);
        self.record_write();
        Ok(())
    }

    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Reservation, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.clients.iter().any(|c| c.id == reservation.client_id) {
            return Err(StoreError::NotFound {
                entity: "client",
                id: reservation.client_id.0,
            });
        }
        tables.next_reservation_id += 1;
        let created = Reservation {
            id: ReservationId(tables.next_reservation_id),
            client_id: reservation.client_id,
            details: reservation.details.clone(),
            date: reservation.date.clone(),
            time: reservation.time.clone(),
            created_at: Utc::now(),
        };
        tables.reservations.push(created.clone());
        self.record_write();
        Ok(created)
    }

    async fn list_reservations_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Reservation>, StoreError> {
        let mut found: Vec<_> = self
            .reservations()
            .into_iter()
            .filter(|r| r.client_id == client_id)
            .collect();
        found.sort_by_cached_key(|r| schedule_key(&r.date, &r.time));
        Ok(found)
    }

    async fn delete_reservation(&self, id: ReservationId) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.reservations.len();
        tables.reservations.retain(|r| r.id != id);
        if tables.reservations.len() == before {
            return Err(StoreError::NotFound {
                entity: "reservation",
                id: id.0,
            });
        }
        self.record_write();
        Ok(())
    }
}
