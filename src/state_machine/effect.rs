//! Effects produced by state transitions

use crate::db::{Client, NewClient, NewReservation};

/// What the engine must do after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show the prompt of the new current step
    Prompt,
    /// Persist the collected record; the session ends either way
    Commit(Draft),
}

/// A fully collected record awaiting its store write
#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    Client(NewClient),
    Reservation {
        reservation: NewReservation,
        /// Snapshot taken when the client was selected, used for the recap
        client: Client,
    },
    /// Delete a client and, by cascade, its reservations
    RemoveClient(Client),
}

impl Draft {
    /// Entity kind, for logs
    pub fn entity(&self) -> &'static str {
        match self {
            Draft::Client(_) => "client",
            Draft::Reservation { .. } => "reservation",
            Draft::RemoveClient(_) => "client_removal",
        }
    }
}
