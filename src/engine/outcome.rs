//! Results of feeding an event to the engine

use crate::db::{Client, Reservation};
use crate::flow::{Prompt, Rejection};
use crate::store::StoreError;
use thiserror::Error;

/// What the transport should show after an event
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The session moved (or stayed at entry); ask the next question
    Prompt(Prompt),
    /// The record was written; the session is over
    Commit { record: Committed, summary: String },
    /// Input refused; the session is unchanged and the same prompt repeats
    ValidationError { reason: Rejection, prompt: Prompt },
    /// The session ended without a record
    Terminated(Termination),
}

impl Outcome {
    /// Whether the session must be discarded after this outcome
    pub fn ends_session(&self) -> bool {
        matches!(self, Outcome::Commit { .. } | Outcome::Terminated(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Prompt(_) => "prompt",
            Outcome::Commit { .. } => "commit",
            Outcome::ValidationError { reason, .. } => reason.kind(),
            Outcome::Terminated(Termination::Cancelled) => "cancelled",
            Outcome::Terminated(Termination::StoreFailure(_)) => "store_failure",
        }
    }
}

/// A record written by a finished flow
#[derive(Debug, Clone, PartialEq)]
pub enum Committed {
    Client(Client),
    Reservation(Reservation),
    /// Snapshot of the client that was deleted
    ClientRemoved(Client),
}

impl Committed {
    /// Store-assigned id of the affected record
    pub fn id(&self) -> i64 {
        match self {
            Committed::Client(client) | Committed::ClientRemoved(client) => client.id.0,
            Committed::Reservation(reservation) => reservation.id.0,
        }
    }
}

/// Why a session ended without a record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Termination {
    #[error("❌ Opération annulée.\nRetour au menu principal.")]
    Cancelled,
    #[error("❌ Une erreur s'est produite lors de l'enregistrement.")]
    StoreFailure(StoreError),
}
