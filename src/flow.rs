//! Flow graphs
//!
//! Declarative description of every conversation the concierge can hold:
//! which step asks for what, how the answer is validated, where it leads and
//! where "back" returns to.

mod graph;
mod prompt;
mod step;
mod summary;
mod validate;

pub use graph::{node, service_from_choice, Next};
#[cfg(test)]
pub use graph::Input;
pub use prompt::{prompt_for, ChoiceOption, Prompt, BACK_TOKEN};
pub use step::{Answer, StepId};
pub use summary::{client_summary, removal_summary, reservation_summary};
pub use validate::Rejection;

use std::fmt;

/// A conversation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    /// Collect a new client record
    ClientIntake,
    /// Book a service for an existing client
    Reservation,
    /// Delete a client and its reservations
    ClientRemoval,
}

impl FlowKind {
    pub fn entry(self) -> StepId {
        match self {
            FlowKind::ClientIntake => StepId::LastName,
            FlowKind::Reservation => StepId::ChooseClient,
            FlowKind::ClientRemoval => StepId::ChooseClientToRemove,
        }
    }

    /// Whether the flow needs at least one stored client to begin
    pub fn requires_clients(self) -> bool {
        matches!(self, FlowKind::Reservation | FlowKind::ClientRemoval)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlowKind::ClientIntake => "client_intake",
            FlowKind::Reservation => "reservation",
            FlowKind::ClientRemoval => "client_removal",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
