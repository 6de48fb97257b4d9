//! Conversation engine
//!
//! Runs the pure state machine against a session and executes the commit
//! effect it produces against the record store.

mod outcome;
mod registry;

pub use outcome::{Committed, Outcome, Termination};
pub use registry::SessionRegistry;

use crate::flow::{
    client_summary, prompt_for, removal_summary, reservation_summary, FlowKind, Prompt,
};
use crate::state_machine::{transition, Draft, Effect, Event, Session};
use crate::store::{DatabaseStore, RecordStore, StoreError};
use thiserror::Error;

/// Type alias for the registry used by the server
pub type ProductionRegistry = SessionRegistry<DatabaseStore>;

/// Why a flow could not begin
#[derive(Debug, Error)]
pub enum StartError {
    #[error("no client is available for {flow}")]
    NoEntityAvailable { flow: FlowKind },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Interprets flow graphs against sessions
pub struct ConversationEngine<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> ConversationEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a session at the flow's entry step
    pub async fn start(&self, flow: FlowKind) -> Result<(Session, Prompt), StartError> {
        let client_choices = if flow.requires_clients() {
            let clients = self.store.list_clients().await?;
            if clients.is_empty() {
                tracing::info!(%flow, "No clients stored, flow not started");
                return Err(StartError::NoEntityAvailable { flow });
            }
            clients
        } else {
            Vec::new()
        };

        let session = Session::new(flow, client_choices);
        tracing::info!(session_id = %session.id, %flow, "Session started");
        let prompt = prompt_for(&session);
        Ok((session, prompt))
    }

    /// Apply one event. On a validation error the session is left untouched.
    pub async fn submit(&self, session: &mut Session, event: Event) -> Outcome {
        let event_kind = event.kind();
        match transition(session, event) {
            Err(reason) => {
                tracing::debug!(
                    session_id = %session.id,
                    field = session.current_step.field_name(),
                    event = event_kind,
                    reason = reason.kind(),
                    "Input rejected"
                );
                Outcome::ValidationError {
                    reason,
                    prompt: prompt_for(session),
                }
            }
            Ok(result) => {
                *session = result.new_session;
                match result.effect {
                    Effect::Prompt => Outcome::Prompt(prompt_for(session)),
                    Effect::Commit(draft) => self.commit(session, draft).await,
                }
            }
        }
    }

    /// End a session without writing anything
    #[allow(clippy::needless_pass_by_value)] // the session is consumed here
    pub fn cancel(&self, session: Session) -> Outcome {
        tracing::info!(
            session_id = %session.id,
            flow = %session.flow,
            step = ?session.current_step,
            "Session cancelled"
        );
        Outcome::Terminated(Termination::Cancelled)
    }

    async fn commit(&self, session: &Session, draft: Draft) -> Outcome {
        let entity = draft.entity();
        let result = match draft {
            Draft::Client(new_client) => self.store.create_client(&new_client).await.map(|c| {
                let summary = client_summary(&c);
                (Committed::Client(c), summary)
            }),
            Draft::Reservation {
                reservation,
                client,
            } => self
                .store
                .create_reservation(&reservation)
                .await
                .map(|r| {
                    let summary = reservation_summary(&r, &client);
                    (Committed::Reservation(r), summary)
                }),
            Draft::RemoveClient(client) => {
                self.store.delete_client(client.id).await.map(|()| {
                    let summary = removal_summary(&client);
                    (Committed::ClientRemoved(client), summary)
                })
            }
        };

        match result {
            Ok((record, summary)) => {
                tracing::info!(
                    session_id = %session.id,
                    entity,
                    id = record.id(),
                    "Record committed"
                );
                Outcome::Commit { record, summary }
            }
            Err(e) => {
                tracing::error!(session_id = %session.id, entity, error = %e, "Commit failed");
                Outcome::Terminated(Termination::StoreFailure(e))
            }
        }
    }
}
