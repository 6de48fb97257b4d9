//! Session state

use crate::db::{Client, ServiceType};
use crate::flow::{service_from_choice, Answer, FlowKind, StepId};
use std::collections::BTreeMap;

/// Per-user scratch space for one conversation
///
/// Created on flow entry and mutated only through [`super::transition`]. The
/// engine drops it on commit, cancellation or store failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub flow: FlowKind,
    pub current_step: StepId,
    /// Answers keyed by the step that collected them
    pub collected: BTreeMap<StepId, Answer>,
    pub selected_client: Option<Client>,
    pub service_type: Option<ServiceType>,
    /// Steps answered on the way to `current_step`, oldest first
    pub history: Vec<StepId>,
    /// Clients offered for selection, snapshotted at start
    pub client_choices: Vec<Client>,
}

impl Session {
    pub fn new(flow: FlowKind, client_choices: Vec<Client>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            flow,
            current_step: flow.entry(),
            collected: BTreeMap::new(),
            selected_client: None,
            service_type: None,
            history: Vec::new(),
            client_choices,
        }
    }

    pub fn is_at_entry(&self) -> bool {
        self.current_step == self.flow.entry()
    }

    pub fn answer(&self, step: StepId) -> Option<&Answer> {
        self.collected.get(&step)
    }

    pub fn text(&self, step: StepId) -> Option<&str> {
        self.answer(step).and_then(Answer::as_text)
    }

    pub fn count(&self, step: StepId) -> Option<u32> {
        self.answer(step).and_then(Answer::as_count)
    }

    pub fn choice(&self, step: StepId) -> Option<&str> {
        self.answer(step).and_then(Answer::as_choice)
    }

    /// Client from the start-time snapshot matching a selection value
    pub fn client_choice(&self, value: &str) -> Option<&Client> {
        let id: i64 = value.parse().ok()?;
        self.client_choices.iter().find(|c| c.id.0 == id)
    }

    /// Store an answer for `step`, updating the derived selections
    pub(crate) fn record(&mut self, step: StepId, answer: Answer) {
        match step {
            StepId::ChooseClient | StepId::ChooseClientToRemove => {
                self.selected_client = answer
                    .as_choice()
                    .and_then(|value| self.client_choice(value))
                    .cloned();
            }
            StepId::ChooseType => {
                // A new fan-out choice invalidates whatever any branch collected
                for service in ServiceType::ALL {
                    for branch_step in StepId::branch(service) {
                        self.collected.remove(branch_step);
                    }
                }
                self.service_type = answer.as_choice().and_then(service_from_choice);
            }
            _ => {}
        }
        self.collected.insert(step, answer);
    }

    /// Discard the answer of `step` and anything derived from it
    pub(crate) fn forget(&mut self, step: StepId) {
        self.collected.remove(&step);
        match step {
            StepId::ChooseClient | StepId::ChooseClientToRemove => self.selected_client = None,
            StepId::ChooseType => self.service_type = None,
            _ => {}
        }
    }
}
