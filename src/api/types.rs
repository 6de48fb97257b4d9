//! API request and response types

use super::menu::main_menu;
use crate::db::{Client, Reservation};
use crate::engine::Outcome;
use crate::flow::{ChoiceOption, Prompt, Rejection};
use serde::{Deserialize, Serialize};

/// Inbound chat message: free text or a button token
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub button: Option<String>,
}

/// What the chat client should display
#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    /// `prompt`, `commit`, `validation`, `protocol_mismatch`, `cancelled`,
    /// `store_failure`, `no_entity`, `menu` or `info`
    pub kind: &'static str,
    pub text: String,
    /// Inline buttons for the current step
    pub options: Vec<ChoiceOption>,
    /// Reply-keyboard rows, present when no flow is running
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub menu: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<Rejection>,
}

impl ReplyResponse {
    fn new(kind: &'static str, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            options: Vec::new(),
            menu: Vec::new(),
            summary: None,
            record_id: None,
            reason: None,
        }
    }

    fn with_menu(mut self) -> Self {
        self.menu = main_menu();
        self
    }

    pub fn prompt(prompt: Prompt) -> Self {
        Self {
            options: prompt.options,
            ..Self::new("prompt", prompt.text)
        }
    }

    /// Plain text reply followed by the main menu
    pub fn menu(kind: &'static str, text: impl Into<String>) -> Self {
        Self::new(kind, text).with_menu()
    }

    pub fn from_outcome(outcome: Outcome) -> Self {
        let kind = outcome.kind();
        match outcome {
            Outcome::Prompt(prompt) => Self::prompt(prompt),
            Outcome::Commit { record, summary } => Self {
                summary: Some(summary.clone()),
                record_id: Some(record.id()),
                ..Self::new(kind, summary).with_menu()
            },
            Outcome::ValidationError { reason, prompt } => Self {
                options: prompt.options,
                reason: Some(reason),
                ..Self::new(kind, format!("⚠️ {reason}\n\n{}", prompt.text))
            },
            Outcome::Terminated(termination) => Self::menu(kind, termination.to_string()),
        }
    }
}

/// Response with a list of clients
#[derive(Debug, Serialize)]
pub struct ClientListResponse {
    pub clients: Vec<Client>,
}

/// Response with a single client
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub client: Client,
}

/// Response with a client's reservations, ordered by date and time
#[derive(Debug, Serialize)]
pub struct ReservationListResponse {
    pub reservations: Vec<Reservation>,
}

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
