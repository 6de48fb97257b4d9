//! Events that can occur in a conversation

use crate::flow::BACK_TOKEN;

/// Inbound user action for the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Free text message
    Text(String),
    /// Button click carrying a namespaced selection token
    Button(String),
    /// Return to the previous step
    Back,
}

impl Event {
    /// Classify a button token; the back button is its own event
    pub fn button(token: impl Into<String>) -> Self {
        let token = token.into();
        if token == BACK_TOKEN {
            Event::Back
        } else {
            Event::Button(token)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Text(_) => "text",
            Event::Button(_) => "button",
            Event::Back => "back",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_token_becomes_back_event() {
        assert_eq!(Event::button("back"), Event::Back);
        assert_eq!(
            Event::button("type_massage"),
            Event::Button("type_massage".to_string())
        );
    }
}
