//! Conversation state machine
//!
//! Elm-style pure transitions over the flow graphs: a session and an event in,
//! the next session and an effect out. Store writes happen in the engine.

mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Draft, Effect};
pub use event::Event;
pub use state::Session;
pub use transition::transition;
#[cfg(test)]
pub use transition::TransitionResult;
