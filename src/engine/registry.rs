//! Per-chat session registry
//!
//! Each chat owns at most one live session, held in its own async mutex so
//! events for the same chat are applied one at a time while other chats
//! proceed independently.

use super::{ConversationEngine, Outcome, StartError};
use crate::flow::{FlowKind, Prompt};
use crate::state_machine::{Event, Session};
use crate::store::RecordStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;

struct Slot {
    /// `None` once the session has ended or been replaced
    session: Option<Session>,
    last_active: Instant,
}

type SlotHandle = Arc<Mutex<Slot>>;

/// Manager for all live sessions
pub struct SessionRegistry<S: RecordStore> {
    engine: ConversationEngine<S>,
    sessions: RwLock<HashMap<String, SlotHandle>>,
    idle_timeout: Option<Duration>,
}

impl<S: RecordStore> SessionRegistry<S> {
    /// `idle_timeout: None` keeps sessions until they finish
    pub fn new(engine: ConversationEngine<S>, idle_timeout: Option<Duration>) -> Self {
        Self {
            engine,
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn engine(&self) -> &ConversationEngine<S> {
        &self.engine
    }

    async fn slot(&self, chat_id: &str) -> Option<SlotHandle> {
        self.sessions.read().await.get(chat_id).cloned()
    }

    async fn remove_if_current(&self, chat_id: &str, slot: &SlotHandle) {
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(chat_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            sessions.remove(chat_id);
        }
    }

    /// Whether the chat has a session in progress
    #[cfg(test)]
    pub async fn is_active(&self, chat_id: &str) -> bool {
        match self.slot(chat_id).await {
            Some(slot) => slot.lock().await.session.is_some(),
            None => false,
        }
    }

    /// Start a flow for a chat, replacing any session already in progress
    pub async fn start(&self, chat_id: &str, flow: FlowKind) -> Result<Prompt, StartError> {
        let (session, prompt) = self.engine.start(flow).await?;
        let session_id = session.id.clone();
        let slot = Arc::new(Mutex::new(Slot {
            session: Some(session),
            last_active: Instant::now(),
        }));

        let previous = self
            .sessions
            .write()
            .await
            .insert(chat_id.to_string(), slot);

        if let Some(previous) = previous {
            if let Some(old) = previous.lock().await.session.take() {
                tracing::info!(
                    chat_id,
                    old_session = %old.id,
                    new_session = %session_id,
                    "Session replaced by new flow"
                );
            }
        }
        Ok(prompt)
    }

    /// Route an event to the chat's session. `None` when no session is active.
    pub async fn submit(&self, chat_id: &str, event: Event) -> Option<Outcome> {
        let slot = self.slot(chat_id).await?;
        let mut guard = slot.lock().await;
        let session = guard.session.as_mut()?;

        let outcome = self.engine.submit(session, event).await;
        guard.last_active = Instant::now();

        if outcome.ends_session() {
            guard.session = None;
            drop(guard);
            self.remove_if_current(chat_id, &slot).await;
        }
        Some(outcome)
    }

    /// Cancel the chat's session. `None` when no session is active.
    pub async fn cancel(&self, chat_id: &str) -> Option<Outcome> {
        let slot = self.slot(chat_id).await?;
        let session = slot.lock().await.session.take()?;
        self.remove_if_current(chat_id, &slot).await;
        Some(self.engine.cancel(session))
    }

    /// Drop sessions idle for longer than the configured timeout
    pub async fn expire_idle(&self) -> usize {
        self.expire_idle_at(Instant::now()).await
    }

    /// Idle sweep against an explicit clock reading
    pub async fn expire_idle_at(&self, now: Instant) -> usize {
        let Some(timeout) = self.idle_timeout else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|chat_id, slot| {
            // A slot locked by an in-flight event is not idle
            let Ok(mut guard) = slot.try_lock() else {
                return true;
            };
            if now.saturating_duration_since(guard.last_active) <= timeout
                && guard.session.is_some()
            {
                return true;
            }
            if let Some(session) = guard.session.take() {
                tracing::info!(
                    chat_id = %chat_id,
                    session_id = %session.id,
                    flow = %session.flow,
                    "Session expired"
                );
            }
            false
        });
        before - sessions.len()
    }

    /// Number of chats with a live session slot
    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl<S: RecordStore + 'static> SessionRegistry<S> {
    /// Spawn the periodic idle sweeper. Returns `None` when expiry is disabled.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> Option<JoinHandle<()>> {
        let timeout = self.idle_timeout?;
        let registry = Arc::clone(self);

        tracing::info!(
            idle_secs = timeout.as_secs(),
            every_secs = every.as_secs(),
            "Session sweeper started"
        );
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let expired = registry.expire_idle().await;
                if expired > 0 {
                    let remaining = registry.active_sessions().await;
                    tracing::debug!(expired, remaining, "Idle sessions swept");
                }
            }
        }))
    }
}
