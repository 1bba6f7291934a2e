use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;
use widgetdesk_core::widget::{SessionEvent, SessionEventEnvelope};

/// Fan-out of session events to any number of subscribers.
///
/// Subscribers whose receiver was dropped are pruned on the next publish.
pub struct EventHub {
    session_id: String,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SessionEventEnvelope>>>,
}

impl EventHub {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Registers a new subscriber and returns its receiving end.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEventEnvelope> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    /// Sends `events` in order to every live subscriber.
    pub fn publish(&self, events: Vec<SessionEvent>) {
        if events.is_empty() {
            return;
        }
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for event in events {
            let envelope = SessionEventEnvelope::new(self.session_id.clone(), event);
            // Non-blocking send; a closed receiver just drops out
            subscribers.retain(|sender| sender.send(envelope.clone()).is_ok());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
