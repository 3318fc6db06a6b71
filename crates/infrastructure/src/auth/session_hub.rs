//! In-memory session state with subscriber fan-out.
//!
//! The backend owns sessions; this hub only mirrors the current one for
//! the lifetime of the process and notifies subscribers when it
//! changes. Nothing is persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use sesame_application::{SessionEvents, SubscriptionGuard};
use sesame_domain::Session;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Thread-safe holder of the current session and its subscribers.
#[derive(Debug, Clone, Default)]
pub struct SessionHub {
    inner: Arc<Mutex<HubInner>>,
}

#[derive(Debug, Default)]
struct HubInner {
    session: Option<Session>,
    subscribers: HashMap<Uuid, mpsc::UnboundedSender<Option<Session>>>,
}

impl SessionHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current session, if any.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    /// Replaces the current session and notifies every subscriber.
    ///
    /// Subscribers whose receiving side has gone away are pruned.
    pub fn replace(&self, session: Option<Session>) {
        let mut inner = self.lock();
        inner.session.clone_from(&session);
        inner
            .subscribers
            .retain(|_, sender| sender.send(session.clone()).is_ok());
    }

    /// Registers a subscriber; the registration is released when the
    /// returned subscription is cancelled or dropped.
    #[must_use]
    pub fn subscribe(&self) -> SessionEvents {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = Uuid::now_v7();
        self.lock().subscribers.insert(id, sender);

        let registry = Arc::clone(&self.inner);
        let guard = SubscriptionGuard::new(move || {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .subscribers
                .remove(&id);
        });

        SessionEvents::new(receiver, guard)
    }

    /// Number of live registrations.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
