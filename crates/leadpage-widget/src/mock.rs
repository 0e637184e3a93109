//! In-process voice session for demos and tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::session::{
    EventHandler, SessionError, SessionEvent, SessionEventKind, SessionFactory, VoiceSession,
};

#[derive(Default)]
struct MockInner {
    handlers: Mutex<HashMap<SessionEventKind, Vec<EventHandler>>>,
    started: Mutex<Vec<String>>,
    stops: Mutex<usize>,
    auto_emit: bool,
    fail_start: Option<String>,
}

/// A [`VoiceSession`] driven by hand.
///
/// By default nothing is emitted on its own; call [`emit`](Self::emit) to
/// play the vendor's part. With [`auto_emit`](Self::auto_emit) the session
/// emits `call-start` from `start` and `call-end` from `stop`, which is
/// enough for a scripted demo. Clones share state.
#[derive(Clone, Default)]
pub struct MockVoiceSession {
    inner: Arc<MockInner>,
}

impl MockVoiceSession {
    /// A session that only emits what the test tells it to.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that connects on `start` and ends on `stop`.
    pub fn auto_emit() -> Self {
        Self {
            inner: Arc::new(MockInner {
                auto_emit: true,
                ..MockInner::default()
            }),
        }
    }

    /// A session whose `start` always fails with the given reason.
    pub fn failing_start(reason: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(MockInner {
                fail_start: Some(reason.into()),
                ..MockInner::default()
            }),
        }
    }

    /// Deliver an event to every handler registered for its kind.
    pub fn emit(&self, event: SessionEvent) {
        let handlers = self
            .inner
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event.kind())
            .cloned()
            .unwrap_or_default();
        for handler in handlers {
            handler(event.clone());
        }
    }

    /// Agent ids passed to `start`, in order.
    pub fn started_with(&self) -> Vec<String> {
        self.inner
            .started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `start` calls.
    pub fn start_calls(&self) -> usize {
        self.started_with().len()
    }

    /// Number of `stop` calls.
    pub fn stop_calls(&self) -> usize {
        *self.inner.stops.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of handlers registered for a kind.
    pub fn handler_count(&self, kind: SessionEventKind) -> usize {
        self.inner
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

impl fmt::Debug for MockVoiceSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockVoiceSession")
            .field("auto_emit", &self.inner.auto_emit)
            .field("start_calls", &self.start_calls())
            .field("stop_calls", &self.stop_calls())
            .finish()
    }
}

#[async_trait]
impl VoiceSession for MockVoiceSession {
    async fn start(&self, agent_id: &str) -> Result<(), SessionError> {
        self.inner
            .started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(agent_id.to_string());

        if let Some(reason) = &self.inner.fail_start {
            return Err(SessionError::Start(reason.clone()));
        }
        if self.inner.auto_emit {
            self.emit(SessionEvent::CallStart);
        }
        Ok(())
    }

    fn stop(&self) {
        *self.inner.stops.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        if self.inner.auto_emit {
            self.emit(SessionEvent::CallEnd);
        }
    }

    fn subscribe(&self, kind: SessionEventKind, handler: EventHandler) {
        self.inner
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push(handler);
    }
}

/// Factory handing out a prepared [`MockVoiceSession`], or failing.
#[derive(Debug, Clone)]
pub struct MockSessionFactory {
    session: MockVoiceSession,
    fail: bool,
}

impl MockSessionFactory {
    /// Hands out clones of `session`.
    pub fn new(session: MockVoiceSession) -> Self {
        Self {
            session,
            fail: false,
        }
    }

    /// Always fails to construct a session.
    pub fn failing() -> Self {
        Self {
            session: MockVoiceSession::new(),
            fail: true,
        }
    }
}

impl SessionFactory for MockSessionFactory {
    type Session = MockVoiceSession;

    fn create(&self, public_key: &str) -> Result<MockVoiceSession, SessionError> {
        if self.fail {
            return Err(SessionError::Init(format!(
                "rejected public key of {} chars",
                public_key.len()
            )));
        }
        Ok(self.session.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_records_calls() {
        let session = MockVoiceSession::new();
        session.start("agent_123").await.unwrap();
        session.stop();
        session.stop();
        assert_eq!(session.started_with(), vec!["agent_123".to_string()]);
        assert_eq!(session.stop_calls(), 2);
    }

    #[tokio::test]
    async fn test_auto_emit() {
        let session = MockVoiceSession::auto_emit();
        let seen = Arc::new(AtomicUsize::new(0));
        for kind in [SessionEventKind::CallStart, SessionEventKind::CallEnd] {
            let seen = Arc::clone(&seen);
            session.subscribe(
                kind,
                Arc::new(move |_| {
                    seen.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }
        session.start("agent_123").await.unwrap();
        session.stop();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failing_start() {
        let session = MockVoiceSession::failing_start("no microphone");
        let err = session.start("agent_123").await.unwrap_err();
        assert_eq!(err, SessionError::Start("no microphone".into()));
        assert_eq!(session.start_calls(), 1);
    }

    #[test]
    fn test_emit_only_reaches_matching_kind() {
        let session = MockVoiceSession::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        session.subscribe(
            SessionEventKind::SpeechStart,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        session.emit(SessionEvent::SpeechEnd);
        session.emit(SessionEvent::SpeechStart);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(session.handler_count(SessionEventKind::SpeechStart), 1);
    }

    #[test]
    fn test_factory() {
        let session = MockVoiceSession::new();
        let created = MockSessionFactory::new(session.clone()).create("pk").unwrap();
        created.stop();
        assert_eq!(session.stop_calls(), 1);

        assert!(MockSessionFactory::failing().create("pk").is_err());
    }
}
