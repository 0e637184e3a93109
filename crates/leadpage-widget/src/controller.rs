//! The call widget controller.
//!
//! [`CallWidgetController`] owns one vendor session for the lifetime of a
//! mounted widget. User actions and vendor events are both turned into
//! [`WidgetInput`]s and run through [`transition`]; the resulting
//! [`WidgetSnapshot`] is broadcast on a watch channel.
//!
//! ```rust,no_run
//! use leadpage_core::VoiceConfig;
//! use leadpage_widget::{CallWidgetController, MockSessionFactory, MockVoiceSession};
//!
//! # async fn demo() -> Result<(), leadpage_widget::WidgetError> {
//! let voice = VoiceConfig { public_key: Some("pk_live".into()) };
//! let factory = MockSessionFactory::new(MockVoiceSession::auto_emit());
//! let widget = CallWidgetController::mount(&voice, "agent_123", &factory);
//! widget.start().await?;
//! widget.stop();
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use leadpage_core::VoiceConfig;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::WidgetError;
use crate::machine::{Effect, InitFailure, Notice, Transition, WidgetInput, transition};
use crate::session::{SessionEvent, SessionEventKind, SessionFactory, VoiceSession};
use crate::status::CallStatus;
use crate::view::WidgetView;

/// Time between a call ending and the widget returning to idle.
pub const RESET_DELAY: Duration = Duration::from_secs(3);

/// Observable widget state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WidgetSnapshot {
    /// Current status
    pub status: CallStatus,
    /// Message line, if any
    pub message: Option<&'static str>,
    /// Assistant is speaking
    pub assistant_speaking: bool,
}

impl WidgetSnapshot {
    fn apply(&mut self, t: &Transition) {
        self.status = t.status;
        match t.notice {
            Notice::Keep => {}
            Notice::Clear => self.message = None,
            Notice::Show(message) => self.message = Some(message),
        }
        if let Some(speaking) = t.speaking {
            self.assistant_speaking = speaking;
        }
    }
}

struct Inner<S> {
    agent_id: String,
    session: Option<S>,
    tx: watch::Sender<WidgetSnapshot>,
    reset_delay: Duration,
    reset_task: Mutex<Option<JoinHandle<()>>>,
    runtime: Option<Handle>,
}

impl<S: VoiceSession> Inner<S> {
    fn status(&self) -> CallStatus {
        self.tx.borrow().status
    }

    /// Apply an input atomically, then perform its effect.
    ///
    /// [`Effect::InvokeStart`] is left to the caller, which must await it.
    fn apply(self: &Arc<Self>, input: WidgetInput) -> Transition {
        let mut outcome = None;
        self.tx.send_if_modified(|snapshot| {
            let from = snapshot.status;
            let t = transition(from, input);
            let before = *snapshot;
            snapshot.apply(&t);
            outcome = Some((from, t));
            *snapshot != before
        });
        let Some((from, t)) = outcome else {
            return Transition::to(self.status());
        };

        if t.status != from {
            tracing::debug!(
                agent_id = %self.agent_id,
                from = %from,
                to = %t.status,
                ?input,
                "call widget transition"
            );
        }
        if t.status == CallStatus::Connecting && from != CallStatus::Connecting {
            self.cancel_reset();
        }

        match t.effect {
            Some(Effect::InvokeStop) => {
                if let Some(session) = &self.session {
                    session.stop();
                }
            }
            Some(Effect::ScheduleReset) => self.schedule_reset(),
            Some(Effect::InvokeStart) | None => {}
        }
        t
    }

    fn on_event(self: &Arc<Self>, event: &SessionEvent) {
        match event {
            SessionEvent::Error(detail) => {
                tracing::error!(agent_id = %self.agent_id, %detail, "voice session error");
            }
            SessionEvent::CallStart => tracing::info!(agent_id = %self.agent_id, "call started"),
            SessionEvent::CallEnd => tracing::info!(agent_id = %self.agent_id, "call ended"),
            other => tracing::trace!(event = %other.kind(), "voice session event"),
        }
        self.apply(event.into());
    }

    fn schedule_reset(self: &Arc<Self>) {
        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            tracing::warn!("no async runtime; call widget will stay ended");
            return;
        };
        let weak = Arc::downgrade(self);
        let delay = self.reset_delay;
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.apply(WidgetInput::ResetElapsed);
            }
        });
        let previous = self
            .reset_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn cancel_reset(&self) {
        let pending = self
            .reset_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = pending {
            task.abort();
        }
    }
}

/// A mounted call widget bound to one assistant.
///
/// Dropping the controller unmounts it: the vendor session is stopped and
/// any pending reset is cancelled.
pub struct CallWidgetController<S: VoiceSession> {
    inner: Arc<Inner<S>>,
}

impl<S: VoiceSession> CallWidgetController<S> {
    /// Mount with the standard reset delay.
    pub fn mount<F>(voice: &VoiceConfig, agent_id: impl Into<String>, factory: &F) -> Self
    where
        F: SessionFactory<Session = S>,
    {
        Self::mount_with(voice, agent_id, factory, RESET_DELAY)
    }

    /// Mount with a custom reset delay.
    ///
    /// A missing public key or a failing factory leaves the widget in
    /// `error` with the matching message; it never panics.
    pub fn mount_with<F>(
        voice: &VoiceConfig,
        agent_id: impl Into<String>,
        factory: &F,
        reset_delay: Duration,
    ) -> Self
    where
        F: SessionFactory<Session = S>,
    {
        let agent_id = agent_id.into();
        let (session, failure) = match voice.public_key() {
            None => {
                tracing::error!("voice public key is not configured");
                (None, Some(InitFailure::MissingPublicKey))
            }
            Some(key) => match factory.create(key) {
                Ok(session) => (Some(session), None),
                Err(err) => {
                    tracing::error!(error = %err, "failed to initialize voice session");
                    (None, Some(InitFailure::SessionConstruction))
                }
            },
        };

        let (tx, _rx) = watch::channel(WidgetSnapshot::default());
        let inner = Arc::new(Inner {
            agent_id,
            session,
            tx,
            reset_delay,
            reset_task: Mutex::new(None),
            runtime: Handle::try_current().ok(),
        });

        if let Some(failure) = failure {
            inner.apply(WidgetInput::InitFailed(failure));
        }
        if let Some(session) = &inner.session {
            tracing::debug!(agent_id = %inner.agent_id, "voice session initialized");
            for kind in SessionEventKind::ALL {
                let weak = Arc::downgrade(&inner);
                session.subscribe(
                    kind,
                    Arc::new(move |event: SessionEvent| {
                        if let Some(inner) = weak.upgrade() {
                            inner.on_event(&event);
                        }
                    }),
                );
            }
        }

        Self { inner }
    }

    /// Assistant id calls are started with.
    pub fn agent_id(&self) -> &str {
        &self.inner.agent_id
    }

    /// Returns `true` if a session exists and an agent id is set.
    pub fn is_ready(&self) -> bool {
        self.inner.session.is_some() && !self.inner.agent_id.is_empty()
    }

    /// Current status.
    pub fn status(&self) -> CallStatus {
        self.inner.status()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> WidgetSnapshot {
        *self.inner.tx.borrow()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<WidgetSnapshot> {
        self.inner.tx.subscribe()
    }

    /// What the widget shows right now.
    pub fn view(&self) -> WidgetView {
        WidgetView::derive(&self.snapshot(), !self.inner.agent_id.is_empty())
    }

    /// Start a call.
    ///
    /// Returns once the vendor accepted the request; the status stays
    /// `connecting` until the vendor reports the call as started.
    pub async fn start(&self) -> Result<(), WidgetError> {
        let ready = self.is_ready();
        let t = self.inner.apply(WidgetInput::StartRequested { ready });
        let Some(session) = self.inner.session.as_ref().filter(|_| ready) else {
            tracing::warn!("start requested before the call widget was ready");
            return Err(WidgetError::NotReady);
        };
        if t.effect != Some(Effect::InvokeStart) {
            tracing::debug!(status = %t.status, "start ignored, call already in progress");
            return Err(WidgetError::AlreadyInCall { status: t.status });
        }

        tracing::info!(agent_id = %self.inner.agent_id, "starting call");
        if let Err(err) = session.start(&self.inner.agent_id).await {
            tracing::error!(error = %err, "failed to start call");
            self.inner.apply(WidgetInput::StartFailed);
            return Err(err.into());
        }
        Ok(())
    }

    /// End the running call, or release a failed session.
    ///
    /// Does nothing when idle or after a call has ended.
    pub fn stop(&self) {
        self.inner.apply(WidgetInput::StopRequested);
    }

    /// Wait until the widget reaches `target`, or give up after `timeout`.
    pub async fn wait_for_status(
        &self,
        target: CallStatus,
        timeout: Duration,
    ) -> Result<(), WidgetError> {
        let mut rx = self.subscribe();
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        if rx.borrow_and_update().status == target {
            return Ok(());
        }

        loop {
            tokio::select! {
                _ = &mut deadline => {
                    return Err(WidgetError::Timeout {
                        expected: target,
                        actual: self.status(),
                        timeout,
                    });
                }
                result = rx.changed() => {
                    if result.is_err() {
                        return Err(WidgetError::Unmounted);
                    }
                    if rx.borrow().status == target {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Unmount the widget.
    pub fn unmount(self) {
        drop(self);
    }
}

impl<S: VoiceSession> Drop for CallWidgetController<S> {
    fn drop(&mut self) {
        if let Some(session) = &self.inner.session {
            tracing::debug!(agent_id = %self.inner.agent_id, "unmounting call widget");
            session.stop();
        }
        self.inner.cancel_reset();
    }
}

impl<S: VoiceSession> fmt::Debug for CallWidgetController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallWidgetController")
            .field("agent_id", &self.inner.agent_id)
            .field("has_session", &self.inner.session.is_some())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::machine::messages;
    use crate::mock::{MockSessionFactory, MockVoiceSession};

    fn voice() -> VoiceConfig {
        VoiceConfig {
            public_key: Some("pk_live".into()),
        }
    }

    #[tokio::test]
    async fn test_mount_without_public_key() {
        let session = MockVoiceSession::new();
        let factory = MockSessionFactory::new(session.clone());
        let widget = CallWidgetController::mount(&VoiceConfig::default(), "agent_123", &factory);

        assert_eq!(widget.status(), CallStatus::Error);
        assert_eq!(widget.snapshot().message, Some(messages::CONFIG_MISSING));
        assert!(!widget.is_ready());

        let err = widget.start().await.unwrap_err();
        assert!(matches!(err, WidgetError::NotReady));
        assert_eq!(widget.status(), CallStatus::Error);
        assert_eq!(session.start_calls(), 0);
    }

    #[tokio::test]
    async fn test_mount_with_failing_factory() {
        let widget = CallWidgetController::mount(&voice(), "agent_123", &MockSessionFactory::failing());
        assert_eq!(widget.status(), CallStatus::Error);
        assert_eq!(widget.snapshot().message, Some(messages::INIT_FAILED));
    }

    #[tokio::test]
    async fn test_mount_subscribes_every_event_kind() {
        let session = MockVoiceSession::new();
        let _widget =
            CallWidgetController::mount(&voice(), "agent_123", &MockSessionFactory::new(session.clone()));
        for kind in SessionEventKind::ALL {
            assert_eq!(session.handler_count(kind), 1, "{kind}");
        }
    }

    #[tokio::test]
    async fn test_start_without_agent_is_not_ready() {
        let session = MockVoiceSession::new();
        let widget = CallWidgetController::mount(&voice(), "", &MockSessionFactory::new(session.clone()));

        let err = widget.start().await.unwrap_err();
        assert!(matches!(err, WidgetError::NotReady));
        assert_eq!(widget.status(), CallStatus::Idle);
        assert_eq!(widget.snapshot().message, Some(messages::NOT_READY));
        assert_eq!(session.start_calls(), 0);
    }

    #[tokio::test]
    async fn test_drop_stops_session() {
        let session = MockVoiceSession::new();
        let widget =
            CallWidgetController::mount(&voice(), "agent_123", &MockSessionFactory::new(session.clone()));
        widget.unmount();
        assert_eq!(session.stop_calls(), 1);
    }

    #[tokio::test]
    async fn test_events_after_unmount_are_ignored() {
        let session = MockVoiceSession::new();
        let widget =
            CallWidgetController::mount(&voice(), "agent_123", &MockSessionFactory::new(session.clone()));
        let rx = widget.subscribe();
        drop(widget);
        session.emit(SessionEvent::CallStart);
        assert_eq!(rx.borrow().status, CallStatus::Idle);
    }
}
