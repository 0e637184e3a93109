//! The vendor voice session, seen through a narrow interface.
//!
//! The vendor SDK object keeps its own mutable state and reports progress
//! only through events. The controller talks to it through
//! [`VoiceSession`] and keeps its own status as the source of truth.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

/// Category of a vendor session event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    /// The call connected.
    CallStart,
    /// The call ended, from either side.
    CallEnd,
    /// The assistant started speaking.
    SpeechStart,
    /// The assistant stopped speaking.
    SpeechEnd,
    /// The session failed.
    Error,
}

impl SessionEventKind {
    /// Every kind the controller subscribes to.
    pub const ALL: [SessionEventKind; 5] = [
        SessionEventKind::CallStart,
        SessionEventKind::CallEnd,
        SessionEventKind::SpeechStart,
        SessionEventKind::SpeechEnd,
        SessionEventKind::Error,
    ];

    /// Vendor event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEventKind::CallStart => "call-start",
            SessionEventKind::CallEnd => "call-end",
            SessionEventKind::SpeechStart => "speech-start",
            SessionEventKind::SpeechEnd => "speech-end",
            SessionEventKind::Error => "error",
        }
    }
}

impl fmt::Display for SessionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event emitted by the vendor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The call connected.
    CallStart,
    /// The call ended.
    CallEnd,
    /// The assistant started speaking.
    SpeechStart,
    /// The assistant stopped speaking.
    SpeechEnd,
    /// The session failed; the payload is vendor detail for logs only.
    Error(String),
}

impl SessionEvent {
    /// The event's category.
    pub fn kind(&self) -> SessionEventKind {
        match self {
            SessionEvent::CallStart => SessionEventKind::CallStart,
            SessionEvent::CallEnd => SessionEventKind::CallEnd,
            SessionEvent::SpeechStart => SessionEventKind::SpeechStart,
            SessionEvent::SpeechEnd => SessionEventKind::SpeechEnd,
            SessionEvent::Error(_) => SessionEventKind::Error,
        }
    }
}

/// Callback registered for one event kind.
pub type EventHandler = Arc<dyn Fn(SessionEvent) + Send + Sync>;

/// Errors raised by the vendor session itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The session object could not be constructed.
    #[error("voice session could not be created: {0}")]
    Init(String),

    /// `start` threw.
    #[error("voice session could not start: {0}")]
    Start(String),
}

/// A real-time voice session owned by one controller.
///
/// `start` resolves once the request is handed to the vendor; the call is
/// only live after a [`SessionEvent::CallStart`] arrives. Handlers may be
/// invoked from any thread, in the order the vendor emits events.
#[async_trait]
pub trait VoiceSession: Send + Sync + 'static {
    /// Start a call with the given assistant.
    async fn start(&self, agent_id: &str) -> Result<(), SessionError>;

    /// Hang up. Must be safe to call at any time, including with no call.
    fn stop(&self);

    /// Register a handler for one event kind.
    fn subscribe(&self, kind: SessionEventKind, handler: EventHandler);
}

/// Builds vendor sessions from the client-exposed public key.
pub trait SessionFactory {
    /// Session type produced.
    type Session: VoiceSession;

    /// Construct a session.
    fn create(&self, public_key: &str) -> Result<Self::Session, SessionError>;
}
