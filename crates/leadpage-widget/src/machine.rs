//! The widget's transition table.
//!
//! [`transition`] is a pure function from the current [`CallStatus`] and one
//! [`WidgetInput`] to a [`Transition`]: the next status, what happens to the
//! message line, and the side effect the controller must perform. The
//! controller holds no branching logic of its own.

use crate::session::SessionEvent;
use crate::status::CallStatus;

/// Fixed user-facing messages.
pub mod messages {
    /// The public key is not configured.
    pub const CONFIG_MISSING: &str = "VAPI-Konfiguration fehlt. Bitte kontaktieren Sie den Support.";
    /// The vendor session could not be constructed.
    pub const INIT_FAILED: &str = "Fehler beim Initialisieren des Telefon-Systems.";
    /// `start` called without a session or agent.
    pub const NOT_READY: &str = "System nicht bereit. Bitte laden Sie die Seite neu.";
    /// The vendor's `start` failed.
    pub const START_FAILED: &str = "Anruf konnte nicht gestartet werden. Bitte versuchen Sie es erneut.";
    /// The vendor emitted an error event.
    pub const SESSION_ERROR: &str = "Ein Fehler ist aufgetreten. Bitte versuchen Sie es erneut.";
}

/// Why initialization failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitFailure {
    /// No public key configured.
    MissingPublicKey,
    /// The session factory returned an error.
    SessionConstruction,
}

impl InitFailure {
    /// The message shown for this failure.
    pub fn message(&self) -> &'static str {
        match self {
            InitFailure::MissingPublicKey => messages::CONFIG_MISSING,
            InitFailure::SessionConstruction => messages::INIT_FAILED,
        }
    }
}

/// Everything that can happen to the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetInput {
    /// Mounting could not produce a session.
    InitFailed(InitFailure),
    /// The user pressed start. `ready` means a session and agent id exist.
    StartRequested {
        /// Preconditions for starting hold
        ready: bool,
    },
    /// The vendor's `start` failed.
    StartFailed,
    /// The user pressed stop.
    StopRequested,
    /// Vendor: call connected.
    CallStarted,
    /// Vendor: call ended.
    CallEnded,
    /// Vendor: assistant speaking.
    SpeechStarted,
    /// Vendor: assistant silent.
    SpeechEnded,
    /// Vendor: error.
    SessionFailed,
    /// The post-call reset delay ran out.
    ResetElapsed,
}

impl From<&SessionEvent> for WidgetInput {
    fn from(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::CallStart => WidgetInput::CallStarted,
            SessionEvent::CallEnd => WidgetInput::CallEnded,
            SessionEvent::SpeechStart => WidgetInput::SpeechStarted,
            SessionEvent::SpeechEnd => WidgetInput::SpeechEnded,
            SessionEvent::Error(_) => WidgetInput::SessionFailed,
        }
    }
}

/// What happens to the message line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Leave it as is.
    Keep,
    /// Remove it.
    Clear,
    /// Replace it.
    Show(&'static str),
}

/// Side effect the controller performs after applying a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Call the vendor's `start(agent_id)`.
    InvokeStart,
    /// Call the vendor's `stop()`.
    InvokeStop,
    /// Arm the timer that delivers [`WidgetInput::ResetElapsed`].
    ScheduleReset,
}

/// Result of applying one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status after the input.
    pub status: CallStatus,
    /// Message line update.
    pub notice: Notice,
    /// Side effect to perform, if any.
    pub effect: Option<Effect>,
    /// New value of the assistant-speaking flag, if it changes.
    pub speaking: Option<bool>,
}

impl Transition {
    pub(crate) fn to(status: CallStatus) -> Self {
        Self {
            status,
            notice: Notice::Keep,
            effect: None,
            speaking: None,
        }
    }

    fn show(mut self, message: &'static str) -> Self {
        self.notice = Notice::Show(message);
        self
    }

    fn clear(mut self) -> Self {
        self.notice = Notice::Clear;
        self
    }

    fn effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    fn speaking(mut self, speaking: bool) -> Self {
        self.speaking = Some(speaking);
        self
    }

    /// Returns `true` if the transition leaves everything untouched.
    pub fn is_noop(&self, from: CallStatus) -> bool {
        self.status == from
            && self.notice == Notice::Keep
            && self.effect.is_none()
            && self.speaking.is_none()
    }
}

/// Apply one input to a status.
///
/// A `start` while `connecting` or `active` is rejected with no change.
/// Vendor events that do not fit the current status are ignored, so a
/// session-start can only promote `connecting`, and a stale reset timer can
/// only clear `ended`. A stop in `error` still reaches the vendor.
pub fn transition(status: CallStatus, input: WidgetInput) -> Transition {
    use CallStatus::{Active, Connecting, Ended, Error, Idle};

    let stay = Transition::to(status);
    match (status, input) {
        (_, WidgetInput::InitFailed(failure)) => Transition::to(Error).show(failure.message()),

        (_, WidgetInput::StartRequested { ready: false }) => stay.show(messages::NOT_READY),
        (Idle | Ended | Error, WidgetInput::StartRequested { ready: true }) => Transition::to(Connecting)
            .clear()
            .effect(Effect::InvokeStart),
        (Connecting | Active, WidgetInput::StartRequested { ready: true }) => stay,

        (_, WidgetInput::StartFailed) => Transition::to(Error).show(messages::START_FAILED),

        (Connecting | Active | Error, WidgetInput::StopRequested) => stay.effect(Effect::InvokeStop),
        (Idle | Ended, WidgetInput::StopRequested) => stay,

        (Connecting, WidgetInput::CallStarted) => Transition::to(Active),
        (_, WidgetInput::CallStarted) => stay,

        (Connecting | Active, WidgetInput::CallEnded) => Transition::to(Ended)
            .effect(Effect::ScheduleReset)
            .speaking(false),
        (_, WidgetInput::CallEnded) => stay,

        (Active, WidgetInput::SpeechStarted) => stay.speaking(true),
        (_, WidgetInput::SpeechStarted) => stay,
        (_, WidgetInput::SpeechEnded) => stay.speaking(false),

        (_, WidgetInput::SessionFailed) => Transition::to(Error)
            .show(messages::SESSION_ERROR)
            .speaking(false),

        (Ended, WidgetInput::ResetElapsed) => Transition::to(Idle),
        (_, WidgetInput::ResetElapsed) => stay,
    }
}
