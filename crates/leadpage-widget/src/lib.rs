//! Call widget for the lead landing page.
//!
//! The widget lets a visitor start and end a live voice call with the
//! lead's assistant. The vendor session sits behind [`VoiceSession`]; the
//! widget's behaviour is the pure transition table in [`machine`], driven by
//! [`CallWidgetController`].
//!
//! # Modules
//!
//! - [`status`]: [`CallStatus`]
//! - [`machine`]: inputs, effects and the transition function
//! - [`session`]: the vendor session interface
//! - [`controller`]: the mounted widget
//! - [`view`]: status line, message and button for a snapshot
//! - [`mock`]: an in-process session for demos and tests

pub mod controller;
pub mod error;
pub mod machine;
pub mod mock;
pub mod session;
pub mod status;
pub mod view;

pub use controller::{CallWidgetController, RESET_DELAY, WidgetSnapshot};
pub use error::WidgetError;
pub use machine::{Effect, InitFailure, Notice, Transition, WidgetInput, messages, transition};
pub use mock::{MockSessionFactory, MockVoiceSession};
pub use session::{
    EventHandler, SessionError, SessionEvent, SessionEventKind, SessionFactory, VoiceSession,
};
pub use status::CallStatus;
pub use view::{ButtonAffordance, StatusDisplay, Tone, WidgetView};
