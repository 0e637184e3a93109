//! What the widget shows for a given snapshot.

use leadpage_core::VoiceConfig;
use serde::Serialize;

use crate::controller::WidgetSnapshot;
use crate::machine::{InitFailure, Notice, WidgetInput, transition};
use crate::status::CallStatus;

/// Label on the start button.
pub const START_LABEL: &str = "Anruf starten";
/// Label on the stop button.
pub const STOP_LABEL: &str = "Anruf beenden";
/// Label on the busy button while connecting.
pub const CONNECTING_LABEL: &str = "Verbinde...";

/// Visual tone of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Waiting on the vendor.
    Pending,
    /// Call running.
    Live,
    /// Call over.
    Neutral,
    /// Failure.
    Alert,
}

impl Tone {
    /// CSS class for the status line.
    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Pending => "status status-pending",
            Tone::Live => "status status-live",
            Tone::Neutral => "status status-neutral",
            Tone::Alert => "status status-alert",
        }
    }
}

/// The status line above the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusDisplay {
    /// Text shown
    pub text: &'static str,
    /// Tone
    pub tone: Tone,
}

impl StatusDisplay {
    /// Status line for a status; `idle` shows none.
    pub fn for_status(status: CallStatus) -> Option<Self> {
        let (text, tone) = match status {
            CallStatus::Idle => return None,
            CallStatus::Connecting => (CONNECTING_LABEL, Tone::Pending),
            CallStatus::Active => ("🎙️ Gespräch aktiv", Tone::Live),
            CallStatus::Ended => ("Gespräch beendet", Tone::Neutral),
            CallStatus::Error => ("Fehler", Tone::Alert),
        };
        Some(Self { text, tone })
    }
}

/// The single button the widget shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ButtonAffordance {
    /// Start a call; disabled without an agent id.
    Start {
        /// Clickable
        enabled: bool,
    },
    /// End the running call.
    Stop,
    /// Disabled spinner.
    Busy {
        /// Text next to the spinner
        label: &'static str,
    },
}

impl ButtonAffordance {
    /// Button for a status.
    pub fn for_status(status: CallStatus, has_agent: bool) -> Self {
        match status {
            CallStatus::Idle | CallStatus::Ended | CallStatus::Error => {
                ButtonAffordance::Start { enabled: has_agent }
            }
            CallStatus::Active => ButtonAffordance::Stop,
            CallStatus::Connecting => ButtonAffordance::Busy {
                label: CONNECTING_LABEL,
            },
        }
    }

    /// Button text.
    pub fn label(&self) -> &'static str {
        match self {
            ButtonAffordance::Start { .. } => START_LABEL,
            ButtonAffordance::Stop => STOP_LABEL,
            ButtonAffordance::Busy { label } => label,
        }
    }

    /// Returns `true` if the button can be clicked.
    pub fn is_enabled(&self) -> bool {
        match self {
            ButtonAffordance::Start { enabled } => *enabled,
            ButtonAffordance::Stop => true,
            ButtonAffordance::Busy { .. } => false,
        }
    }
}

/// Everything needed to draw the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetView {
    /// Current status
    pub status: CallStatus,
    /// Status line, absent when idle
    pub status_display: Option<StatusDisplay>,
    /// Error message line
    pub message: Option<&'static str>,
    /// The button
    pub button: ButtonAffordance,
    /// Assistant is speaking
    pub assistant_speaking: bool,
}

impl WidgetView {
    /// Derive the view from a snapshot.
    pub fn derive(snapshot: &WidgetSnapshot, has_agent: bool) -> Self {
        Self {
            status: snapshot.status,
            status_display: StatusDisplay::for_status(snapshot.status),
            message: snapshot.message,
            button: ButtonAffordance::for_status(snapshot.status, has_agent),
            assistant_speaking: snapshot.assistant_speaking,
        }
    }

    /// The view a freshly mounted widget shows, before any session exists.
    ///
    /// Used for server-side rendering, where only the public key's presence
    /// is known.
    pub fn initial(voice: &VoiceConfig, agent_id: &str) -> Self {
        let mut snapshot = WidgetSnapshot::default();
        if voice.public_key().is_none() {
            let t = transition(
                snapshot.status,
                WidgetInput::InitFailed(InitFailure::MissingPublicKey),
            );
            snapshot.status = t.status;
            if let Notice::Show(message) = t.notice {
                snapshot.message = Some(message);
            }
        }
        Self::derive(&snapshot, !agent_id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::messages;

    fn snapshot(status: CallStatus) -> WidgetSnapshot {
        WidgetSnapshot {
            status,
            ..WidgetSnapshot::default()
        }
    }

    #[test]
    fn test_idle_shows_enabled_start() {
        let view = WidgetView::derive(&snapshot(CallStatus::Idle), true);
        assert_eq!(view.status_display, None);
        assert_eq!(view.button, ButtonAffordance::Start { enabled: true });
        assert_eq!(view.button.label(), "Anruf starten");
    }

    #[test]
    fn test_idle_without_agent_disables_start() {
        let view = WidgetView::derive(&snapshot(CallStatus::Idle), false);
        assert!(!view.button.is_enabled());
    }

    #[test]
    fn test_connecting_is_busy() {
        let view = WidgetView::derive(&snapshot(CallStatus::Connecting), true);
        assert_eq!(view.status_display.map(|d| d.text), Some("Verbinde..."));
        assert!(!view.button.is_enabled());
        assert_eq!(view.button.label(), "Verbinde...");
    }

    #[test]
    fn test_active_shows_stop() {
        let view = WidgetView::derive(&snapshot(CallStatus::Active), true);
        assert_eq!(view.status_display.map(|d| d.text), Some("🎙️ Gespräch aktiv"));
        assert_eq!(view.button, ButtonAffordance::Stop);
        assert_eq!(view.button.label(), "Anruf beenden");
    }

    #[test]
    fn test_ended_and_error_offer_start() {
        let ended = WidgetView::derive(&snapshot(CallStatus::Ended), true);
        assert_eq!(ended.status_display.map(|d| d.text), Some("Gespräch beendet"));
        assert_eq!(ended.button.label(), "Anruf starten");

        let error = WidgetView::derive(&snapshot(CallStatus::Error), true);
        assert_eq!(error.status_display.map(|d| d.tone), Some(Tone::Alert));
        assert_eq!(error.status_display.map(|d| d.text), Some("Fehler"));
        assert!(error.button.is_enabled());
    }

    #[test]
    fn test_initial_without_public_key() {
        let view = WidgetView::initial(&VoiceConfig::default(), "agent_123");
        assert_eq!(view.status, CallStatus::Error);
        assert_eq!(view.message, Some(messages::CONFIG_MISSING));
    }

    #[test]
    fn test_initial_with_public_key() {
        let voice = VoiceConfig {
            public_key: Some("pk_live".into()),
        };
        let view = WidgetView::initial(&voice, "agent_123");
        assert_eq!(view.status, CallStatus::Idle);
        assert_eq!(view.message, None);
        assert!(view.button.is_enabled());
    }
}
