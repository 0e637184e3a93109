//! Error types for the call widget.

use std::time::Duration;

use crate::session::SessionError;
use crate::status::CallStatus;

/// Errors returned by [`CallWidgetController`](crate::CallWidgetController).
///
/// Every error is also reflected in the widget's snapshot, so callers
/// rendering the widget can ignore the return value.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WidgetError {
    /// No session or no agent id; the page needs a reload.
    #[error("call widget is not ready")]
    NotReady,

    /// A call is already being set up or running.
    #[error("a call is already in progress (status: {status})")]
    AlreadyInCall {
        /// Status at the time of the request
        status: CallStatus,
    },

    /// The vendor session failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The widget did not reach the expected status in time.
    #[error("call widget not {expected} after {timeout:?} (status: {actual})")]
    Timeout {
        /// Status waited for
        expected: CallStatus,
        /// Status when the wait gave up
        actual: CallStatus,
        /// How long the wait lasted
        timeout: Duration,
    },

    /// The controller was dropped while waiting.
    #[error("call widget was unmounted")]
    Unmounted,
}
