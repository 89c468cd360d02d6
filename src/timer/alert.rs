//! Level-crossing alert trigger

use serde::{Deserialize, Serialize};

use super::WARNING_THRESHOLD_MS;

/// Audible alert raised by a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alert {
    /// Remaining time crossed the 30 second mark
    Warning,
    /// Remaining time reached zero
    End,
}

impl Alert {
    pub fn as_str(self) -> &'static str {
        match self {
            Alert::Warning => "warning",
            Alert::End => "end",
        }
    }
}

/// Decide which alert, if any, a single countdown step crosses.
///
/// Both alerts fire on the crossing only, never while the value merely sits
/// below the threshold. A step that crosses both thresholds at once reports
/// `End`.
pub fn alert_for(prev_ms: u64, next_ms: u64) -> Option<Alert> {
    if prev_ms > 0 && next_ms == 0 {
        Some(Alert::End)
    } else if prev_ms > WARNING_THRESHOLD_MS && next_ms <= WARNING_THRESHOLD_MS {
        Some(Alert::Warning)
    } else {
        None
    }
}
