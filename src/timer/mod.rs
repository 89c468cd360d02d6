//! Timer engine
//!
//! Pure state machines for the standard countdown and the two-sided chess
//! clock, plus the alert trigger and display helpers they share. Nothing in
//! here knows about wall-clock time: a tick source calls `tick()` once per
//! [`TICK_MS`] while a machine reports that it wants ticks.

pub mod alert;
pub mod chess;
pub mod display;
pub mod standard;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

pub use alert::{alert_for, Alert};
pub use chess::{ChessStatus, ChessTimer};
pub use display::{format_clock, is_low_time_chess, is_low_time_standard};
pub use standard::{RunState, StandardTimer};

/// Length of one tick in milliseconds
pub const TICK_MS: u64 = 100;

/// Remaining time at or below which the warning alert fires
pub const WARNING_THRESHOLD_MS: u64 = 30_000;

/// Standalone standard timer duration
pub const DEFAULT_STANDARD_MINUTES: u32 = 4;

/// Standalone chess timer duration per side
pub const DEFAULT_CHESS_MINUTES: u32 = 5;

/// One side of a debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The opposing side
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Parse a side from a path segment such as `a` or `B`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "a" | "A" => Some(Side::A),
            "b" | "B" => Some(Side::B),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Which of the two machines a timer is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Standard,
    Chess,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::Standard => write!(f, "standard"),
            TimerKind::Chess => write!(f, "chess"),
        }
    }
}

/// Convert a user-supplied minute count into milliseconds
pub fn minutes_to_ms(minutes: u32) -> u64 {
    u64::from(minutes) * 60_000
}

/// Validate raw minute input from the configuration boundary
pub fn validate_minutes(minutes: i64) -> Result<u32, TimerError> {
    if minutes < 1 {
        return Err(TimerError::InvalidMinutes(minutes));
    }
    u32::try_from(minutes).map_err(|_| TimerError::InvalidMinutes(minutes))
}

/// Advance a running countdown by one tick.
///
/// Returns the new remaining value, floored at zero, and the alert the step
/// crossed, if any.
pub fn countdown_step(remaining_ms: u64) -> (u64, Option<Alert>) {
    let next = remaining_ms.saturating_sub(TICK_MS);
    (next, alert_for(remaining_ms, next))
}
