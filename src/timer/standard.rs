//! Standard single countdown

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{countdown_step, minutes_to_ms, validate_minutes, Alert};
use crate::error::TimerError;

/// Whether the countdown is advancing.
///
/// `Stopped` covers both "not yet started" and "paused"; they differ only in
/// whether any time has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Stopped,
    Running,
}

/// Single countdown with run/pause, reset and an adjustable duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardTimer {
    duration_ms: u64,
    remaining_ms: u64,
    run_state: RunState,
    /// False when the duration comes from a round config
    adjustable: bool,
}

impl StandardTimer {
    /// A timer the user may re-time with [`StandardTimer::set_duration_minutes`]
    pub fn standalone(duration_ms: u64) -> Self {
        Self::build(duration_ms, true)
    }

    /// A timer whose duration is fixed by a round
    pub fn for_round(duration_ms: u64) -> Self {
        Self::build(duration_ms, false)
    }

    fn build(duration_ms: u64, adjustable: bool) -> Self {
        Self {
            duration_ms,
            remaining_ms: duration_ms,
            run_state: RunState::Stopped,
            adjustable,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_adjustable(&self) -> bool {
        self.adjustable
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// True when stopped part-way through a countdown
    pub fn is_paused(&self) -> bool {
        !self.is_running() && self.remaining_ms < self.duration_ms
    }

    /// Flip between running and stopped. A finished countdown stays stopped.
    pub fn toggle(&mut self) -> RunState {
        self.run_state = match self.run_state {
            RunState::Stopped if self.remaining_ms == 0 => RunState::Stopped,
            RunState::Stopped => RunState::Running,
            RunState::Running => RunState::Stopped,
        };
        self.run_state
    }

    /// Stop and rewind to the full duration
    pub fn reset(&mut self) {
        self.run_state = RunState::Stopped;
        self.remaining_ms = self.duration_ms;
    }

    /// Re-time the countdown. Any countdown in progress is abandoned.
    pub fn set_duration_minutes(&mut self, minutes: i64) -> Result<(), TimerError> {
        if !self.adjustable {
            return Err(TimerError::DurationLocked);
        }
        let minutes = validate_minutes(minutes)?;
        self.duration_ms = minutes_to_ms(minutes);
        self.remaining_ms = self.duration_ms;
        self.run_state = RunState::Stopped;
        Ok(())
    }

    /// Whether a tick source should be driving this timer
    pub fn wants_ticks(&self) -> bool {
        self.is_running() && self.remaining_ms > 0
    }

    /// Apply one tick. Reaching zero stops the timer in the same tick.
    pub fn tick(&mut self) -> Option<Alert> {
        if !self.wants_ticks() {
            return None;
        }

        let (next, alert) = countdown_step(self.remaining_ms);
        self.remaining_ms = next;
        if alert == Some(Alert::End) {
            debug!("Standard timer reached zero");
            self.run_state = RunState::Stopped;
        }
        alert
    }
}
