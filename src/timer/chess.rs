//! Two-sided chess clock for free debate

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{countdown_step, Alert, Side};

/// Which clock, if any, is running.
///
/// `Paused` remembers the side that was running when the moderator paused,
/// which keeps "never started" and "paused mid-turn" apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "side", rename_all = "lowercase")]
pub enum ChessStatus {
    Unstarted,
    Running(Side),
    Paused(Side),
}

impl ChessStatus {
    pub fn active(self) -> Option<Side> {
        match self {
            ChessStatus::Running(side) => Some(side),
            _ => None,
        }
    }

    pub fn paused(self) -> Option<Side> {
        match self {
            ChessStatus::Paused(side) => Some(side),
            _ => None,
        }
    }
}

/// Two countdowns where only the running side's clock moves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessTimer {
    per_side_ms: u64,
    time_a_ms: u64,
    time_b_ms: u64,
    status: ChessStatus,
}

impl ChessTimer {
    pub fn new(per_side_ms: u64) -> Self {
        Self {
            per_side_ms,
            time_a_ms: per_side_ms,
            time_b_ms: per_side_ms,
            status: ChessStatus::Unstarted,
        }
    }

    pub fn per_side_ms(&self) -> u64 {
        self.per_side_ms
    }

    pub fn status(&self) -> ChessStatus {
        self.status
    }

    pub fn remaining_ms(&self, side: Side) -> u64 {
        match side {
            Side::A => self.time_a_ms,
            Side::B => self.time_b_ms,
        }
    }

    fn remaining_mut(&mut self, side: Side) -> &mut u64 {
        match side {
            Side::A => &mut self.time_a_ms,
            Side::B => &mut self.time_b_ms,
        }
    }

    /// A speaker's button.
    ///
    /// From `Unstarted` the named side starts. While running, only the
    /// running side may end its own turn; the other button does nothing.
    /// While paused, any tap resumes the remembered side.
    pub fn tap(&mut self, side: Side) -> ChessStatus {
        self.status = match self.status {
            ChessStatus::Unstarted => ChessStatus::Running(side),
            ChessStatus::Running(active) if active == side => ChessStatus::Running(side.other()),
            ChessStatus::Running(active) => ChessStatus::Running(active),
            ChessStatus::Paused(remembered) => ChessStatus::Running(remembered),
        };
        debug!("Chess tap {} -> {:?}", side, self.status);
        self.status
    }

    /// The moderator's pause/resume button
    pub fn global_pause(&mut self) -> ChessStatus {
        match self.status {
            ChessStatus::Running(_) => self.pause(),
            ChessStatus::Paused(_) => self.resume(),
            ChessStatus::Unstarted => self.status,
        }
    }

    /// Pause the running side. No effect unless a side is running.
    pub fn pause(&mut self) -> ChessStatus {
        if let ChessStatus::Running(active) = self.status {
            self.status = ChessStatus::Paused(active);
        }
        self.status
    }

    /// Resume the side that was running before the pause
    pub fn resume(&mut self) -> ChessStatus {
        if let ChessStatus::Paused(remembered) = self.status {
            self.status = ChessStatus::Running(remembered);
        }
        self.status
    }

    /// Back to unstarted with both clocks full
    pub fn reset(&mut self) {
        self.status = ChessStatus::Unstarted;
        self.time_a_ms = self.per_side_ms;
        self.time_b_ms = self.per_side_ms;
    }

    pub fn wants_ticks(&self) -> bool {
        self.status
            .active()
            .is_some_and(|side| self.remaining_ms(side) > 0)
    }

    /// Apply one tick to the running side.
    ///
    /// A side that reaches zero stays selected and frozen at zero; there is
    /// no automatic transition.
    pub fn tick(&mut self) -> Option<(Side, Alert)> {
        let side = self.status.active()?;
        let remaining = self.remaining_mut(side);
        if *remaining == 0 {
            return None;
        }
        let (next, alert) = countdown_step(*remaining);
        *remaining = next;
        alert.map(|alert| (side, alert))
    }
}
