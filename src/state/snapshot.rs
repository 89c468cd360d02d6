//! Serializable views of the engine for the display layer

use serde::{Deserialize, Serialize};

use super::TimerMode;
use crate::{
    flow::{Round, RoundKind},
    timer::{
        format_clock, is_low_time_chess, is_low_time_standard, ChessStatus, ChessTimer, RunState,
        Side, StandardTimer,
    },
};

/// Whether the live timer belongs to a round session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Standalone,
    Sequenced,
}

/// The active round of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundInfo {
    pub index: usize,
    pub count: usize,
    pub id: String,
    pub title: String,
    pub kind: RoundKind,
    pub has_previous: bool,
    pub has_next: bool,
}

impl RoundInfo {
    pub fn new(index: usize, count: usize, round: &Round) -> Self {
        Self {
            index,
            count,
            id: round.id.clone(),
            title: round.title.clone(),
            kind: round.kind,
            has_previous: index > 0,
            has_next: index + 1 < count,
        }
    }
}

/// One chess clock as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockFace {
    pub remaining_ms: u64,
    pub display: String,
    pub low_time: bool,
    pub active: bool,
}

/// Display state of the live timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TimerSnapshot {
    Standard {
        run_state: RunState,
        duration_ms: u64,
        remaining_ms: u64,
        display: String,
        low_time: bool,
        speaker: Option<Side>,
        duration_adjustable: bool,
    },
    Chess {
        status: ChessStatus,
        per_side_ms: u64,
        side_a: ClockFace,
        side_b: ClockFace,
    },
}

impl TimerSnapshot {
    pub fn standard(timer: &StandardTimer, speaker: Option<Side>) -> Self {
        TimerSnapshot::Standard {
            run_state: timer.run_state(),
            duration_ms: timer.duration_ms(),
            remaining_ms: timer.remaining_ms(),
            display: format_clock(timer.remaining_ms()),
            low_time: is_low_time_standard(timer.remaining_ms()),
            speaker,
            duration_adjustable: timer.is_adjustable(),
        }
    }

    pub fn chess(timer: &ChessTimer) -> Self {
        let face = |side: Side| {
            let remaining_ms = timer.remaining_ms(side);
            ClockFace {
                remaining_ms,
                display: format_clock(remaining_ms),
                low_time: is_low_time_chess(remaining_ms),
                active: timer.status().active() == Some(side),
            }
        };
        TimerSnapshot::Chess {
            status: timer.status(),
            per_side_ms: timer.per_side_ms(),
            side_a: face(Side::A),
            side_b: face(Side::B),
        }
    }
}

/// Everything the view layer needs to render the timer screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub mode: SessionMode,
    pub standalone_mode: TimerMode,
    pub round: Option<RoundInfo>,
    pub timer: TimerSnapshot,
}
