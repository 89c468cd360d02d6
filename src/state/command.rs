//! Discrete user actions accepted by the engine

use serde::{Deserialize, Serialize};

use crate::{
    flow::{Direction, Round},
    timer::Side,
};

/// Standalone timer selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Standard,
    Chess,
}

/// One user action. Each is applied atomically before the next tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectMode(TimerMode),
    StandardToggle,
    StandardReset,
    StandardSetDuration(i64),
    ChessTap(Side),
    ChessPause,
    ChessReset,
    AppendRound(Round),
    RemoveRound(String),
    MoveRound(String, Direction),
    ReplaceRounds(Vec<Round>),
    LoadTemplate,
    StartSession,
    NextRound,
    PreviousRound,
}

impl Command {
    /// Short name recorded as the last action
    pub fn name(&self) -> &'static str {
        match self {
            Command::SelectMode(_) => "select-mode",
            Command::StandardToggle => "standard-toggle",
            Command::StandardReset => "standard-reset",
            Command::StandardSetDuration(_) => "standard-duration",
            Command::ChessTap(_) => "chess-tap",
            Command::ChessPause => "chess-pause",
            Command::ChessReset => "chess-reset",
            Command::AppendRound(_) => "round-append",
            Command::RemoveRound(_) => "round-remove",
            Command::MoveRound(..) => "round-move",
            Command::ReplaceRounds(_) => "round-replace",
            Command::LoadTemplate => "round-template",
            Command::StartSession => "flow-start",
            Command::NextRound => "flow-next",
            Command::PreviousRound => "flow-prev",
        }
    }
}
