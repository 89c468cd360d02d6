//! Session controller
//!
//! Owns the round list and the single live timer. A new timer is built on
//! every mode change and every round change; nothing carries over.

use tracing::{debug, info};

use super::{
    snapshot::{EngineSnapshot, RoundInfo, SessionMode, TimerSnapshot},
    Command, TimerMode,
};
use crate::{
    error::EngineError,
    flow::{standard_template, Round, RoundKind, RoundSequencer},
    timer::{
        minutes_to_ms, Alert, ChessTimer, Side, StandardTimer, TimerKind,
        DEFAULT_CHESS_MINUTES, DEFAULT_STANDARD_MINUTES,
    },
};

/// Durations used for timers outside a round session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDefaults {
    pub standard_minutes: u32,
    pub chess_minutes: u32,
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            standard_minutes: DEFAULT_STANDARD_MINUTES,
            chess_minutes: DEFAULT_CHESS_MINUTES,
        }
    }
}

/// The live timer machine
#[derive(Debug, Clone, PartialEq)]
pub enum LiveTimer {
    Standard(StandardTimer),
    Chess(ChessTimer),
}

impl LiveTimer {
    pub fn kind(&self) -> TimerKind {
        match self {
            LiveTimer::Standard(_) => TimerKind::Standard,
            LiveTimer::Chess(_) => TimerKind::Chess,
        }
    }

    pub fn wants_ticks(&self) -> bool {
        match self {
            LiveTimer::Standard(timer) => timer.wants_ticks(),
            LiveTimer::Chess(timer) => timer.wants_ticks(),
        }
    }
}

/// An alert produced by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredAlert {
    pub alert: Alert,
    /// Chess side whose clock crossed the threshold
    pub side: Option<Side>,
}

#[derive(Debug)]
pub struct Engine {
    sequencer: RoundSequencer,
    mode: TimerMode,
    defaults: TimerDefaults,
    live: LiveTimer,
    /// Round the live timer was built from, if sequenced
    live_round: Option<Round>,
    /// Bumped every time the live timer is replaced
    generation: u64,
}

impl Engine {
    pub fn new(defaults: TimerDefaults) -> Self {
        Self {
            sequencer: RoundSequencer::new(),
            mode: TimerMode::Standard,
            defaults,
            live: standalone_timer(TimerMode::Standard, defaults),
            live_round: None,
            generation: 0,
        }
    }

    pub fn sequencer(&self) -> &RoundSequencer {
        &self.sequencer
    }

    pub fn live(&self) -> &LiveTimer {
        &self.live
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_sequenced(&self) -> bool {
        self.live_round.is_some()
    }

    pub fn wants_ticks(&self) -> bool {
        self.live.wants_ticks()
    }

    /// Apply one user action
    pub fn apply(&mut self, command: Command) -> Result<(), EngineError> {
        debug!("Applying command {}", command.name());
        match command {
            Command::SelectMode(mode) => {
                if self.sequencer.is_session_active() {
                    return Err(EngineError::SessionActive);
                }
                self.mode = mode;
                self.replace_live(standalone_timer(mode, self.defaults), None);
                info!("Standalone timer mode set to {:?}", mode);
            }
            Command::StandardToggle => {
                let state = self.standard_mut()?.toggle();
                info!("Standard timer {:?}", state);
            }
            Command::StandardReset => self.standard_mut()?.reset(),
            Command::StandardSetDuration(minutes) => {
                self.standard_mut()?.set_duration_minutes(minutes)?;
                info!("Standard timer duration set to {} minutes", minutes);
            }
            Command::ChessTap(side) => {
                self.chess_mut()?.tap(side);
            }
            Command::ChessPause => {
                let status = self.chess_mut()?.global_pause();
                info!("Chess timer {:?}", status);
            }
            Command::ChessReset => self.chess_mut()?.reset(),
            Command::AppendRound(round) => self.sequencer.append(round)?,
            Command::RemoveRound(id) => {
                self.sequencer.remove(&id)?;
                self.sync_with_sequence();
            }
            Command::MoveRound(id, direction) => {
                self.sequencer.move_round(&id, direction)?;
                self.sync_with_sequence();
            }
            Command::ReplaceRounds(rounds) => {
                self.sequencer.replace(rounds)?;
                self.sync_with_sequence();
            }
            Command::LoadTemplate => {
                self.sequencer.replace(standard_template())?;
                self.sync_with_sequence();
            }
            Command::StartSession => {
                let round = self.sequencer.start()?.clone();
                self.enter_round(round);
            }
            Command::NextRound => {
                if self.sequencer.advance() {
                    self.sync_with_sequence();
                }
            }
            Command::PreviousRound => {
                if self.sequencer.retreat() {
                    self.sync_with_sequence();
                }
            }
        }
        Ok(())
    }

    /// Advance the live timer by one tick
    pub fn tick(&mut self) -> Option<FiredAlert> {
        match &mut self.live {
            LiveTimer::Standard(timer) => {
                timer.tick().map(|alert| FiredAlert { alert, side: None })
            }
            LiveTimer::Chess(timer) => timer.tick().map(|(side, alert)| FiredAlert {
                alert,
                side: Some(side),
            }),
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let round = match (self.sequencer.current_index(), self.live_round.as_ref()) {
            (Some(index), Some(round)) => Some(RoundInfo::new(index, self.sequencer.len(), round)),
            _ => None,
        };
        let timer = match &self.live {
            LiveTimer::Standard(timer) => {
                TimerSnapshot::standard(timer, self.live_round.as_ref().and_then(|r| r.speaker))
            }
            LiveTimer::Chess(timer) => TimerSnapshot::chess(timer),
        };
        EngineSnapshot {
            mode: if self.is_sequenced() {
                SessionMode::Sequenced
            } else {
                SessionMode::Standalone
            },
            standalone_mode: self.mode,
            round,
            timer,
        }
    }

    fn standard_mut(&mut self) -> Result<&mut StandardTimer, EngineError> {
        match &mut self.live {
            LiveTimer::Standard(timer) => Ok(timer),
            other => Err(EngineError::WrongTimer {
                expected: TimerKind::Standard,
                actual: other.kind(),
            }),
        }
    }

    fn chess_mut(&mut self) -> Result<&mut ChessTimer, EngineError> {
        match &mut self.live {
            LiveTimer::Chess(timer) => Ok(timer),
            other => Err(EngineError::WrongTimer {
                expected: TimerKind::Chess,
                actual: other.kind(),
            }),
        }
    }

    /// Rebuild the live timer if the active round is no longer the one it was built from
    fn sync_with_sequence(&mut self) {
        match self.sequencer.current().cloned() {
            Some(round) if self.live_round.as_ref() != Some(&round) => self.enter_round(round),
            Some(_) => {}
            None if self.live_round.is_some() => {
                info!("Round session ended, returning to standalone {:?} timer", self.mode);
                self.replace_live(standalone_timer(self.mode, self.defaults), None);
            }
            None => {}
        }
    }

    fn enter_round(&mut self, round: Round) {
        info!(
            "Entering round {} '{}' ({:?}, {} min)",
            round.id, round.title, round.kind, round.duration_minutes
        );
        let timer = match round.kind {
            RoundKind::Normal => LiveTimer::Standard(StandardTimer::for_round(round.duration_ms())),
            RoundKind::Chess => LiveTimer::Chess(ChessTimer::new(round.duration_ms())),
        };
        self.replace_live(timer, Some(round));
    }

    fn replace_live(&mut self, timer: LiveTimer, round: Option<Round>) {
        self.live = timer;
        self.live_round = round;
        self.generation += 1;
    }
}

fn standalone_timer(mode: TimerMode, defaults: TimerDefaults) -> LiveTimer {
    match mode {
        TimerMode::Standard => {
            LiveTimer::Standard(StandardTimer::standalone(minutes_to_ms(defaults.standard_minutes)))
        }
        TimerMode::Chess => {
            LiveTimer::Chess(ChessTimer::new(minutes_to_ms(defaults.chess_minutes)))
        }
    }
}
