//! Round sequencing
//!
//! Rounds chain configured timers into a session. The sequencer only tracks
//! order and the active index; the engine builds a fresh timer whenever the
//! active round changes.

pub mod round;
pub mod sequencer;

pub use round::{standard_template, Round, RoundConfig, RoundKind};
pub use sequencer::{Direction, RoundSequencer};
