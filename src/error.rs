//! Domain error types
//!
//! Configuration-boundary and engine errors are surfaced to the caller.
//! Audio errors never leave the audio worker; they are logged and dropped.

use thiserror::Error;

use crate::timer::TimerKind;

/// Errors raised while editing or driving the round sequence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Invalid round config: {0}")]
    InvalidRound(String),

    #[error("Round id already in use: {0}")]
    DuplicateRound(String),

    #[error("Unknown round: {0}")]
    UnknownRound(String),

    #[error("The round sequence is empty")]
    EmptySequence,
}

/// Errors raised by a single timer machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Duration must be a positive number of minutes, got {0}")]
    InvalidMinutes(i64),

    #[error("Duration is fixed by the current round")]
    DurationLocked,
}

/// Errors returned by the engine for a rejected command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error("The live timer is a {actual} timer, not a {expected} timer")]
    WrongTimer { expected: TimerKind, actual: TimerKind },

    #[error("Timer mode cannot be changed while a round session is running")]
    SessionActive,

    #[error("Engine state is unavailable: {0}")]
    Poisoned(String),
}

/// Audio output failures, logged by the audio worker and never propagated
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio output is unavailable: {0}")]
    OutputUnavailable(String),

    #[error("Audio output could not be resumed: {0}")]
    ResumeFailed(String),

    #[error("Tone playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Audio worker is not running")]
    WorkerGone,
}
