//! State management module
//!
//! The engine, the commands it accepts, the snapshots it produces and the
//! shared application state that wires it to the tick source and audio.

pub mod app_state;
pub mod command;
pub mod engine;
pub mod events;
pub mod snapshot;

// Re-export main types
pub use app_state::AppState;
pub use command::{Command, TimerMode};
pub use engine::{Engine, FiredAlert, LiveTimer, TimerDefaults};
pub use events::TimerEvent;
pub use snapshot::{ClockFace, EngineSnapshot, RoundInfo, SessionMode, TimerSnapshot};
