//! Alert audio
//!
//! Best-effort only: audio failures are logged and never reach the timers.

pub mod emitter;
pub mod output;
pub mod tone;

pub use emitter::AudioEmitter;
pub use output::{default_backend, AudioBackend, AudioOutput, SilentBackend};
pub use tone::{Tone, ToneSpec, Waveform};
