//! Debate Timer - timing engine and HTTP server for debate sessions
//!
//! Provides a standard countdown, a two-sided chess clock for free debate and
//! a round sequencer that chains configured rounds into a session. A browser
//! view layer drives it over HTTP and follows it over Server-Sent Events.

pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod flow;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
