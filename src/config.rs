//! Configuration and CLI argument handling

use clap::Parser;

use crate::{
    error::TimerError,
    state::TimerDefaults,
    timer::{DEFAULT_CHESS_MINUTES, DEFAULT_STANDARD_MINUTES},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "debate-timer")]
#[command(about = "Debate timing server: standard countdown, chess clock and round sequencing")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Standalone standard timer duration in minutes
    #[arg(long, default_value_t = DEFAULT_STANDARD_MINUTES)]
    pub standard_minutes: u32,

    /// Standalone chess timer duration per side in minutes
    #[arg(long, default_value_t = DEFAULT_CHESS_MINUTES)]
    pub chess_minutes: u32,

    /// Do not play alert tones on this host
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Reject durations the timers cannot start from
    pub fn validate(&self) -> Result<(), TimerError> {
        for minutes in [self.standard_minutes, self.chess_minutes] {
            if minutes == 0 {
                return Err(TimerError::InvalidMinutes(0));
            }
        }
        Ok(())
    }

    /// Standalone timer durations
    pub fn timer_defaults(&self) -> TimerDefaults {
        TimerDefaults {
            standard_minutes: self.standard_minutes,
            chess_minutes: self.chess_minutes,
        }
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
