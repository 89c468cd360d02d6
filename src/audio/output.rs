//! Audio output backends
//!
//! A backend opens the single process-wide output. The output itself lives on
//! the audio worker thread and never crosses threads, so it need not be `Send`.

use tracing::{debug, info};

use super::tone::ToneSpec;
use crate::error::AudioError;

/// An open audio output
pub trait AudioOutput {
    /// Make sure the output is allowed to produce sound
    fn resume(&mut self) -> Result<(), AudioError>;

    /// Start playing a tone without waiting for it to finish
    fn play(&mut self, spec: &ToneSpec) -> Result<(), AudioError>;
}

/// Factory for the audio output
pub trait AudioBackend: Send + 'static {
    fn name(&self) -> &'static str;

    fn open(&mut self) -> Result<Box<dyn AudioOutput>, AudioError>;
}

/// Backend that accepts every tone and plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentBackend;

struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn resume(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, spec: &ToneSpec) -> Result<(), AudioError> {
        debug!(
            "Silent output skipping {:?} tone at {} Hz",
            spec.waveform, spec.frequency_hz
        );
        Ok(())
    }
}

impl AudioBackend for SilentBackend {
    fn name(&self) -> &'static str {
        "silent"
    }

    fn open(&mut self) -> Result<Box<dyn AudioOutput>, AudioError> {
        Ok(Box::new(SilentOutput))
    }
}

/// Default host audio device via rodio
#[cfg(feature = "playback")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioBackend;

#[cfg(feature = "playback")]
struct RodioOutput {
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
}

#[cfg(feature = "playback")]
impl AudioOutput for RodioOutput {
    fn resume(&mut self) -> Result<(), AudioError> {
        // Probe the device by opening a sink; an output that refuses sinks is not usable yet
        rodio::Sink::try_new(&self.handle)
            .map(|_| ())
            .map_err(|e| AudioError::ResumeFailed(e.to_string()))
    }

    fn play(&mut self, spec: &ToneSpec) -> Result<(), AudioError> {
        let sink = rodio::Sink::try_new(&self.handle)
            .map_err(|e| AudioError::PlaybackFailed(e.to_string()))?;
        sink.append(super::tone::Tone::new(*spec));
        sink.detach();
        Ok(())
    }
}

#[cfg(feature = "playback")]
impl AudioBackend for RodioBackend {
    fn name(&self) -> &'static str {
        "rodio"
    }

    fn open(&mut self) -> Result<Box<dyn AudioOutput>, AudioError> {
        let (stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| AudioError::OutputUnavailable(e.to_string()))?;
        info!("Opened default audio output device");
        Ok(Box::new(RodioOutput {
            _stream: stream,
            handle,
        }))
    }
}

/// The backend to use when audio is not muted
pub fn default_backend() -> Box<dyn AudioBackend> {
    #[cfg(feature = "playback")]
    {
        Box::new(RodioBackend)
    }
    #[cfg(not(feature = "playback"))]
    {
        info!("Built without the playback feature, alert tones will not be played on this host");
        Box::new(SilentBackend)
    }
}
