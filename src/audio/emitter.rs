//! Fire-and-forget alert emitter
//!
//! A single worker thread owns the audio output. It opens the output lazily
//! on the first prime or alert, so only one output can ever exist, and it
//! swallows every failure after logging it.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::JoinHandle,
};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::{
    output::{AudioBackend, AudioOutput, SilentBackend},
    tone::ToneSpec,
};
use crate::{error::AudioError, timer::Alert};

#[derive(Debug)]
enum AudioCommand {
    Prime,
    Play(Alert),
    Shutdown,
}

/// Handle to the audio worker
#[derive(Debug)]
pub struct AudioEmitter {
    tx: UnboundedSender<AudioCommand>,
    unlocked: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AudioEmitter {
    /// Start the audio worker over the given backend
    pub fn spawn(backend: Box<dyn AudioBackend>) -> Self {
        let (tx, rx) = unbounded_channel();
        let unlocked = Arc::new(AtomicBool::new(false));
        let worker_unlocked = Arc::clone(&unlocked);
        let backend_name = backend.name();

        let worker = std::thread::Builder::new()
            .name("audio-emitter".to_string())
            .spawn(move || run_worker(backend, rx, worker_unlocked));

        let worker = match worker {
            Ok(handle) => {
                info!("Audio emitter started with {} backend", backend_name);
                Some(handle)
            }
            Err(e) => {
                warn!("Failed to start audio worker, alerts will be silent: {}", e);
                None
            }
        };

        Self {
            tx,
            unlocked,
            worker: Mutex::new(worker),
        }
    }

    /// An emitter that never produces sound
    pub fn muted() -> Self {
        Self::spawn(Box::new(SilentBackend))
    }

    /// Unlock audio output in response to a user interaction.
    ///
    /// After the first successful unlock this does nothing.
    pub fn prime(&self) {
        if self.is_unlocked() {
            return;
        }
        if let Err(e) = self.send(AudioCommand::Prime) {
            warn!("Audio prime dropped: {}", e);
        }
    }

    /// Queue an alert tone. Never blocks and never fails the caller.
    pub fn emit(&self, alert: Alert) {
        debug!("Emitting {} alert", alert.as_str());
        if let Err(e) = self.send(AudioCommand::Play(alert)) {
            warn!("Alert {} dropped: {}", alert.as_str(), e);
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::Acquire)
    }

    /// Stop the worker after it drains queued commands
    pub fn shutdown(&self) {
        if let Err(e) = self.send(AudioCommand::Shutdown) {
            debug!("Audio shutdown not delivered: {}", e);
        }
        let handle = match self.worker.lock() {
            Ok(mut worker) => worker.take(),
            Err(e) => {
                warn!("Failed to lock audio worker handle: {}", e);
                None
            }
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("Audio worker panicked");
            }
            info!("Audio emitter stopped");
        }
    }

    fn send(&self, command: AudioCommand) -> Result<(), AudioError> {
        self.tx.send(command).map_err(|_| AudioError::WorkerGone)
    }
}

fn run_worker(
    mut backend: Box<dyn AudioBackend>,
    mut rx: UnboundedReceiver<AudioCommand>,
    unlocked: Arc<AtomicBool>,
) {
    let mut output: Option<Box<dyn AudioOutput>> = None;

    while let Some(command) = rx.blocking_recv() {
        match command {
            AudioCommand::Prime => {
                if unlocked.load(Ordering::Acquire) {
                    continue;
                }
                match ensure_output(backend.as_mut(), &mut output) {
                    Ok(out) => unlock(out, &unlocked),
                    Err(e) => warn!("Audio prime failed: {}", e),
                }
            }
            AudioCommand::Play(alert) => {
                let out = match ensure_output(backend.as_mut(), &mut output) {
                    Ok(out) => out,
                    Err(e) => {
                        warn!("No audio output for {} alert: {}", alert.as_str(), e);
                        continue;
                    }
                };
                if !unlocked.load(Ordering::Acquire) {
                    // Try anyway; a locked output just stays silent
                    unlock(out, &unlocked);
                }
                if let Err(e) = out.play(&ToneSpec::for_alert(alert)) {
                    warn!("Failed to play {} alert: {}", alert.as_str(), e);
                }
            }
            AudioCommand::Shutdown => break,
        }
    }
    debug!("Audio worker exiting");
}

fn ensure_output<'a>(
    backend: &mut dyn AudioBackend,
    output: &'a mut Option<Box<dyn AudioOutput>>,
) -> Result<&'a mut Box<dyn AudioOutput>, AudioError> {
    if output.is_none() {
        *output = Some(backend.open()?);
        debug!("Audio output created by {} backend", backend.name());
    }
    output.as_mut().ok_or(AudioError::WorkerGone)
}

fn unlock(output: &mut Box<dyn AudioOutput>, unlocked: &AtomicBool) {
    match output.resume() {
        Ok(()) => {
            unlocked.store(true, Ordering::Release);
            info!("Audio output unlocked");
        }
        Err(e) => warn!("Audio resume failed, will retry on next alert: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Calls {
        opens: usize,
        resumes: usize,
        played: Vec<f32>,
    }

    /// Backend that records calls and can refuse the first few opens/resumes
    struct RecordingBackend {
        calls: Arc<Mutex<Calls>>,
        failing_opens: usize,
        failing_resumes: Arc<Mutex<usize>>,
    }

    struct RecordingOutput {
        calls: Arc<Mutex<Calls>>,
        failing_resumes: Arc<Mutex<usize>>,
    }

    impl AudioOutput for RecordingOutput {
        fn resume(&mut self) -> Result<(), AudioError> {
            self.calls.lock().unwrap().resumes += 1;
            let mut failing = self.failing_resumes.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(AudioError::ResumeFailed("not allowed yet".to_string()));
            }
            Ok(())
        }

        fn play(&mut self, spec: &ToneSpec) -> Result<(), AudioError> {
            self.calls.lock().unwrap().played.push(spec.frequency_hz);
            Ok(())
        }
    }

    impl AudioBackend for RecordingBackend {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn open(&mut self) -> Result<Box<dyn AudioOutput>, AudioError> {
            if self.failing_opens > 0 {
                self.failing_opens -= 1;
                return Err(AudioError::OutputUnavailable("no device".to_string()));
            }
            self.calls.lock().unwrap().opens += 1;
            Ok(Box::new(RecordingOutput {
                calls: Arc::clone(&self.calls),
                failing_resumes: Arc::clone(&self.failing_resumes),
            }))
        }
    }

    fn recording(
        failing_opens: usize,
        failing_resumes: usize,
    ) -> (AudioEmitter, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let backend = RecordingBackend {
            calls: Arc::clone(&calls),
            failing_opens,
            failing_resumes: Arc::new(Mutex::new(failing_resumes)),
        };
        (AudioEmitter::spawn(Box::new(backend)), calls)
    }

    #[test]
    fn output_is_created_once_and_lazily() {
        let (emitter, calls) = recording(0, 0);
        assert_eq!(calls.lock().unwrap().opens, 0);
        emitter.emit(Alert::Warning);
        emitter.emit(Alert::End);
        emitter.emit(Alert::Warning);
        emitter.shutdown();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.opens, 1);
        assert_eq!(calls.played, vec![880.0, 440.0, 880.0]);
    }

    #[test]
    fn prime_unlocks_once() {
        let (emitter, calls) = recording(0, 0);
        emitter.prime();
        emitter.shutdown();
        assert!(emitter.is_unlocked());
        assert_eq!(calls.lock().unwrap().resumes, 1);
        // Further primes are not even queued
        emitter.prime();
        emitter.emit(Alert::End);
        assert_eq!(calls.lock().unwrap().resumes, 1);
    }

    #[test]
    fn failed_resume_is_retried_by_the_next_alert() {
        let (emitter, calls) = recording(0, 1);
        emitter.prime();
        emitter.emit(Alert::Warning);
        emitter.shutdown();

        assert!(emitter.is_unlocked());
        let calls = calls.lock().unwrap();
        assert_eq!(calls.resumes, 2);
        assert_eq!(calls.played, vec![880.0]);
    }

    #[test]
    fn unavailable_output_is_swallowed_and_retried() {
        let (emitter, calls) = recording(1, 0);
        emitter.emit(Alert::Warning);
        emitter.emit(Alert::End);
        emitter.shutdown();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.opens, 1);
        assert_eq!(calls.played, vec![440.0]);
    }

    #[test]
    fn muted_emitter_accepts_alerts() {
        let emitter = AudioEmitter::muted();
        emitter.prime();
        emitter.emit(Alert::End);
        emitter.shutdown();
        assert!(emitter.is_unlocked());
    }
}
