//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info};

use super::{Command, Engine, EngineSnapshot, TimerDefaults, TimerEvent};
use crate::{audio::AudioEmitter, error::EngineError, tasks::TickSource};

/// Engine plus its tick source, guarded together so a tick and a user
/// action can never interleave
#[derive(Debug)]
struct Runtime {
    engine: Engine,
    ticks: TickSource,
}

/// Shared state behind every request handler and the tick task
#[derive(Debug)]
pub struct AppState {
    runtime: Mutex<Runtime>,
    /// Alert tone output
    pub audio: AudioEmitter,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Alert notifications for display clients
    pub event_tx: broadcast::Sender<TimerEvent>,
    /// Latest engine snapshot
    pub snapshot_tx: watch::Sender<EngineSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<EngineSnapshot>,
}

impl AppState {
    pub fn new(port: u16, host: String, defaults: TimerDefaults, audio: AudioEmitter) -> Self {
        let engine = Engine::new(defaults);
        let (event_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        Self {
            runtime: Mutex::new(Runtime {
                engine,
                ticks: TickSource::new(),
            }),
            audio,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            event_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    fn lock_runtime(&self) -> Result<MutexGuard<'_, Runtime>, EngineError> {
        self.runtime
            .lock()
            .map_err(|e| EngineError::Poisoned(format!("Failed to lock engine: {}", e)))
    }

    /// Apply a user action and bring the tick source in line with the result
    pub fn dispatch(self: &Arc<Self>, command: Command) -> Result<EngineSnapshot, EngineError> {
        let action = command.name();
        let snapshot = {
            let mut runtime = self.lock_runtime()?;
            let result = runtime.engine.apply(command);
            self.reconcile_ticks(&mut runtime);
            result?;
            runtime.engine.snapshot()
        };

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    /// Keep the armed ticker while it still serves the live timer, so an
    /// unrelated command never shifts the tick phase
    fn reconcile_ticks(self: &Arc<Self>, runtime: &mut Runtime) {
        let generation = runtime.engine.generation();
        if runtime.engine.wants_ticks() {
            if runtime.ticks.armed_generation() != Some(generation) {
                runtime.ticks.arm(self, generation);
            }
        } else if runtime.ticks.is_armed() {
            runtime.ticks.cancel();
        }
    }

    /// Apply one tick on behalf of tick source `epoch`.
    ///
    /// Returns false once that source should stop.
    pub fn tick(&self, epoch: u64) -> bool {
        let (fired, snapshot, keep_ticking) = {
            let mut runtime = match self.runtime.lock() {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to lock engine for tick: {}", e);
                    return false;
                }
            };
            if !runtime.ticks.is_current(epoch) {
                return false;
            }
            let fired = runtime.engine.tick();
            let keep_ticking = runtime.engine.wants_ticks();
            if !keep_ticking {
                runtime.ticks.release(epoch);
            }
            (fired, runtime.engine.snapshot(), keep_ticking)
        };

        if let Some(fired) = fired {
            info!("Alert fired: {} (side {:?})", fired.alert.as_str(), fired.side);
            self.audio.emit(fired.alert);
            if self.event_tx.send(TimerEvent::alert(fired.alert, fired.side)).is_err() {
                debug!("No display clients for alert");
            }
        }
        self.publish(snapshot);
        keep_ticking
    }

    fn publish(&self, snapshot: EngineSnapshot) {
        self.snapshot_tx.send_replace(snapshot);
    }

    /// Current engine snapshot
    pub fn snapshot(&self) -> Result<EngineSnapshot, EngineError> {
        Ok(self.lock_runtime()?.engine.snapshot())
    }

    /// Read-only access to the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&Engine) -> R) -> Result<R, EngineError> {
        Ok(f(&self.lock_runtime()?.engine))
    }

    /// Whether a tick source is currently armed
    pub fn is_ticking(&self) -> bool {
        self.lock_runtime()
            .map(|runtime| runtime.ticks.is_armed())
            .unwrap_or(false)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Stop ticking and release the audio output
    pub fn shutdown(&self) {
        match self.runtime.lock() {
            Ok(mut runtime) => runtime.ticks.cancel(),
            Err(e) => error!("Failed to lock engine during shutdown: {}", e),
        }
        self.audio.shutdown();
    }
}
