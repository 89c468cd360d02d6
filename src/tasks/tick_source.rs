//! Periodic tick source driving the live timer

use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::{state::AppState, timer::TICK_MS};

/// Handle to the one tick task allowed to touch the live timer.
///
/// Lives under the same lock as the engine. A task only mutates the engine
/// while its epoch is the armed one, so a cancelled task can never tick.
#[derive(Debug, Default)]
pub struct TickSource {
    next_epoch: u64,
    armed: Option<ArmedTicker>,
}

#[derive(Debug)]
struct ArmedTicker {
    epoch: u64,
    /// Engine generation the ticker was started for
    generation: u64,
    handle: JoinHandle<()>,
}

impl TickSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Engine generation the current ticker serves
    pub fn armed_generation(&self) -> Option<u64> {
        self.armed.as_ref().map(|armed| armed.generation)
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.armed.as_ref().is_some_and(|armed| armed.epoch == epoch)
    }

    /// Start ticking for the given engine generation, cancelling any previous ticker
    pub fn arm(&mut self, state: &Arc<AppState>, generation: u64) {
        self.cancel();
        let epoch = self.next_epoch;
        self.next_epoch += 1;
        let handle = tokio::spawn(tick_source_task(Arc::clone(state), epoch));
        debug!("Tick source {} armed for timer generation {}", epoch, generation);
        self.armed = Some(ArmedTicker {
            epoch,
            generation,
            handle,
        });
    }

    /// Stop the current ticker. Takes effect before the caller releases the lock.
    pub fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.handle.abort();
            debug!("Tick source {} cancelled", armed.epoch);
        }
    }

    /// Forget the ticker whose task is exiting on its own
    pub fn release(&mut self, epoch: u64) {
        if self.is_current(epoch) {
            self.armed = None;
            debug!("Tick source {} released", epoch);
        }
    }
}

/// Tick the live timer every [`TICK_MS`] until it stops wanting ticks or this
/// source is superseded
pub async fn tick_source_task(state: Arc<AppState>, epoch: u64) {
    let period = Duration::from_millis(TICK_MS);
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if !state.tick(epoch) {
            break;
        }
    }
    debug!("Tick source {} finished", epoch);
}
