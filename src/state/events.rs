//! Events broadcast to connected display clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EngineSnapshot;
use crate::timer::{Alert, Side};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// Engine state after a command or tick
    Snapshot { snapshot: EngineSnapshot },
    /// An alert fired; clients may play their own tone
    Alert {
        alert: Alert,
        side: Option<Side>,
        timestamp: DateTime<Utc>,
    },
}

impl TimerEvent {
    pub fn alert(alert: Alert, side: Option<Side>) -> Self {
        TimerEvent::Alert {
            alert,
            side,
            timestamp: Utc::now(),
        }
    }

    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            TimerEvent::Snapshot { .. } => "snapshot",
            TimerEvent::Alert { .. } => "alert",
        }
    }
}
