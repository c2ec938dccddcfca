use crate::controls::Controls;
use crate::format::DisplayTime;
use crate::laps::{self, LapRow};
use crate::session::{Phase, TimerSession};
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Everything a presentation needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub running: bool,
    #[serde(rename = "total_ms", serialize_with = "as_millis")]
    pub total: Duration,
    pub laps: Vec<LapRow>,
}

impl Snapshot {
    pub fn capture(session: &TimerSession) -> Self {
        Self {
            phase: session.phase(),
            running: session.is_running(),
            total: session.total(),
            laps: laps::rows(session),
        }
    }

    pub fn controls(&self) -> Controls {
        Controls::for_phase(self.phase)
    }

    pub fn display(&self) -> DisplayTime {
        DisplayTime::from(self.total)
    }
}

pub(crate) fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Timestamp;
    use pretty_assertions::assert_eq;

    #[test]
    fn idle_snapshot() {
        let snapshot = Snapshot::capture(&TimerSession::new());

        assert_eq!(snapshot.phase, Phase::Idle);
        assert!(!snapshot.running);
        assert!(snapshot.laps.is_empty());
        assert_eq!(snapshot.display().to_string(), "00:00,00");
        assert!(!snapshot.controls().left.enabled);
    }

    #[test]
    fn serializes_durations_as_millis() {
        let mut session = TimerSession::new();
        session.start(Timestamp::from_millis(0)).unwrap();
        session.tick(Timestamp::from_millis(1_234));
        session.stop().unwrap();

        let json = serde_json::to_value(Snapshot::capture(&session)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "phase": "stopped",
                "running": false,
                "total_ms": 1234,
                "laps": [
                    { "number": 1, "interval_ms": 1234, "fastest": false, "slowest": false }
                ]
            })
        );
    }
}
