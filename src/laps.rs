use crate::session::TimerSession;
use serde::Serialize;
use std::time::Duration;

/// Fewest completed laps needed before any lap is highlighted.
pub const MIN_CLASSIFIED_LAPS: usize = 2;

/// The fastest and slowest completed lap values.
///
/// Only laps after the most recent one are considered, even once the session
/// has stopped and the most recent lap is final. Matching is by value, so
/// every lap equal to the extreme is marked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    bounds: Option<(Duration, Duration)>,
}

impl Classification {
    /// Classifies laps given newest first.
    pub fn of<'a, I>(laps: I) -> Self
    where
        I: IntoIterator<Item = &'a Duration>,
    {
        let completed: Vec<Duration> = laps.into_iter().skip(1).copied().collect();
        if completed.len() < MIN_CLASSIFIED_LAPS {
            return Self::default();
        }

        let bounds = completed
            .iter()
            .fold(None, |bounds: Option<(Duration, Duration)>, &lap| match bounds {
                None => Some((lap, lap)),
                Some((min, max)) => Some((min.min(lap), max.max(lap))),
            });

        Self { bounds }
    }

    pub fn fastest(&self) -> Option<Duration> {
        self.bounds.map(|(min, _)| min)
    }

    pub fn slowest(&self) -> Option<Duration> {
        self.bounds.map(|(_, max)| max)
    }

    pub fn is_fastest(&self, lap: Duration) -> bool {
        self.fastest() == Some(lap)
    }

    pub fn is_slowest(&self, lap: Duration) -> bool {
        self.slowest() == Some(lap)
    }
}

/// One line of the lap table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LapRow {
    /// Chronological lap number, starting at 1.
    pub number: usize,
    #[serde(rename = "interval_ms", serialize_with = "crate::snapshot::as_millis")]
    pub interval: Duration,
    pub fastest: bool,
    pub slowest: bool,
}

/// Builds the lap table, newest lap first.
///
/// The newest row shows its lap plus the running segment so it keeps counting
/// while the clock runs. It is never highlighted.
pub fn rows(session: &TimerSession) -> Vec<LapRow> {
    let laps = session.laps();
    let classification = Classification::of(laps);

    laps.iter()
        .enumerate()
        .map(|(index, &lap)| {
            let completed = index > 0;
            LapRow {
                number: laps.len() - index,
                interval: if completed {
                    lap
                } else {
                    lap + session.current_segment()
                },
                fastest: completed && classification.is_fastest(lap),
                slowest: completed && classification.is_slowest(lap),
            }
        })
        .collect()
}
