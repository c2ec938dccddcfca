use crate::clock::Timestamp;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// The user-facing operations of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Start,
    Lap,
    Stop,
    Reset,
    Resume,
}

impl Action {
    /// The only phase this action may be taken from.
    pub fn valid_from(self) -> Phase {
        match self {
            Action::Start => Phase::Idle,
            Action::Lap | Action::Stop => Phase::Running,
            Action::Reset | Action::Resume => Phase::Stopped,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Start => "start",
            Action::Lap => "lap",
            Action::Stop => "stop",
            Action::Reset => "reset",
            Action::Resume => "resume",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action {0:?}")]
pub struct ParseActionError(String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => Ok(Action::Start),
            "lap" | "l" => Ok(Action::Lap),
            "stop" | "x" => Ok(Action::Stop),
            "reset" | "r" => Ok(Action::Reset),
            "resume" | "c" => Ok(Action::Resume),
            _ => Err(ParseActionError(s.to_string())),
        }
    }
}

/// An action was attempted from a phase that does not allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} while {phase}")]
pub struct InvalidTransition {
    pub action: Action,
    pub phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    anchor: Timestamp,
    now: Timestamp,
}

impl Segment {
    fn at(now: Timestamp) -> Self {
        Self { anchor: now, now }
    }

    fn elapsed(&self) -> Duration {
        self.now.saturating_duration_since(self.anchor)
    }
}

/// Lap bookkeeping for a single stopwatch.
///
/// Laps are kept newest first. While running, the lap at index 0 is still
/// accumulating and the time since its segment began is tracked separately
/// until the lap is closed by `lap` or `stop`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TimerSession {
    laps: VecDeque<Duration>,
    segment: Option<Segment>,
}

impl TimerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (&self.segment, self.laps.is_empty()) {
            (Some(_), _) => Phase::Running,
            (None, true) => Phase::Idle,
            (None, false) => Phase::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.segment.is_some()
    }

    pub fn anchor(&self) -> Option<Timestamp> {
        self.segment.map(|segment| segment.anchor)
    }

    pub fn now(&self) -> Option<Timestamp> {
        self.segment.map(|segment| segment.now)
    }

    /// Lap durations, newest first. Does not include the running segment.
    pub fn laps(&self) -> &VecDeque<Duration> {
        &self.laps
    }

    /// Time accumulated in the running segment since its anchor.
    pub fn current_segment(&self) -> Duration {
        self.segment
            .as_ref()
            .map(Segment::elapsed)
            .unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.laps.iter().sum::<Duration>() + self.current_segment()
    }

    pub fn start(&mut self, now: Timestamp) -> Result<(), InvalidTransition> {
        self.expect(Action::Start)?;

        self.laps.push_front(Duration::ZERO);
        self.segment = Some(Segment::at(now));

        Ok(())
    }

    pub fn lap(&mut self, now: Timestamp) -> Result<(), InvalidTransition> {
        self.expect(Action::Lap)?;

        self.close_segment();
        self.laps.push_front(Duration::ZERO);
        self.segment = Some(Segment::at(now));

        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), InvalidTransition> {
        self.expect(Action::Stop)?;

        self.close_segment();

        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), InvalidTransition> {
        self.expect(Action::Reset)?;

        self.laps.clear();
        self.segment = None;

        Ok(())
    }

    /// Continues accumulating into the most recent lap.
    pub fn resume(&mut self, now: Timestamp) -> Result<(), InvalidTransition> {
        self.expect(Action::Resume)?;

        self.segment = Some(Segment::at(now));

        Ok(())
    }

    /// Records a clock sample. Returns false when no segment is running.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        match self.segment.as_mut() {
            Some(segment) => {
                // Never let the sample fall behind the anchor.
                segment.now = now.max(segment.anchor);
                true
            }
            None => false,
        }
    }

    fn close_segment(&mut self) {
        if let Some(segment) = self.segment.take() {
            if let Some(current) = self.laps.front_mut() {
                *current += segment.elapsed();
            }
        }
    }

    fn expect(&self, action: Action) -> Result<(), InvalidTransition> {
        let phase = self.phase();
        if phase == action.valid_from() {
            Ok(())
        } else {
            Err(InvalidTransition { action, phase })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    fn laps(session: &TimerSession) -> Vec<u64> {
        session
            .laps()
            .iter()
            .map(|lap| lap.as_millis() as u64)
            .collect()
    }

    #[test]
    fn starts_idle() {
        let session = TimerSession::new();

        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.laps().is_empty());
        assert_eq!(session.total(), Duration::ZERO);
        assert_eq!(session.anchor(), None);
    }

    #[test]
    fn start_then_stop_records_an_empty_lap() {
        let mut session = TimerSession::new();

        session.start(at(42)).unwrap();
        session.stop().unwrap();

        assert_eq!(session.phase(), Phase::Stopped);
        assert_eq!(laps(&session), vec![0]);
    }

    #[test]
    fn lap_scenario() {
        let mut session = TimerSession::new();

        session.start(at(0)).unwrap();
        session.tick(at(1_000));
        session.lap(at(1_000)).unwrap();
        assert_eq!(laps(&session), vec![0, 1_000]);

        session.tick(at(1_500));
        session.lap(at(1_500)).unwrap();
        assert_eq!(laps(&session), vec![0, 500, 1_000]);

        session.tick(at(1_700));
        session.stop().unwrap();
        assert_eq!(laps(&session), vec![200, 500, 1_000]);
        assert_eq!(session.total(), Duration::from_millis(1_700));
    }

    #[test]
    fn closing_a_lap_uses_the_last_sample() {
        let mut session = TimerSession::new();

        session.start(at(0)).unwrap();
        session.tick(at(900));
        session.lap(at(950)).unwrap();

        assert_eq!(laps(&session), vec![0, 900]);
        assert_eq!(session.anchor(), Some(at(950)));
        assert_eq!(session.now(), Some(at(950)));
    }

    #[test]
    fn total_includes_running_segment() {
        let mut session = TimerSession::new();

        session.start(at(100)).unwrap();
        session.tick(at(400));
        session.lap(at(400)).unwrap();
        session.tick(at(650));

        assert_eq!(session.current_segment(), Duration::from_millis(250));
        assert_eq!(session.total(), Duration::from_millis(550));
    }

    #[test]
    fn resume_extends_the_latest_lap() {
        let mut session = TimerSession::new();

        session.start(at(0)).unwrap();
        session.tick(at(300));
        session.stop().unwrap();

        session.resume(at(10_000)).unwrap();
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.total(), Duration::from_millis(300));

        session.tick(at(10_200));
        session.stop().unwrap();
        assert_eq!(laps(&session), vec![500]);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = TimerSession::new();

        session.start(at(0)).unwrap();
        session.tick(at(10));
        session.stop().unwrap();
        session.reset().unwrap();

        assert_eq!(session, TimerSession::new());
    }

    #[test]
    fn tick_is_ignored_unless_running() {
        let mut session = TimerSession::new();
        assert!(!session.tick(at(5)));

        session.start(at(10)).unwrap();
        assert!(session.tick(at(20)));
        session.stop().unwrap();

        assert!(!session.tick(at(500)));
        assert_eq!(session.total(), Duration::from_millis(10));
    }

    #[test]
    fn tick_never_goes_behind_the_anchor() {
        let mut session = TimerSession::new();

        session.start(at(1_000)).unwrap();
        session.tick(at(400));

        assert_eq!(session.now(), Some(at(1_000)));
        assert_eq!(session.current_segment(), Duration::ZERO);
    }

    #[test]
    fn only_lap_and_reset_change_the_lap_count() {
        let mut session = TimerSession::new();

        session.start(at(0)).unwrap();
        assert_eq!(session.laps().len(), 1);
        session.lap(at(10)).unwrap();
        assert_eq!(session.laps().len(), 2);
        session.stop().unwrap();
        assert_eq!(session.laps().len(), 2);
        session.resume(at(20)).unwrap();
        assert_eq!(session.laps().len(), 2);
        session.stop().unwrap();
        assert_eq!(session.laps().len(), 2);
        session.reset().unwrap();
        assert_eq!(session.laps().len(), 0);
    }

    #[test_case(Action::Lap, Phase::Idle ; "lap while idle")]
    #[test_case(Action::Stop, Phase::Idle ; "stop while idle")]
    #[test_case(Action::Reset, Phase::Idle ; "reset while idle")]
    #[test_case(Action::Resume, Phase::Idle ; "resume while idle")]
    #[test_case(Action::Start, Phase::Running ; "start while running")]
    #[test_case(Action::Reset, Phase::Running ; "reset while running")]
    #[test_case(Action::Resume, Phase::Running ; "resume while running")]
    #[test_case(Action::Start, Phase::Stopped ; "start while stopped")]
    #[test_case(Action::Lap, Phase::Stopped ; "lap while stopped")]
    #[test_case(Action::Stop, Phase::Stopped ; "stop while stopped")]
    fn invalid_transitions_are_rejected(action: Action, phase: Phase) {
        let mut session = TimerSession::new();
        match phase {
            Phase::Idle => {}
            Phase::Running => session.start(at(0)).unwrap(),
            Phase::Stopped => {
                session.start(at(0)).unwrap();
                session.tick(at(70));
                session.stop().unwrap();
            }
        }
        let before = session.clone();

        let result = match action {
            Action::Start => session.start(at(99)),
            Action::Lap => session.lap(at(99)),
            Action::Stop => session.stop(),
            Action::Reset => session.reset(),
            Action::Resume => session.resume(at(99)),
        };

        assert_eq!(result, Err(InvalidTransition { action, phase }));
        assert_eq!(session, before);
    }

    #[test]
    fn invalid_transition_message() {
        let err = InvalidTransition {
            action: Action::Reset,
            phase: Phase::Running,
        };
        assert_eq!(err.to_string(), "cannot reset while running");
    }

    #[test_case("start", Action::Start)]
    #[test_case(" L ", Action::Lap)]
    #[test_case("x", Action::Stop)]
    #[test_case("Reset", Action::Reset)]
    #[test_case("c", Action::Resume)]
    fn parses_actions(input: &str, expected: Action) {
        assert_eq!(input.parse::<Action>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_actions() {
        assert!("pause".parse::<Action>().is_err());
    }
}
