use std::fmt;
use std::time::Duration;

/// A duration split into the fields shown on the clock face.
///
/// Hours are not shown; minutes wrap at 60.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTime {
    pub minutes: u64,
    pub seconds: u64,
    pub centiseconds: u64,
}

impl From<Duration> for DisplayTime {
    fn from(duration: Duration) -> Self {
        let millis = duration.as_millis() as u64;

        Self {
            minutes: (millis / 60_000) % 60,
            seconds: (millis / 1_000) % 60,
            centiseconds: (millis % 1_000) / 10,
        }
    }
}

/// Renders as `MM:SS,CC`.
impl fmt::Display for DisplayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02},{:02}",
            self.minutes, self.seconds, self.centiseconds
        )
    }
}

pub fn format_duration(duration: Duration) -> String {
    DisplayTime::from(duration).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn splits_fields() {
        let time = DisplayTime::from(Duration::from_millis(125_340));

        assert_eq!(
            time,
            DisplayTime {
                minutes: 2,
                seconds: 5,
                centiseconds: 34,
            }
        );
    }

    #[test_case(0, "00:00,00" ; "zero")]
    #[test_case(9, "00:00,00" ; "below a centisecond")]
    #[test_case(1_999, "00:01,99" ; "truncates centiseconds")]
    #[test_case(59_990, "00:59,99" ; "just under a minute")]
    #[test_case(125_340, "02:05,34" ; "minutes and seconds")]
    #[test_case(3_600_000, "00:00,00" ; "an hour wraps minutes")]
    #[test_case(3_723_450, "02:03,45" ; "hours are dropped")]
    #[test_case(6_000_000, "40:00,00" ; "minutes past the hour")]
    fn formats(millis: u64, expected: &str) {
        assert_eq!(format_duration(Duration::from_millis(millis)), expected);
    }
}
