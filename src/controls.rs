use crate::session::{Action, Phase};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub foreground: &'static str,
    pub background: &'static str,
}

const NEUTRAL: Palette = Palette {
    foreground: "#FFFFFF",
    background: "#3D3D3D",
};
const INACTIVE: Palette = Palette {
    foreground: "#8B8B90",
    background: "#151515",
};
const GO: Palette = Palette {
    foreground: "#50D167",
    background: "#1B361F",
};
const HALT: Palette = Palette {
    foreground: "#E33935",
    background: "#3C1715",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Button {
    pub title: &'static str,
    pub action: Action,
    pub enabled: bool,
    pub palette: Palette,
}

impl Button {
    const fn new(title: &'static str, action: Action, palette: Palette) -> Self {
        Self {
            title,
            action,
            enabled: true,
            palette,
        }
    }

    const fn disabled(title: &'static str, action: Action) -> Self {
        Self {
            title,
            action,
            enabled: false,
            palette: INACTIVE,
        }
    }
}

/// The pair of buttons shown under the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub left: Button,
    pub right: Button,
}

impl Controls {
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Idle => Self {
                left: Button::disabled("Lap", Action::Lap),
                right: Button::new("Start", Action::Start, GO),
            },
            Phase::Running => Self {
                left: Button::new("Lap", Action::Lap, NEUTRAL),
                right: Button::new("Stop", Action::Stop, HALT),
            },
            Phase::Stopped => Self {
                left: Button::new("Reset", Action::Reset, NEUTRAL),
                right: Button::new("Start", Action::Resume, GO),
            },
        }
    }

    pub fn buttons(&self) -> [Button; 2] {
        [self.left, self.right]
    }

    /// Whether an enabled button in this row triggers `action`.
    pub fn permits(&self, action: Action) -> bool {
        self.buttons()
            .iter()
            .any(|button| button.enabled && button.action == action)
    }
}
