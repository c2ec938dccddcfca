//! A stopwatch with lap times.
//!
//! [`session::TimerSession`] holds the lap bookkeeping, [`stopwatch::Stopwatch`]
//! drives it from a [`clock::Clock`] and a [`schedule::Scheduler`], and
//! presentations read [`snapshot::Snapshot`]s through a [`stopwatch::Observer`].

pub mod clock;
pub mod controls;
pub mod format;
pub mod laps;
pub mod schedule;
pub mod session;
pub mod snapshot;
pub mod stopwatch;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use controls::Controls;
pub use session::{Action, InvalidTransition, Phase, TimerSession};
pub use snapshot::Snapshot;
pub use stopwatch::{Observer, Stopwatch};
