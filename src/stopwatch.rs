use crate::clock::Clock;
use crate::schedule::Scheduler;
use crate::session::{Action, InvalidTransition, TimerSession};
use crate::snapshot::Snapshot;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// How often the clock is sampled while running.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Receives a fresh snapshot after every change to the session.
pub trait Observer {
    fn on_transition(&self, action: Action, snapshot: &Snapshot);

    fn on_tick(&self, _snapshot: &Snapshot) {}
}

/// Wires a [`TimerSession`] to a clock and a tick scheduler.
///
/// The tick subscription is held here rather than in the session; it is
/// cancelled on `stop` and when the stopwatch is dropped.
pub struct Stopwatch<S: Scheduler> {
    session: Rc<RefCell<TimerSession>>,
    clock: Rc<dyn Clock>,
    scheduler: S,
    subscription: Option<S::Subscription>,
    tick: Duration,
    observer: Option<Rc<dyn Observer>>,
}

impl<S: Scheduler> Stopwatch<S> {
    pub fn new(clock: Rc<dyn Clock>, scheduler: S) -> Self {
        Self {
            session: Rc::new(RefCell::new(TimerSession::new())),
            clock,
            scheduler,
            subscription: None,
            tick: DEFAULT_TICK,
            observer: None,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_observer(mut self, observer: Rc<dyn Observer>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.session.borrow())
    }

    pub fn session(&self) -> TimerSession {
        self.session.borrow().clone()
    }

    pub fn is_ticking(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn press(&mut self, action: Action) -> Result<(), InvalidTransition> {
        match action {
            Action::Start => self.start(),
            Action::Lap => self.lap(),
            Action::Stop => self.stop(),
            Action::Reset => self.reset(),
            Action::Resume => self.resume(),
        }
    }

    pub fn start(&mut self) -> Result<(), InvalidTransition> {
        let now = self.clock.now();
        self.session.borrow_mut().start(now)?;
        self.subscribe();

        tracing::debug!(%now, "Started");
        self.notify(Action::Start);
        Ok(())
    }

    pub fn lap(&mut self) -> Result<(), InvalidTransition> {
        let now = self.clock.now();
        self.session.borrow_mut().lap(now)?;

        tracing::debug!(%now, laps = self.session.borrow().laps().len(), "Recorded lap");
        self.notify(Action::Lap);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), InvalidTransition> {
        self.session.borrow_mut().stop()?;
        self.unsubscribe();

        tracing::debug!(total = ?self.session.borrow().total(), "Stopped");
        self.notify(Action::Stop);
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), InvalidTransition> {
        self.session.borrow_mut().reset()?;

        tracing::debug!("Reset");
        self.notify(Action::Reset);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), InvalidTransition> {
        let now = self.clock.now();
        self.session.borrow_mut().resume(now)?;
        self.subscribe();

        tracing::debug!(%now, "Resumed");
        self.notify(Action::Resume);
        Ok(())
    }

    fn subscribe(&mut self) {
        self.unsubscribe();

        let session = Rc::downgrade(&self.session);
        let clock = Rc::clone(&self.clock);
        let observer = self.observer.clone();

        let callback = Box::new(move || {
            let Some(session) = session.upgrade() else {
                return;
            };

            let snapshot = {
                let mut session = session.borrow_mut();
                let now = clock.now();
                if !session.tick(now) {
                    return;
                }
                tracing::trace!(%now, "Tick");
                Snapshot::capture(&session)
            };

            if let Some(observer) = &observer {
                observer.on_tick(&snapshot);
            }
        });

        self.subscription = Some(self.scheduler.schedule(self.tick, callback));
    }

    fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.scheduler.cancel(subscription);
        }
    }

    fn notify(&self, action: Action) {
        if let Some(observer) = &self.observer {
            observer.on_transition(action, &self.snapshot());
        }
    }
}

impl<S: Scheduler> Drop for Stopwatch<S> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
