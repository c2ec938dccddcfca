use crate::cli::Arguments;
use lapwatch::controls::Button;
use lapwatch::format::format_duration;
use lapwatch::laps::LapRow;
use lapwatch::schedule::Scheduler;
use lapwatch::{Action, Observer, Snapshot, Stopwatch, SystemClock};
use slint::{Color, Model, ModelRc, SharedString, VecModel, Weak};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

slint::slint! {
import { ListView } from "std-widgets.slint";

export struct LapEntry {
    label: string,
    time: string,
    fastest: bool,
    slowest: bool,
}

component RoundButton inherits Rectangle {
    in property <string> title;
    in property <color> foreground;
    in property <color> fill;
    in property <bool> enabled: true;

    callback clicked();

    width: 80px;
    height: 80px;
    border-radius: self.width / 2;
    background: root.fill;
    opacity: touch.pressed && root.enabled ? 0.7 : 1.0;

    Rectangle {
        width: root.width - 4px;
        height: root.height - 4px;
        border-radius: self.width / 2;
        border-width: 2px;
        border-color: #000000;
    }

    Text {
        width: root.width;
        height: root.height;
        text: root.title;
        color: root.foreground;
        font-size: 18px;
        horizontal-alignment: center;
        vertical-alignment: center;
    }

    touch := TouchArea {
        clicked => {
            if (root.enabled) {
                root.clicked();
            }
        }
    }
}

export component MainWindow inherits Window {
    in property <string> time: "00:00,00";
    in property <[LapEntry]> laps;

    in property <string> left-title;
    in property <color> left-foreground;
    in property <color> left-fill;
    in property <bool> left-enabled;
    in property <string> right-title;
    in property <color> right-foreground;
    in property <color> right-fill;
    in property <bool> right-enabled;

    callback left-clicked();
    callback right-clicked();

    preferred-width: 360px;
    preferred-height: 640px;
    title: "Lapwatch";
    background: #0D0D0D;

    VerticalLayout {
        padding: 20px;
        spacing: 24px;

        Text {
            text: root.time;
            color: #FFFFFF;
            font-size: 64px;
            horizontal-alignment: center;
        }

        HorizontalLayout {
            alignment: space-between;

            RoundButton {
                title: root.left-title;
                foreground: root.left-foreground;
                fill: root.left-fill;
                enabled: root.left-enabled;
                clicked => {
                    root.left-clicked();
                }
            }

            RoundButton {
                title: root.right-title;
                foreground: root.right-foreground;
                fill: root.right-fill;
                enabled: root.right-enabled;
                clicked => {
                    root.right-clicked();
                }
            }
        }

        ListView {
            for lap in root.laps: Rectangle {
                height: 40px;

                HorizontalLayout {
                    Text {
                        text: lap.label;
                        font-size: 18px;
                        color: lap.fastest ? #4BC05F : lap.slowest ? #CC3531 : #FFFFFF;
                        vertical-alignment: center;
                    }
                    Text {
                        text: lap.time;
                        font-size: 18px;
                        color: lap.fastest ? #4BC05F : lap.slowest ? #CC3531 : #FFFFFF;
                        horizontal-alignment: right;
                        vertical-alignment: center;
                    }
                }

                Rectangle {
                    y: parent.height - 1px;
                    height: 1px;
                    background: #151515;
                }
            }
        }
    }
}
}

/// Drives the tick from the slint event loop.
pub struct TimerScheduler;

impl Scheduler for TimerScheduler {
    type Subscription = slint::Timer;

    fn schedule(&self, period: Duration, mut callback: Box<dyn FnMut()>) -> slint::Timer {
        let timer = slint::Timer::default();
        timer.start(slint::TimerMode::Repeated, period, move || callback());
        timer
    }

    fn cancel(&self, timer: slint::Timer) {
        timer.stop();
    }
}

pub struct Window {
    main_window: MainWindow,
}

impl Window {
    pub fn new(arguments: &Arguments) -> anyhow::Result<Self> {
        let main_window = MainWindow::new()?;

        let stopwatch = Stopwatch::new(Rc::new(SystemClock), TimerScheduler)
            .with_tick(Duration::from_millis(arguments.tick_ms))
            .with_observer(Rc::new(WindowObserver(main_window.as_weak())));
        render(&main_window, &stopwatch.snapshot());

        let stopwatch = Rc::new(RefCell::new(stopwatch));
        let left = Rc::clone(&stopwatch);
        main_window.on_left_clicked(move || press(&left, |snapshot| snapshot.controls().left));
        let right = stopwatch;
        main_window.on_right_clicked(move || press(&right, |snapshot| snapshot.controls().right));

        Ok(Self { main_window })
    }

    pub fn run(&self) -> anyhow::Result<()> {
        self.main_window.run()?;
        Ok(())
    }
}

fn press(stopwatch: &RefCell<Stopwatch<TimerScheduler>>, button: fn(&Snapshot) -> Button) {
    let mut stopwatch = stopwatch.borrow_mut();
    let button = button(&stopwatch.snapshot());
    if !button.enabled {
        return;
    }

    if let Err(e) = stopwatch.press(button.action) {
        debug_assert!(false, "enabled control was rejected: {e}");
        tracing::error!(%e, "Rejected an enabled control");
    }
}

fn render(window: &MainWindow, snapshot: &Snapshot) {
    window.set_time(SharedString::from(snapshot.display().to_string()));

    let laps: Vec<LapEntry> = snapshot.laps.iter().map(entry).collect();
    window.set_laps(ModelRc::new(VecModel::from(laps)));

    let controls = snapshot.controls();
    window.set_left_title(controls.left.title.into());
    window.set_left_foreground(color(controls.left.palette.foreground));
    window.set_left_fill(color(controls.left.palette.background));
    window.set_left_enabled(controls.left.enabled);
    window.set_right_title(controls.right.title.into());
    window.set_right_foreground(color(controls.right.palette.foreground));
    window.set_right_fill(color(controls.right.palette.background));
    window.set_right_enabled(controls.right.enabled);
}

fn entry(lap: &LapRow) -> LapEntry {
    LapEntry {
        label: slint::format!("Lap {}", lap.number),
        time: format_duration(lap.interval).into(),
        fastest: lap.fastest,
        slowest: lap.slowest,
    }
}

fn color(hex: &str) -> Color {
    let rgb = u32::from_str_radix(hex.trim_start_matches('#'), 16).unwrap_or_default();
    Color::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Redraws the window, if it is still open.
struct WindowObserver(Weak<MainWindow>);

impl Observer for WindowObserver {
    fn on_transition(&self, action: Action, snapshot: &Snapshot) {
        match self.0.upgrade() {
            Some(window) => render(&window, snapshot),
            None => tracing::warn!(%action, "Window is gone"),
        }
    }

    fn on_tick(&self, snapshot: &Snapshot) {
        let Some(window) = self.0.upgrade() else {
            return;
        };

        window.set_time(SharedString::from(snapshot.display().to_string()));

        // Only the newest lap changes between ticks.
        let laps = window.get_laps();
        if let Some(newest) = snapshot.laps.first() {
            if laps.row_count() > 0 {
                laps.set_row_data(0, entry(newest));
            }
        }
    }
}
