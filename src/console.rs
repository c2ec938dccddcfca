use crate::cli::Arguments;
use lapwatch::controls::Button;
use lapwatch::format::format_duration;
use lapwatch::schedule::TaskScheduler;
use lapwatch::{Action, Observer, Snapshot, Stopwatch, SystemClock};
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Press(Action),
    Quit,
}

impl Command {
    /// An empty line presses the right-hand button.
    fn parse(line: &str, snapshot: &Snapshot) -> anyhow::Result<Self> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "" => Ok(Command::Press(snapshot.controls().right.action)),
            "quit" | "q" => Ok(Command::Quit),
            _ => Ok(Command::Press(line.parse()?)),
        }
    }
}

/// Draws snapshots as text, or as one JSON object per line.
pub struct Console<W: Write> {
    out: RefCell<W>,
    json: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self {
            out: RefCell::new(out),
            json,
        }
    }

    pub fn render(&self, snapshot: &Snapshot) -> io::Result<()> {
        let mut out = self.out.borrow_mut();

        if self.json {
            serde_json::to_writer(&mut *out, snapshot)?;
            writeln!(out)?;
            return out.flush();
        }

        writeln!(out)?;
        writeln!(out, "{}  [{}]", snapshot.display(), snapshot.phase)?;
        for lap in &snapshot.laps {
            let mark = match (lap.fastest, lap.slowest) {
                (true, true) => "  fastest, slowest",
                (true, false) => "  fastest",
                (false, true) => "  slowest",
                (false, false) => "",
            };
            writeln!(
                out,
                "  Lap {:<3} {}{}",
                lap.number,
                format_duration(lap.interval),
                mark
            )?;
        }

        let [left, right] = snapshot.controls().buttons();
        writeln!(out, "{} {}", label(&left), label(&right))?;
        out.flush()
    }

    fn render_tick(&self, snapshot: &Snapshot) -> io::Result<()> {
        if self.json {
            return Ok(());
        }

        let mut out = self.out.borrow_mut();
        write!(out, "\r{}", snapshot.display())?;
        out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

fn label(button: &Button) -> String {
    if button.enabled {
        format!("[{}]", button.title)
    } else {
        format!("({})", button.title)
    }
}

impl<W: Write> Observer for Console<W> {
    fn on_transition(&self, _: Action, snapshot: &Snapshot) {
        if let Err(e) = self.render(snapshot) {
            tracing::error!(%e, "Failed to draw the lap table");
        }
    }

    fn on_tick(&self, snapshot: &Snapshot) {
        if let Err(e) = self.render_tick(snapshot) {
            tracing::error!(%e, "Failed to draw the clock");
        }
    }
}

pub fn run(arguments: &Arguments) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    // The stopwatch and its tick task are `!Send`.
    let local = tokio::task::LocalSet::new();
    let result = local.block_on(&runtime, async {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = read_loop(sender) {
                tracing::error!(%e, "Failed to read commands");
            }
        });

        let console = Rc::new(Console::new(io::stdout(), arguments.json));
        let mut stopwatch = Stopwatch::new(Rc::new(SystemClock), TaskScheduler)
            .with_tick(Duration::from_millis(arguments.tick_ms))
            .with_observer(console.clone());

        console.render(&stopwatch.snapshot())?;
        event_loop(&mut stopwatch, receiver).await;

        anyhow::Ok(())
    });

    // The stdin reader may still be blocked on a read.
    runtime.shutdown_background();

    tracing::debug!("Console closed");
    result
}

/// Serves commands until the input ends. Ticks run between commands on the
/// same thread.
async fn event_loop(
    stopwatch: &mut Stopwatch<TaskScheduler>,
    mut receiver: UnboundedReceiver<String>,
) {
    while let Some(line) = receiver.recv().await {
        match Command::parse(&line, &stopwatch.snapshot()) {
            Ok(Command::Quit) => return,
            Ok(Command::Press(action)) => press(stopwatch, action),
            Err(e) => {
                tracing::warn!(%e, "Ignoring input");
                println!("{e}");
            }
        }
    }
}

fn press(stopwatch: &mut Stopwatch<TaskScheduler>, action: Action) {
    let controls = stopwatch.snapshot().controls();
    if !controls.permits(action) {
        tracing::warn!(%action, "Action is not available");
        println!("{action} is not available right now");
        return;
    }

    if let Err(e) = stopwatch.press(action) {
        debug_assert!(false, "enabled control was rejected: {e}");
        tracing::error!(%e, "Rejected an enabled control");
    }
}

fn read_loop(sender: UnboundedSender<String>) -> anyhow::Result<()> {
    for line in io::stdin().lock().lines() {
        sender.send(line?)?;
    }

    Ok(())
}
