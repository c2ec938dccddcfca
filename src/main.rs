#[cfg(feature = "ui")]
mod app;
mod cli;
mod console;

use crate::cli::Arguments;
use clap::Parser;
use std::io;
use tracing_log::LogTracer;

fn main() {
    let arguments = Arguments::parse();
    set_log_level(&arguments).expect("Failed to configure logging");

    tracing::debug!(?arguments, "starting lapwatch");

    if let Err(e) = run(&arguments) {
        tracing::error!(%e, "Unable to run the stopwatch");
        std::process::exit(1);
    }
}

fn set_log_level(arguments: &Arguments) -> anyhow::Result<()> {
    LogTracer::init()?;

    let level = match arguments.verbosity {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(feature = "ui")]
fn run(arguments: &Arguments) -> anyhow::Result<()> {
    if arguments.console {
        return console::run(arguments);
    }

    app::Window::new(arguments)?.run()
}

#[cfg(not(feature = "ui"))]
fn run(arguments: &Arguments) -> anyhow::Result<()> {
    if !arguments.console {
        tracing::info!("Built without the window, using the terminal");
    }

    console::run(arguments)
}
