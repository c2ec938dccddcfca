use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about)]
pub struct Arguments {
    #[arg(short = 'v', long = None, env = "LAPWATCH_VERBOSITY", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Milliseconds between clock samples while running.
    #[arg(short, long = "tick", env = "LAPWATCH_TICK_MS", default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Print a JSON snapshot after every action instead of the lap table.
    #[arg(short, long, env = "LAPWATCH_JSON")]
    pub json: bool,

    /// Use the terminal even when the window is available.
    #[arg(short, long)]
    pub console: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let arguments = Arguments::try_parse_from(["lapwatch"]).unwrap();

        assert_eq!(arguments.verbosity, 0);
        assert_eq!(arguments.tick_ms, 100);
        assert!(!arguments.json);
        assert!(!arguments.console);
    }

    #[test]
    fn flags() {
        let arguments =
            Arguments::try_parse_from(["lapwatch", "-vv", "--tick", "250", "--json", "--console"])
                .unwrap();

        assert_eq!(arguments.verbosity, 2);
        assert_eq!(arguments.tick_ms, 250);
        assert!(arguments.json);
        assert!(arguments.console);
    }

    #[test]
    fn rejects_a_zero_tick() {
        assert!(Arguments::try_parse_from(["lapwatch", "--tick", "0"]).is_err());
    }
}
