use stderrlog::{LogLevelNum, Timestamp};

/// Logging setup arg group.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence log messages.
    #[clap(short, long, global = true)]
    pub quiet: bool,

    /// More log output (-v, -vv, -vvv); JIT refusals show at -v.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Enable timestamped logging.
    #[clap(long, global = true)]
    pub ts: bool,
}

fn log_level(
    verbose: u8,
    default: u8,
) -> LogLevelNum {
    match default.saturating_add(verbose) {
        0 => LogLevelNum::Off,
        1 => LogLevelNum::Error,
        2 => LogLevelNum::Warn,
        3 => LogLevelNum::Info,
        4 => LogLevelNum::Debug,
        _ => LogLevelNum::Trace,
    }
}

impl LogArgs {
    /// Install the stderr logger.
    ///
    /// ## Arguments
    /// * `default` - the level with no `-v`; 2 is warnings.
    pub fn setup_logging(
        &self,
        default: u8,
    ) -> Result<(), Box<dyn std::error::Error>> {
        stderrlog::new()
            .module("genregex")
            .quiet(self.quiet)
            .verbosity(log_level(self.verbose, default))
            .timestamp(if self.ts {
                Timestamp::Second
            } else {
                Timestamp::Off
            })
            .init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        assert!(matches!(log_level(0, 0), LogLevelNum::Off));
        assert!(matches!(log_level(0, 2), LogLevelNum::Warn));
        assert!(matches!(log_level(1, 2), LogLevelNum::Info));
        assert!(matches!(log_level(2, 2), LogLevelNum::Debug));
        assert!(matches!(log_level(200, 200), LogLevelNum::Trace));
    }
}
