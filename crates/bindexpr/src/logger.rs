//! Logging setup for tools embedding the compiler.
//!
//! The library crates only emit through the `log` facade; call [`init`] (or
//! build on [`dispatch`]) to route those records to stderr.

use colored::{Color, Colorize};
use log::{Level, LevelFilter, SetLoggerError};

/// Returns a dispatch that formats records as `level: message` with a
/// colored level.
#[must_use]
pub fn dispatch(level: LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new().level(level).format(|out, message, record| {
        out.finish(format_args!("{} {}", level_prefix(record.level()), message));
    })
}

fn level_prefix(level: Level) -> colored::ColoredString {
    let color = match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Blue,
        Level::Debug => Color::Magenta,
        Level::Trace => Color::Green,
    };
    format!("{}:", level.as_str().to_lowercase()).color(color)
}

/// Installs a stderr logger at the given level.
///
/// # Errors
///
/// Fails if a global logger is already installed.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    dispatch(level).chain(std::io::stderr()).apply()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_prefix() {
        colored::control::set_override(false);
        assert_eq!(level_prefix(Level::Warn).to_string(), "warn:");
        assert_eq!(level_prefix(Level::Trace).to_string(), "trace:");
        colored::control::unset_override();
    }
}
