#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Simple logging utilities for the generator.
//!
//! Messages go to stderr with a level and module prefix. The active level is
//! process-wide and defaults to [`Level::Warn`].

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Verbosity levels, most verbose first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Step-by-step tracing of the analysis pass
    Trace = 0,
    /// Progress messages
    Info = 1,
    /// Recoverable problems
    Warn = 2,
    /// Nothing is printed
    Off = 3,
}

impl Level {
    /// Get the string representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Off => "off",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => Level::Trace,
            1 => Level::Info,
            2 => Level::Warn,
            _ => Level::Off,
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" | "debug" => Ok(Level::Trace),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "off" | "none" => Ok(Level::Off),
            other => Err(format!("Unknown log level: {}", other)),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

static LEVEL: AtomicU8 = AtomicU8::new(Level::Warn as u8);

/// Set the process-wide log level.
pub fn set_level(level: Level) { LEVEL.store(level as u8, Ordering::Relaxed); }

/// Current process-wide log level.
pub fn level() -> Level { Level::from_u8(LEVEL.load(Ordering::Relaxed)) }

/// Whether messages at `level` are currently printed.
pub fn enabled(level: Level) -> bool { level != Level::Off && level >= self::level() }

/// Prints a trace message to stderr with module prefix.
pub fn trace(module: &str, msg: &str) {
    if enabled(Level::Trace) {
        eprintln!("[TRACE][{}] {}", module, msg);
    }
}

/// Prints an informational message to stderr with module prefix.
pub fn info(module: &str, msg: &str) {
    if enabled(Level::Info) {
        eprintln!("[INFO][{}] {}", module, msg);
    }
}

/// Prints a warning to stderr with module prefix.
pub fn warn(module: &str, msg: &str) {
    if enabled(Level::Warn) {
        eprintln!("[WARN][{}] {}", module, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!("trace".parse::<Level>(), Ok(Level::Trace));
        assert_eq!("DEBUG".parse::<Level>(), Ok(Level::Trace));
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warn));
        assert_eq!("off".parse::<Level>(), Ok(Level::Off));
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn test_enabled() {
        set_level(Level::Info);
        assert!(!enabled(Level::Trace));
        assert!(enabled(Level::Info));
        assert!(enabled(Level::Warn));
        assert!(!enabled(Level::Off));
        set_level(Level::Warn);
    }
}
