#![deny(missing_docs)]
//! Shared logging utilities for the ragchat workspace.
//!
//! This crate provides the `chat_*` logging macros used by the core, the
//! engine and the terminal app, plus a minimal test initializer for the
//! global logger. Every macro forwards to the `log` facade, so the binary
//! decides where records end up.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! chat_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! chat_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! chat_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! chat_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! chat_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Parses a level name such as `"info"` or `"DEBUG"` into a filter.
///
/// Unknown names fall back to `Info`.
pub fn parse_level(name: &str) -> log::LevelFilter {
    name.trim().parse().unwrap_or(log::LevelFilter::Info)
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
