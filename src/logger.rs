//! Structured console logging with visual formatting.
//!
//! suncalc prints its results as a small tree drawn with Unicode box drawing
//! characters. The same logger carries warnings from configuration loading and
//! debug traces of the calculation when `--debug` is passed.
//!
//! Output can be switched off at runtime, which the tests use to keep their
//! output quiet.

use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Log level enumeration for categorizing message importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,  // Debug traces, only shown with --debug
    Warn, // Recoverable problems (clamped values, ignored files)
    Err,  // Failures that stop the current command
    Crit, // Failures that stop the process
    Info, // Status updates
}

impl LogLevel {
    fn prefix(self) -> &'static str {
        match self {
            LogLevel::Log => "[LOG] ",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Err => "[ERR] ",
            LogLevel::Crit => "[CRIT] ",
            LogLevel::Info => "[INFO] ",
        }
    }
}

/// Main logging interface providing structured output formatting.
pub struct Log;

impl Log {
    /// Enable or disable all output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable `LogLevel::Log` messages.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Print a message with its level prefix.
    ///
    /// Debug-level messages are dropped unless debug output was enabled with
    /// [`Log::set_debug`].
    pub fn log(level: LogLevel, message: &str) {
        if !Self::is_enabled() {
            return;
        }
        if level == LogLevel::Log && !Self::is_debug() {
            return;
        }

        println!("{}{}", level.prefix(), message);
    }

    // ═══ Convenience Methods for Common Log Levels ═══

    pub fn log_error(message: &str) {
        Self::log(LogLevel::Err, message);
    }

    pub fn log_warning(message: &str) {
        Self::log(LogLevel::Warn, message);
    }

    pub fn log_info(message: &str) {
        Self::log(LogLevel::Info, message);
    }

    pub fn log_debug(message: &str) {
        Self::log(LogLevel::Log, message);
    }

    pub fn log_critical(message: &str) {
        Self::log(LogLevel::Crit, message);
    }

    // ═══ Visual Formatting Functions ═══

    /// Log a message on a branch of the output tree.
    pub fn log_decorated(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┣ {}", message);
    }

    /// Log a detail line under the current branch.
    pub fn log_indented(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃   {}", message);
    }

    /// Log a `label: value` pair with the labels padded to a common column.
    ///
    /// Used for the table of solar events so the times line up.
    pub fn log_field(label: &str, value: &str, width: usize) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃   {:<width$} {}", format!("{}:", label), value, width = width + 1);
    }

    pub fn log_pipe() {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
    }

    /// Log a spacer followed by a new branch.
    pub fn log_block_start(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
        println!("┣ {}", message);
    }

    /// Log the header that opens the output tree.
    pub fn log_version() {
        if !Self::is_enabled() {
            return;
        }
        println!("┏ suncalc v{} ━━╸", env!("CARGO_PKG_VERSION"));
        println!("┃");
    }

    /// Log the marker that closes the output tree.
    pub fn log_end() {
        if !Self::is_enabled() {
            return;
        }
        println!("╹");
    }
}
