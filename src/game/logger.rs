//! Battle event logger
//!
//! Every battle event goes through one logger so output can be silenced,
//! captured for tests, or emitted as JSON lines.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Verbosity level for battle output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during battle
    Silent = 0,
    /// Minimal - only the battle outcome
    Minimal = 1,
    /// Normal - turns, phases and key actions (default)
    #[default]
    Normal = 2,
    /// Verbose - every draw, choice and state change
    Verbose = 3,
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A captured log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g., "controller_choice")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Read-only access to captured log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl LogGuard<'_> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl Deref for LogGuard<'_> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized logger for battle events
pub struct BattleLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl BattleLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        BattleLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// A logger that captures everything and prints nothing
    pub fn capturing() -> Self {
        let mut logger = Self::with_verbosity(VerbosityLevel::Verbose);
        logger.enable_capture();
        logger
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Capture to the in-memory buffer only
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    /// Access captured log entries without copying
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    /// Captured messages only, in order
    pub fn messages(&self) -> Vec<String> {
        self.log_buffer.borrow().iter().map(|e| e.message.clone()).collect()
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    fn write_stdout(&self, entry: &LogEntry) {
        match self.output_format {
            OutputFormat::Text => {
                if entry.level == VerbosityLevel::Minimal {
                    println!("{}", entry.message);
                } else {
                    println!("  {}", entry.message);
                }
            }
            OutputFormat::Json => match serde_json::to_string(entry) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("Failed to serialize log entry: {e}"),
            },
        }
    }

    fn log(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);
        let passes_filter = level <= self.verbosity;

        if level == VerbosityLevel::Silent || (!passes_filter && !should_capture) {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            category: category.map(str::to_string),
        };

        if should_output && passes_filter {
            self.write_stdout(&entry);
        }
        if should_capture {
            self.log_buffer.borrow_mut().push(entry);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, message, None);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, message, None);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, message, None);
    }

    /// Log a controller decision at Normal level.
    ///
    /// The message does not name the controller, so logs match regardless of
    /// which controller made the choice.
    pub fn controller_choice(&self, controller_name: &str, message: &str) {
        // Controller identity goes to stderr so stdout stays comparable
        if self.verbosity >= VerbosityLevel::Verbose && matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both) {
            eprintln!("  >>> {controller_name}: {message}");
        }
        self.log(VerbosityLevel::Normal, message, Some("controller_choice"));
    }
}

impl Default for BattleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BattleLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

impl Clone for BattleLogger {
    fn clone(&self) -> Self {
        BattleLogger {
            verbosity: self.verbosity,
            output_format: self.output_format,
            output_mode: self.output_mode,
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}
