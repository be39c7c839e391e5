// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Normal, quiet (CI) and JSON modes for progress, reports and exports.

use serde::Serialize;
use std::time::Instant;

use crate::exports::Exports;
use crate::manifest::PresenceReport;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug, Clone)]
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "success",
                    message,
                    duration_secs: self.start_time.map(|_| self.elapsed_secs()),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print a warning (suppressed in quiet mode).
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit_err("warning", message),
        }
    }

    /// Print the manifest presence report.
    pub fn report(&self, report: &PresenceReport) {
        match self.mode {
            OutputMode::Normal => {
                println!("Manifest verification:");
                for line in report.lines() {
                    println!("{line}");
                }
            }
            OutputMode::Quiet => {}
            OutputMode::Json => {
                for entry in report.entries() {
                    let event = ReportEvent {
                        event: "manifests",
                        service: entry.service.as_str(),
                        directory: entry.directory.to_string_lossy().into_owned(),
                        files: entry.files,
                    };
                    if let Ok(json) = serde_json::to_string(&event) {
                        println!("{json}");
                    }
                }
            }
        }
    }

    /// Print exported values. Always shown, including in quiet mode.
    pub fn exports(&self, exports: &Exports) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                for (key, value) in exports.iter() {
                    match value {
                        serde_json::Value::String(s) if key != crate::exports::KUBECONFIG => {
                            println!("{key}: {s}")
                        }
                        serde_json::Value::String(_) => println!("{key}: [secret]"),
                        other => println!("{key}: {other}"),
                    }
                }
            }
            OutputMode::Json => {
                let event = ExportsEvent {
                    event: "exports",
                    exports,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => self.emit_err("error", message),
        }
    }

    fn emit_err(&self, event: &str, message: &str) {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.start_time.map(|_| self.elapsed_secs()),
        };
        if let Ok(json) = serde_json::to_string(&event) {
            eprintln!("{json}");
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct ReportEvent<'a> {
    event: &'a str,
    service: &'a str,
    directory: String,
    files: usize,
}

#[derive(Serialize)]
struct ExportsEvent<'a> {
    event: &'a str,
    exports: &'a Exports,
}
