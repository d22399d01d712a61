//! CLI output formatting.
//!
//! Human-readable, colored lines by default; one JSON object per line with
//! `--json` for scripting. `--quiet` drops everything except warnings and
//! errors.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;
use serde_json::{json, Value};

/// Output flags shared by every command handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn current() -> OutputConfig {
    let cell = OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()));
    match cell.read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply output settings from the global CLI flags.
pub fn configure(config: OutputConfig) {
    let cell = OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()));
    match cell.write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn is_quiet() -> bool {
    current().quiet
}

/// Build the JSON line for `kind`.
fn json_line(kind: &str, payload: Value) -> Value {
    json!({ "type": kind, "payload": payload })
}

/// Print `human` unless quiet, or the JSON form in JSON mode.
fn emit(kind: &str, payload: Value, human: impl FnOnce()) {
    let config = current();
    if config.json {
        println!("{}", json_line(kind, payload));
    } else if !config.quiet {
        human();
    }
}

/// Print the application header with name and version.
pub fn header(version: &str) {
    emit(
        "header",
        json!({ "app": "boostwatch", "version": version }),
        || {
            println!("{} {}", "boostwatch".bold(), version.dimmed());
            println!();
        },
    );
}

/// Print a section title.
pub fn section(title: &str) {
    emit("section", json!({ "title": title }), || {
        println!();
        println!("{}", title.bold());
    });
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        json!({ "label": label, "value": value }),
        || println!("  {:<14} {}", label.dimmed(), value),
    );
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), || {
        println!("  {} {}", "✓".green(), message);
    });
}

/// Print a dimmed note.
pub fn note(message: &str) {
    emit("note", json!({ "message": message }), || {
        println!("  {}", message.dimmed());
    });
}

/// Print a warning. Shown even in quiet mode.
pub fn warning(message: &str) {
    if is_json() {
        println!("{}", json_line("warning", json!({ "message": message })));
        return;
    }
    println!("  {} {}", "⚠".yellow(), message);
}

/// Print an error to stderr. Shown even in quiet mode.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json_line("error", json!({ "message": message })));
        return;
    }
    eprintln!("  {} {}", "×".red(), message);
}

/// Print one subscriber row.
pub fn subscriber(id: i64, wallet: &str, expires: &str, active: bool) {
    emit(
        "subscriber",
        json!({
            "subscriber": id,
            "wallet": wallet,
            "expires_at": expires,
            "active": active,
        }),
        || {
            let state = if active {
                format!("{}", "active".green())
            } else {
                format!("{}", "expired".red())
            };
            println!("  {:<14} {}  {}  {}", id, wallet, expires.dimmed(), state);
        },
    );
}
