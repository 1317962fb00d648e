//! Logging utilities with colored output.
//!
//! # Example
//!
//! ```ignore
//! log!("blog"; "{} articles, {} resources", articles, resources);
//! log!("skip"; "{err}");
//! ```
//!
//! Messages go to stderr so that `almanac build` can stream the JSON
//! manifest on stdout.

use colored::{ColoredString, Colorize};
use std::io::{Write, stderr};
use std::sync::atomic::{AtomicBool, Ordering};

/// Global switch, flipped by `--quiet`.
static QUIET: AtomicBool = AtomicBool::new(false);

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Silence (or re-enable) all log output.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Write one prefixed line to stderr.
///
/// Multiline messages keep the prefix on the first line only.
pub fn log(module: &str, message: &str) {
    if QUIET.load(Ordering::Relaxed) {
        return;
    }

    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "error" => prefix.bright_red().bold(),
        "skip" | "warn" => prefix.bright_magenta().bold(),
        "new" | "done" => prefix.bright_green().bold(),
        "source" => prefix.bright_blue().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}
