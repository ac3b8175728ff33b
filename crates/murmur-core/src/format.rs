//! Local display formatting.

use chrono::NaiveDateTime;

/// Width the target label is padded to.
pub const TARGET_WIDTH: usize = 12;

/// Timestamp layout: `MM/DD/YY HH:MM`.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%y %H:%M";

/// SGR sequence that starts authenticated message text.
pub const SECURE_TEXT_START: &str = "\x1b[32m";

/// SGR sequence that ends authenticated message text.
pub const SECURE_TEXT_END: &str = "\x1b[0m";

/// Render one display line: `<target padded> : <date> <time> <text>`.
pub fn render_line(target: &str, at: NaiveDateTime, text: &str) -> String {
    format!("{target:<width$}: {} {text}", at.format(TIMESTAMP_FORMAT), width = TARGET_WIDTH)
}
