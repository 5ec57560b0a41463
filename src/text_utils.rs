//! Time formatting for player labels.

use crate::timer::sanitize_position;

/// Render seconds as `m:ss`. Non-finite or negative input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = sanitize_position(seconds).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
