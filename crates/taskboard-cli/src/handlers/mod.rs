pub mod board;
pub mod column;
pub mod task;

use crate::output;
use taskboard_domain::{TaskPriority, TaskStatus};

pub(crate) fn parse_status(raw: &str) -> TaskStatus {
    raw.parse()
        .unwrap_or_else(|e: taskboard_domain::task::UnknownStatus| output::output_error(&e.to_string()))
}

pub(crate) fn parse_priority(raw: &str) -> TaskPriority {
    raw.parse()
        .unwrap_or_else(|e: String| output::output_error(&e))
}
