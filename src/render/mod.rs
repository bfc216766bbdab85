//! Rendering of analysis reports.

mod json;
mod text;

pub use json::{to_json, write_report, JsonFormat, REPORT_FILE_NAME};
pub use text::to_text;
