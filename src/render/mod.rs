//! Output side: turn verdicts and replay outcomes into status text or JSON.

pub mod json;
pub mod text;

pub use json::{render_json_report, render_json_result};
pub use text::{is_valid_status, render_step, render_text_result};
