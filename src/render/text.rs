use crate::script::StepOutcome;
use crate::validate::ValidationResult;
use std::fmt::Write;

/// Status text counts as valid when it starts with "valid", in any case.
/// This is how a status bar decides between normal and error styling.
pub fn is_valid_status(message: &str) -> bool {
    message
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case("valid"))
}

/// Status line followed by one line per flagged edge.
pub fn render_text_result(result: &ValidationResult) -> String {
    let mut out = result.message.clone();
    out.push('\n');
    for id in &result.invalid_edge_ids {
        let _ = writeln!(out, "  invalid edge: {}", id);
    }
    out
}

/// One line per replay step: what ran, whether it stuck, and the status after.
pub fn render_step(step: &StepOutcome) -> String {
    let mark = if step.applied { "ok" } else { "rejected" };
    let mut out = format!(
        "[line {}] {}: {} ({})\n  {}",
        step.line, step.command, mark, step.note, step.result.message
    );
    if !step.result.invalid_edge_ids.is_empty() {
        let _ = write!(out, " [{}]", step.result.invalid_edge_ids.join(", "));
    }
    out.push('\n');
    out
}
