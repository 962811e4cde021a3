use crate::graph::Snapshot;
use crate::script::StepOutcome;
use crate::validate::ValidationResult;
use serde::Serialize;

pub fn render_json_result(result: &ValidationResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

#[derive(Debug, Serialize)]
struct ReplayReport<'a> {
    steps: &'a [StepOutcome],
    #[serde(rename = "final")]
    final_result: &'a ValidationResult,
    graph: &'a Snapshot,
}

/// Full replay report: every step, the final verdict and the final graph.
pub fn render_json_report(
    steps: &[StepOutcome],
    final_result: &ValidationResult,
    graph: &Snapshot,
) -> anyhow::Result<String> {
    let report = ReplayReport {
        steps,
        final_result,
        graph,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;

    #[test]
    fn report_has_steps_final_and_graph() {
        let graph = Snapshot::default();
        let result = validate(&graph.nodes, &graph.edges);
        let json = render_json_report(&[], &result, &graph).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(v["steps"].as_array().unwrap().is_empty());
        assert_eq!(v["final"]["valid"], serde_json::json!(false));
        assert!(v["graph"]["nodes"].as_array().unwrap().is_empty());
    }
}
