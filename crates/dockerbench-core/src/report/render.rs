use crate::TOOL_NAME;
use crate::report::model::ViolationReport;

pub fn render_text(report: &ViolationReport, version: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{TOOL_NAME} {version}\n"));
    out.push_str(&format!(
        "Rules evaluated: {}, violations: {}\n",
        report.violations.len(),
        report.violation_count()
    ));
    for rule in &report.violations {
        if rule.is_clean() {
            out.push_str(&format!("[PASS] {}\n", rule.rule));
            continue;
        }
        out.push_str(&format!("[FAIL] {}\n", rule.rule));
        for item in &rule.items {
            out.push_str(&format!("  - {item}\n"));
        }
    }
    out
}

pub fn render_json(report: &ViolationReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
