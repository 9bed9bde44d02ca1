//! Markdown report rendering for validated evaluations.
//!
//! Total and deterministic: empty arrays render empty sections, and the
//! same input always produces byte-identical output. Callers only invoke
//! this on values that already passed `is_valid_evaluation`, so missing
//! keys are not handled.

use serde_json::Value;

use crate::llm_client::MODEL;

/// Renders the per-candidate Markdown report.
pub fn render_report(result: &Value, candidate_label: &str) -> String {
    let mut md = Vec::new();

    md.push(format!("# CV Review — {candidate_label} ({MODEL})\n"));
    md.push(format!(
        "**Match score:** {} / 100  ",
        result["match_score"]
    ));
    md.push(format!(
        "**Verdict:** {}\n",
        result["verdict"].as_str().unwrap_or_default()
    ));
    md.push("## Summary\n".to_string());
    md.push(format!(
        "{}\n",
        result["summary"].as_str().unwrap_or_default()
    ));
    md.push("## Strengths (from CV)\n".to_string());
    push_bullets(&mut md, &result["strengths"]);
    md.push("\n## Missing / Not Evident Requirements (from JD)\n".to_string());
    push_bullets(&mut md, &result["missing_requirements"]);

    md.join("\n")
}

/// One bullet per array element, in the given order. Element types are
/// not constrained by the validator, so non-strings fall back to their
/// compact JSON form.
fn push_bullets(md: &mut Vec<String>, items: &Value) {
    if let Some(items) = items.as_array() {
        for item in items {
            match item.as_str() {
                Some(s) => md.push(format!("- {s}")),
                None => md.push(format!("- {item}")),
            }
        }
    }
}
