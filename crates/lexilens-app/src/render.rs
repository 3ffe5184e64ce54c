use lexilens_core::{CostEstimator, is_ascii_word};
use lexilens_types::LookupResult;

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Plain-text card for one lookup, with token usage and cost footer
pub fn render_result(query: &str, result: &LookupResult, estimator: &CostEstimator) -> String {
    let mut lines = vec![query.to_string()];
    if is_ascii_word(query) {
        lines.push("  (pronunciation available)".to_string());
    }
    lines.push(String::new());
    lines.push(format!("Definition: {}", result.definition));
    lines.push(format!("Synonyms:   {}", join_or_dash(&result.synonyms)));
    lines.push(format!("Antonyms:   {}", join_or_dash(&result.antonyms)));

    if !result.examples.is_empty() {
        lines.push("Examples:".to_string());
        lines.extend(result.examples.iter().map(|example| format!("  - {example}")));
    }

    if let Some(fact) = &result.fact {
        lines.push(format!("Fact: {fact}"));
    }

    let cost = estimator.estimate_usage(&result.usage);
    lines.push(format!("{} tokens used ≈ {} USD", result.usage.total(), cost));

    lines.join("\n")
}

pub fn render_history(entries: &[String]) -> String {
    if entries.is_empty() {
        return "No lookups yet".to_string();
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}. {entry}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_quota(remaining: u32, limit: u32, resets_at: Option<&str>) -> String {
    match resets_at {
        Some(at) => format!("{remaining}/{limit} lookups left, window resets at {at}"),
        None => format!("{remaining}/{limit} lookups left"),
    }
}
