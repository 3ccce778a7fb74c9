use serde_json::Value;

use super::{flatten, format_cell, result_of};

/// Headline figure of each calculator, in priority order.
const PRIORITY_KEYS: [&str; 12] = [
    "total_value",
    "summary.total_value",
    "summary.emi",
    "plan.monthly_sip",
    "monthly_sip_required",
    "monthly_contribution",
    "total_tax",
    "cagr_pct",
    "recommended_cover",
    "corpus_required",
    "future_cost",
    "name",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);
    let flat = flatten(result);

    for key in PRIORITY_KEYS {
        if let Some((_, val)) = flat.fields.iter().find(|(k, v)| k == key && !v.is_null()) {
            println!("{}", format_cell(val));
            return;
        }
    }

    if let Some((key, val)) = flat.fields.first() {
        println!("{}: {}", key, format_cell(val));
        return;
    }

    println!("{}", format_cell(result));
}
