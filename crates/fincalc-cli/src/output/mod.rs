pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// A calculator result split into scalar fields and row series.
///
/// Nested objects are flattened with dotted keys (`summary.emi`); arrays of
/// objects (`schedule`, `yearly`, `slabs`) become series.
pub struct Flattened<'a> {
    pub fields: Vec<(String, &'a Value)>,
    pub series: Vec<(String, &'a [Value])>,
}

/// The `result` of a computation envelope, or the value itself.
pub fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

pub fn flatten(result: &Value) -> Flattened<'_> {
    let mut flat = Flattened {
        fields: Vec::new(),
        series: Vec::new(),
    };
    if let Value::Object(map) = result {
        flatten_into(map, "", &mut flat);
    }
    flat
}

fn flatten_into<'a>(map: &'a Map<String, Value>, prefix: &str, flat: &mut Flattened<'a>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(inner, &name, flat),
            Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                flat.series.push((name, items.as_slice()));
            }
            _ => flat.fields.push((name, val)),
        }
    }
}

/// Render a scalar cell; empty for null.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_splits_fields_and_series() {
        let value = json!({
            "result": {
                "summary": {"emi": "43391", "months": 240},
                "schedule": [{"year": 1}, {"year": 2}]
            },
            "warnings": []
        });
        let flat = flatten(result_of(&value));
        let names: Vec<&str> = flat.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["summary.emi", "summary.months"]);
        assert_eq!(flat.series.len(), 1);
        assert_eq!(flat.series[0].0, "schedule");
        assert_eq!(flat.series[0].1.len(), 2);
    }

    #[test]
    fn test_format_cell_null_is_empty() {
        assert_eq!(format_cell(&Value::Null), "");
        assert_eq!(format_cell(&json!(["a", 1])), "a, 1");
    }
}
