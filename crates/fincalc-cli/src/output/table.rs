use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, format_cell, result_of};

/// Format output as tables: headline fields first, then one table per series.
pub fn print_table(value: &Value) {
    let result = result_of(value);
    let flat = flatten(result);

    if flat.fields.is_empty() && flat.series.is_empty() {
        println!("{}", format_cell(result));
        return;
    }

    if !flat.fields.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &flat.fields {
            builder.push_record([key.clone(), format_cell(val)]);
        }
        println!("{}", Table::from(builder));
    }

    for (name, rows) in &flat.series {
        println!("\n{}:", name);
        print_rows(rows);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        if let Value::Object(map) = row {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}
