use serde_json::Value;
use std::io;

use super::{flatten, format_cell, result_of};

/// Write output as CSV to stdout.
///
/// Calculators with a row series (schedule, yearly trace, slabs) emit the
/// first series; otherwise a two-column `field,value` listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let flat = flatten(result_of(value));

    if let Some((_, rows)) = flat.series.first() {
        write_rows(&mut wtr, rows);
    } else {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in &flat.fields {
            let _ = wtr.write_record([key.as_str(), &format_cell(val)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}
