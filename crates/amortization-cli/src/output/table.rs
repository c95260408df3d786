use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{payload, split_rows};

/// Format output as tables: one field/value table for the scalar figures,
/// one row table for installments or portfolio lines.
pub fn print_table(value: &Value) {
    match payload(value) {
        Value::Object(map) => {
            let (fields, rows) = split_rows(map);
            print_fields(&fields);
            if let Some(rows) = rows {
                println!();
                print_rows(rows);
            }
        }
        Value::Array(arr) => print_rows(arr),
        other => println!("{}", other),
    }

    if let Value::Object(envelope) = value {
        print_notes(envelope);
    }
}

/// Warnings from an analysis envelope and issues from an update report.
fn print_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(outcome)) = envelope.get("outcome") {
        println!("\nOutcome: {}", outcome);
    }
    if let Some(Value::Array(issues)) = envelope.get("issues") {
        for issue in issues {
            println!("  - {}", format_value(issue));
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            println!("(no rows)");
        }
        for item in arr {
            println!("{}", format_value(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
