pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Keys holding row-shaped data: installment tables and portfolio lines.
const ROW_KEYS: [&str; 2] = ["schedule", "lines"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Split an object into its scalar fields and the first row-shaped array.
pub(crate) fn split_rows(map: &Map<String, Value>) -> (Map<String, Value>, Option<&[Value]>) {
    let rows = ROW_KEYS
        .iter()
        .find_map(|k| map.get(*k).and_then(Value::as_array))
        .map(Vec::as_slice);
    let fields = map
        .iter()
        .filter(|(k, v)| !(ROW_KEYS.contains(&k.as_str()) && v.is_array()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    (fields, rows)
}

/// The payload of a command: the `result` of an analysis envelope, the
/// `record` of an update report, or the value itself.
pub(crate) fn payload(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result").or_else(|| m.get("record")))
        .unwrap_or(value)
}
