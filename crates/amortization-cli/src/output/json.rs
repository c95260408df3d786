use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print JSON to stdout, newline terminated.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written: Result<(), Box<dyn std::error::Error>> = serde_json::to_writer_pretty(&mut out, value)
        .map_err(Into::into)
        .and_then(|_| writeln!(out).map_err(Into::into));
    if let Err(e) = written {
        eprintln!("JSON serialization error: {}", e);
    }
}
