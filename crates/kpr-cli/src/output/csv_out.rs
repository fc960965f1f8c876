use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout. Values stay machine-readable.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            // Schedules export their rows; everything else is field, value
            Some(Value::Object(result)) => match result.get("rows") {
                Some(Value::Array(rows)) => write_records(&mut wtr, rows),
                _ => write_fields(&mut wtr, result),
            },
            _ => write_fields(&mut wtr, map),
        },
        Value::Array(arr) => write_records(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_records(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
