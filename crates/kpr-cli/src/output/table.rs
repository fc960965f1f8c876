use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::humanize;

/// Format output as tables, money and ratios rendered for reading.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_table(result, map),
            _ => print_fields(map),
        },
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    // Lists of records (schedule rows, yearly summaries) get their own table
    let mut nested: Vec<(&str, &[Value])> = Vec::new();
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in result {
        match val {
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                nested.push((key.as_str(), items.as_slice()));
            }
            _ => builder.push_record([key.as_str(), &format_field(key, val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, items) in nested {
        println!("\n{}:", key);
        print_rows(items);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
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
        builder.push_record([key.as_str(), &format_field(key, val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            println!("(empty)");
        }
        for item in arr {
            println!("{}", format_value(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h).map(|v| format_field(h, v)).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn format_field(key: &str, value: &Value) -> String {
    humanize(key, value).unwrap_or_else(|| format_value(value))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(format_item).collect::<Vec<_>>().join(", "),
        other => format_item(other),
    }
}

fn format_item(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => format!(
            "[{}]",
            arr.iter().map(format_item).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
