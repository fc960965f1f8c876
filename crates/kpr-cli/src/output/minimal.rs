use serde_json::Value;

use super::humanize;

/// Print just the headline figure of the output.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "estimated_monthly_payment",
        "monthly_payment",
        "shortest_eligible_term",
        "loan_need",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(key, val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(key, val));
            return;
        }
    }

    println!("{}", format_minimal("", result_obj));
}

fn format_minimal(key: &str, value: &Value) -> String {
    if let Some(human) = humanize(key, value) {
        return human;
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
