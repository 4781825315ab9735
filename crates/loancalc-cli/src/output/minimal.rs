use serde_json::Value;

/// The headline answer of each command, in order of preference.
const PRIORITY_KEYS: [&str; 9] = [
    "balloon_amount",
    "monthly_payment",
    "payment",
    "months_to_payoff",
    "principal",
    "periods",
    "viable",
    "financed_principal",
    "payment_change",
];

/// Print just the key answer value from the output.
///
/// Looks for the first non-null priority field in the result, then falls
/// back to the first field.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        return format_minimal(result_obj);
    };

    let headline = PRIORITY_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|val| !val.is_null());
    if let Some(val) = headline {
        return format_minimal(val);
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
        None => String::new(),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
