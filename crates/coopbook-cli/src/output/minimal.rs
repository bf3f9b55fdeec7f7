use serde_json::Value;

use super::format_scalar;

/// Fields worth printing on their own, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "tail_emi",
    "emi",
    "changed",
    "pending_count",
    "outstanding_after",
    "installment_count",
];

/// Print just the headline number of a result.
pub fn print_minimal(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", format_scalar(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result));
}
