use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{find_repayments, format_scalar};

/// Render a result as tables: headline fields first, then nested sections,
/// then the installment schedule if there is one.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result(result, map),
            None => print_fields(map),
        },
        _ => println!("{}", format_scalar(value)),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    if let Value::Object(fields) = result {
        print_fields(fields);

        for (key, val) in fields {
            if key == "loan" || key == "repayments" {
                continue;
            }
            if let Value::Object(section) = val {
                println!("\n{}:", key);
                print_fields(section);
            }
        }

        if let Some(rows) = find_repayments(result) {
            println!("\nSchedule:");
            print_rows(rows);
        }
    } else {
        println!("{}", format_scalar(result));
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

/// Scalar fields only; objects and arrays get their own sections.
fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if !val.is_object() && !val.is_array() {
            builder.push_record([key.as_str(), &format_scalar(val)]);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_scalar).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }

    println!("{}", Table::from(builder));
}
