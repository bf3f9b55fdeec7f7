use serde_json::Value;
use std::io;

use super::{find_repayments, format_scalar};

/// Write the installment rows as CSV, or field/value pairs when the result
/// carries no schedule.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let result = value.get("result").unwrap_or(value);

    if let Some(rows) = find_repayments(result) {
        write_rows(&mut wtr, rows);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &format_scalar(val)]);
        }
    } else {
        let _ = wtr.write_record([&format_scalar(result)]);
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}
