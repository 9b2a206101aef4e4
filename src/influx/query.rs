// Annotated CSV query results -> generic records.
// Tables are separated by blank lines; each table starts with an optional
// `#datatype` row followed by a header row. Column 0 holds annotations.

use super::InfluxError;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// One result row keyed by column name.
pub type Record = BTreeMap<String, Value>;

pub fn parse_csv(body: &str) -> Result<Vec<Record>, InfluxError> {
    let mut records = Vec::new();
    let mut datatypes: Vec<String> = Vec::new();
    let mut header: Option<Vec<String>> = None;

    for row in split_rows(body) {
        if row.iter().all(|c| c.is_empty()) {
            // Blank line: next table.
            datatypes.clear();
            header = None;
            continue;
        }
        match row[0].as_str() {
            "#datatype" => {
                datatypes = row;
                header = None;
                continue;
            }
            a if a.starts_with('#') => continue,
            _ => {}
        }
        let Some(columns) = header.as_ref() else {
            header = Some(row);
            continue;
        };

        let mut record = Record::new();
        for (i, (name, raw)) in columns.iter().zip(row.iter()).enumerate() {
            if i == 0 && name.is_empty() {
                continue;
            }
            let datatype = datatypes.get(i).map(String::as_str).unwrap_or("string");
            record.insert(name.clone(), typed_value(datatype, raw));
        }
        if let Some(Value::String(msg)) = record.get("error")
            && !msg.is_empty()
        {
            return Err(InfluxError::Query(msg.clone()));
        }
        records.push(record);
    }
    Ok(records)
}

fn typed_value(datatype: &str, raw: &str) -> Value {
    if raw.is_empty() && datatype != "string" {
        return Value::Null;
    }
    let parsed = match datatype {
        "long" => raw.parse::<i64>().ok().map(Value::from),
        "unsignedLong" => raw.parse::<u64>().ok().map(Value::from),
        "double" => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        "boolean" => raw.parse::<bool>().ok().map(Value::Bool),
        _ => None,
    };
    parsed.unwrap_or_else(|| Value::String(raw.to_string()))
}

/// RFC 4180 rows. Quoted cells may contain commas, newlines and doubled quotes.
fn split_rows(body: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    cell.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => cell.push(ch),
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            _ => cell.push(ch),
        }
    }
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }
    rows
}
