// InfluxDB line protocol encoding.
// <measurement>[,<tag>=<value>...] <field>=<value>[,...] <timestamp ns>

use crate::models::{FieldValue, Point};
use std::fmt::Write;

/// Encode `points`, one line each, newline separated. Points whose timestamp
/// has no nanosecond representation are skipped.
pub fn encode(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len() * 96);
    for point in points {
        if encode_point(&mut out, point) {
            out.push('\n');
        }
    }
    out
}

/// Append one line for `point`. Returns false, writing nothing, when the
/// timestamp is out of the nanosecond range.
pub fn encode_point(out: &mut String, point: &Point) -> bool {
    let Some(ns) = point.timestamp.timestamp_nanos_opt() else {
        tracing::debug!(
            measurement = %point.measurement,
            timestamp = %point.timestamp,
            "timestamp out of range; point skipped"
        );
        return false;
    };
    escape_into(out, &point.measurement, &[',', ' ']);
    // Empty tag keys and values are rejected by the backend.
    for (key, value) in point
        .tags
        .iter()
        .filter(|(k, v)| !k.is_empty() && !v.is_empty())
    {
        out.push(',');
        escape_into(out, key, &[',', '=', ' ']);
        out.push('=');
        escape_into(out, value, &[',', '=', ' ']);
    }
    out.push(' ');
    for (i, (key, value)) in point.fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        escape_into(out, key, &[',', '=', ' ']);
        out.push('=');
        write_field_value(out, value);
    }
    let _ = write!(out, " {ns}");
    true
}

fn write_field_value(out: &mut String, value: &FieldValue) {
    match value {
        FieldValue::I8(v) => {
            let _ = write!(out, "{v}i");
        }
        FieldValue::I16(v) => {
            let _ = write!(out, "{v}i");
        }
        FieldValue::I32(v) => {
            let _ = write!(out, "{v}i");
        }
        FieldValue::I64(v) => {
            let _ = write!(out, "{v}i");
        }
        FieldValue::F64(v) => {
            let _ = write!(out, "{v}");
        }
        FieldValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
        FieldValue::Str(s) => {
            out.push('"');
            escape_into(out, s, &['"', '\\']);
            out.push('"');
        }
    }
}

// A raw newline would end the line, so it is written as `\n`; `\r` is dropped.
fn escape_into(out: &mut String, s: &str, special: &[char]) {
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => {
                if special.contains(&ch) {
                    out.push('\\');
                }
                out.push(ch);
            }
        }
    }
}
