use std::fmt::Write;

use super::value::{JsonValue, Number};

/// Compact JSON text for a value tree. Object keys keep insertion order.
pub fn serialize(value: &JsonValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &JsonValue) {
    match value {
        JsonValue::Null => out.push_str("null"),
        JsonValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        JsonValue::Number(n) => write_number(out, *n),
        JsonValue::String(s) => write_string(out, s),
        JsonValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        JsonValue::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: Number) {
    match n {
        Number::I32(v) => {
            let _ = write!(out, "{}", v);
        }
        Number::I64(v) => {
            let _ = write!(out, "{}", v);
        }
        // JSON has no spelling for these.
        Number::F64(f) if !f.is_finite() => out.push_str("null"),
        Number::F64(f) => {
            // Debug keeps a fraction or exponent ("2.0", "1e300"), so the
            // value reads back as a float.
            let _ = write!(out, "{:?}", f);
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{parse, Map};

    #[test]
    fn test_compact_output_keeps_key_order() {
        let mut map = Map::new();
        map.insert("z", 1);
        map.insert("a", vec![true, false]);
        map.insert("m", JsonValue::Null);

        assert_eq!(serialize(&map.into()), r#"{"z":1,"a":[true,false],"m":null}"#);
    }

    #[test]
    fn test_float_stays_float() {
        assert_eq!(serialize(&JsonValue::from(2.0)), "2.0");
        assert_eq!(serialize(&JsonValue::from(2.5)), "2.5");
        assert_eq!(parse(&serialize(&JsonValue::from(2.0))).unwrap(), JsonValue::from(2.0));
        assert_eq!(serialize(&JsonValue::from(f64::NAN)), "null");
    }

    #[test]
    fn test_string_escaping() {
        let value = JsonValue::from("say \"hi\"\\\n\u{1}");
        assert_eq!(serialize(&value), r#""say \"hi\"\\\n\u0001""#);
        assert_eq!(parse(&serialize(&value)).unwrap(), value);
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let text = r#"{ "name" : "Vault", "doors": [1, 2.25, -3e2],
            "nested": {"ok": true, "none": null, "big": 9007199254740993},
            "text": "tab\tand é" }"#;
        let value = parse(text).unwrap();
        assert_eq!(parse(&serialize(&value)).unwrap(), value);
    }
}
