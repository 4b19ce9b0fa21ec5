//! Lenient value coercion between widget text and typed JSON.
//!
//! Coercion never fails a run. Malformed input degrades to a benign
//! default for its declared type, and output formatting always yields
//! either a displayable value or `None` (which clears the widget).

use chrono::{Local, NaiveDate};
use rb_protocol::{DisplayValue, TypeTag};
use serde_json::{Map, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Coerce one raw widget string into the typed value the workflow's
/// input record expects.
///
/// `None` means "omit this field from the input record". Only empty
/// non-boolean strings produce `None`; everything else degrades to a
/// default instead.
pub fn parse_input(raw: &str, tag: TypeTag) -> Option<Value> {
    if raw.is_empty() {
        // An unchecked checkbox renders as the empty string but still
        // means an explicit false.
        return match tag {
            TypeTag::Boolean => Some(Value::Bool(false)),
            _ => None,
        };
    }

    let value = match tag {
        TypeTag::Integer => Value::from(raw.trim().parse::<i64>().unwrap_or(0)),
        TypeTag::Float => {
            let parsed = raw.trim().parse::<f64>().unwrap_or(0.0);
            let parsed = if parsed.is_finite() { parsed } else { 0.0 };
            Value::from(parsed)
        }
        TypeTag::Boolean => Value::Bool(raw.trim().parse::<bool>().unwrap_or(true)),
        TypeTag::Date => {
            let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .unwrap_or_else(|_| Local::now().date_naive());
            Value::String(date.format(DATE_FORMAT).to_string())
        }
        TypeTag::StringList => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => Value::Array(items),
            _ => Value::Array(Vec::new()),
        },
        TypeTag::ObjectMap => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Value::Object(map),
            _ => Value::Object(Map::new()),
        },
        TypeTag::StructuredRecord => {
            // A record that does not parse as a JSON object is omitted
            // entirely rather than defaulted.
            return serde_json::from_str::<Value>(raw).ok().filter(Value::is_object);
        }
        TypeTag::String
        | TypeTag::Url
        | TypeTag::OpaqueTabular
        | TypeTag::OpaqueFigure
        | TypeTag::Unknown => Value::String(raw.to_string()),
    };

    Some(value)
}

/// Format one typed output value for its widget.
///
/// A missing value clears most widgets (`None`); only a `String` field
/// shows an explicit empty text instead.
pub fn format_output(value: Option<&Value>, tag: TypeTag) -> Option<DisplayValue> {
    let value = match value {
        Some(Value::Null) | None => {
            return match tag {
                TypeTag::String => Some(DisplayValue::Text(String::new())),
                _ => None,
            };
        }
        Some(v) => v,
    };

    let display = match tag {
        TypeTag::Url => DisplayValue::Image(value_to_text(value)),
        TypeTag::OpaqueTabular => DisplayValue::Rows(extract_rows(value)),
        TypeTag::OpaqueFigure => DisplayValue::Figure(value.clone()),
        TypeTag::String
        | TypeTag::Integer
        | TypeTag::Float
        | TypeTag::Boolean
        | TypeTag::Date
        | TypeTag::StringList
        | TypeTag::ObjectMap
        | TypeTag::StructuredRecord
        | TypeTag::Unknown => DisplayValue::Text(value_to_text(value)),
    };

    Some(display)
}

/// Human-readable text form of a JSON value. Strings come back
/// unquoted; containers pretty-print.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Tabular payloads are arrays of row objects. Anything else renders
/// as an empty grid.
fn extract_rows(value: &Value) -> Vec<Map<String, Value>> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.as_object().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_input_is_omitted_except_boolean() {
        assert_eq!(parse_input("", TypeTag::String), None);
        assert_eq!(parse_input("", TypeTag::Integer), None);
        assert_eq!(parse_input("", TypeTag::Date), None);
        assert_eq!(parse_input("", TypeTag::Boolean), Some(json!(false)));
    }

    #[test]
    fn test_malformed_numbers_degrade_to_zero() {
        assert_eq!(parse_input("abc", TypeTag::Integer), Some(json!(0)));
        assert_eq!(parse_input("abc", TypeTag::Float), Some(json!(0.0)));
        assert_eq!(parse_input("3.5", TypeTag::Integer), Some(json!(0)));
    }

    #[test]
    fn test_well_formed_numbers_parse() {
        assert_eq!(parse_input(" 42 ", TypeTag::Integer), Some(json!(42)));
        assert_eq!(parse_input("-7", TypeTag::Integer), Some(json!(-7)));
        assert_eq!(parse_input("2.5", TypeTag::Float), Some(json!(2.5)));
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(parse_input("true", TypeTag::Boolean), Some(json!(true)));
        assert_eq!(parse_input("false", TypeTag::Boolean), Some(json!(false)));
        // Any other non-empty marker means checked.
        assert_eq!(parse_input("on", TypeTag::Boolean), Some(json!(true)));
    }

    #[test]
    fn test_malformed_date_degrades_to_today() {
        let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
        assert_eq!(
            parse_input("not-a-date", TypeTag::Date),
            Some(Value::String(today))
        );
        assert_eq!(
            parse_input("2024-06-01", TypeTag::Date),
            Some(json!("2024-06-01"))
        );
    }

    #[test]
    fn test_json_collections_degrade_to_empty() {
        assert_eq!(parse_input("not json", TypeTag::StringList), Some(json!([])));
        assert_eq!(parse_input("not json", TypeTag::ObjectMap), Some(json!({})));
        // A JSON scalar is not an acceptable collection either.
        assert_eq!(parse_input("42", TypeTag::StringList), Some(json!([])));
        assert_eq!(parse_input("42", TypeTag::ObjectMap), Some(json!({})));
    }

    #[test]
    fn test_well_formed_json_collections_parse() {
        assert_eq!(
            parse_input(r#"["a","b"]"#, TypeTag::StringList),
            Some(json!(["a", "b"]))
        );
        assert_eq!(
            parse_input(r#"{"a":1}"#, TypeTag::ObjectMap),
            Some(json!({"a": 1}))
        );
    }

    #[test]
    fn test_structured_record_omitted_on_failure() {
        assert_eq!(parse_input("not json", TypeTag::StructuredRecord), None);
        assert_eq!(parse_input("[1,2]", TypeTag::StructuredRecord), None);
        assert_eq!(
            parse_input(r#"{"a":1}"#, TypeTag::StructuredRecord),
            Some(json!({"a": 1}))
        );
    }

    #[test]
    fn test_missing_output_clears_widget_except_string() {
        assert_eq!(
            format_output(None, TypeTag::String),
            Some(DisplayValue::Text(String::new()))
        );
        assert_eq!(format_output(None, TypeTag::Integer), None);
        assert_eq!(format_output(None, TypeTag::OpaqueFigure), None);
        assert_eq!(format_output(Some(&Value::Null), TypeTag::Integer), None);
    }

    #[test]
    fn test_scalar_outputs_format_as_text() {
        assert_eq!(
            format_output(Some(&json!(4)), TypeTag::Integer),
            Some(DisplayValue::Text("4".to_string()))
        );
        assert_eq!(
            format_output(Some(&json!("hello")), TypeTag::String),
            Some(DisplayValue::Text("hello".to_string()))
        );
        assert_eq!(
            format_output(Some(&json!(true)), TypeTag::Boolean),
            Some(DisplayValue::Text("true".to_string()))
        );
    }

    #[test]
    fn test_container_outputs_pretty_print() {
        let out = format_output(Some(&json!({"a": 1})), TypeTag::ObjectMap);
        match out {
            Some(DisplayValue::Text(text)) => {
                assert!(text.contains("\"a\": 1"));
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_url_output_becomes_image_source() {
        assert_eq!(
            format_output(Some(&json!("https://example.com/x.png")), TypeTag::Url),
            Some(DisplayValue::Image("https://example.com/x.png".to_string()))
        );
    }

    #[test]
    fn test_tabular_output_extracts_row_objects() {
        let table = json!([
            {"Category": "A", "Value": 10},
            {"Category": "B", "Value": 20},
        ]);
        match format_output(Some(&table), TypeTag::OpaqueTabular) {
            Some(DisplayValue::Rows(rows)) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0]["Category"], json!("A"));
            }
            other => panic!("expected rows, got {other:?}"),
        }

        // Non-array tabular payloads render as an empty grid.
        assert_eq!(
            format_output(Some(&json!("oops")), TypeTag::OpaqueTabular),
            Some(DisplayValue::Rows(Vec::new()))
        );
    }

    #[test]
    fn test_figure_output_passes_through() {
        let fig = json!({"data": [{"x": [1], "y": [2]}]});
        assert_eq!(
            format_output(Some(&fig), TypeTag::OpaqueFigure),
            Some(DisplayValue::Figure(fig))
        );
    }
}
