use chrono::NaiveDateTime;
use serde_json::{Number, Value};

use crate::errors::CoercionError;
use crate::field::FieldType;

/// Accepted wire format for date-typed fields, e.g. `01/15/2024 10:30:00 AM`.
const DATE_INPUT_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";
/// ISO calendar date, no time component.
const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Converts one raw external value into its typed internal form.
///
/// `Datetime` fields never reach this function; the decoder skips them
/// entirely because they belong to a downstream system.
pub fn coerce(raw: &Value, field_type: FieldType) -> Result<Value, CoercionError> {
    match field_type {
        FieldType::String => Ok(raw.clone()),
        FieldType::Number => coerce_number(raw),
        FieldType::Boolean => coerce_boolean(raw),
        FieldType::Date => coerce_date(raw),
        FieldType::Datetime => Err(CoercionError::invalid(
            "coercible value",
            "datetime fields are not handled here",
        )),
    }
}

fn coerce_number(raw: &Value) -> Result<Value, CoercionError> {
    match raw {
        Value::Number(n) => Ok(Value::Number(n.clone())),
        Value::String(s) => {
            let parsed: f64 = s
                .trim()
                .parse()
                .map_err(|_| CoercionError::invalid("number", &format!("unparseable: {s:?}")))?;
            Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| CoercionError::invalid("number", &format!("non-finite: {s:?}")))
        }
        other => Err(CoercionError::invalid(
            "number",
            &format!("unsupported transport type: {other}"),
        )),
    }
}

fn coerce_boolean(raw: &Value) -> Result<Value, CoercionError> {
    match raw {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Number(n) => {
            let truthy = n.as_f64().map(|f| f != 0.0).unwrap_or(true);
            Ok(Value::Bool(truthy))
        }
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "0" => Ok(Value::Bool(false)),
            other => Err(CoercionError::invalid(
                "boolean",
                &format!("unrecognized flag: {other:?}"),
            )),
        },
        other => Err(CoercionError::invalid(
            "boolean",
            &format!("unsupported transport type: {other}"),
        )),
    }
}

fn coerce_date(raw: &Value) -> Result<Value, CoercionError> {
    // A cleared value still participates: downstream consumers read the
    // empty string as "remove the date".
    if is_falsy(raw) {
        return Ok(Value::String(String::new()));
    }
    let text = raw.as_str().ok_or_else(|| {
        CoercionError::invalid("date", &format!("unsupported transport type: {raw}"))
    })?;
    let parsed = NaiveDateTime::parse_from_str(text.trim(), DATE_INPUT_FORMAT)
        .map_err(|err| CoercionError::invalid("date", &format!("{text:?}: {err}")))?;
    Ok(Value::String(
        parsed.date().format(DATE_OUTPUT_FORMAT).to_string(),
    ))
}

fn is_falsy(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_is_identity() {
        assert_eq!(
            coerce(&json!("as-is"), FieldType::String).unwrap(),
            json!("as-is")
        );
        assert_eq!(coerce(&json!(17), FieldType::String).unwrap(), json!(17));
    }

    #[test]
    fn number_parses_floats_without_truncation() {
        assert_eq!(
            coerce(&json!("3.5"), FieldType::Number).unwrap(),
            json!(3.5)
        );
        assert_eq!(coerce(&json!(2.25), FieldType::Number).unwrap(), json!(2.25));
        coerce(&json!("three"), FieldType::Number).expect_err("not numeric");
        coerce(&json!(true), FieldType::Number).expect_err("bool is not a number");
    }

    #[test]
    fn boolean_accepts_text_numeric_and_logical_forms() {
        assert_eq!(
            coerce(&json!("Yes"), FieldType::Boolean).unwrap(),
            json!(true)
        );
        assert_eq!(
            coerce(&json!("false"), FieldType::Boolean).unwrap(),
            json!(false)
        );
        assert_eq!(
            coerce(&json!("0"), FieldType::Boolean).unwrap(),
            json!(false)
        );
        assert_eq!(coerce(&json!(0), FieldType::Boolean).unwrap(), json!(false));
        assert_eq!(coerce(&json!(2), FieldType::Boolean).unwrap(), json!(true));
        assert_eq!(
            coerce(&json!(true), FieldType::Boolean).unwrap(),
            json!(true)
        );
        coerce(&json!("maybe"), FieldType::Boolean).expect_err("unrecognized flag");
    }

    #[test]
    fn date_reformats_to_iso_calendar_date() {
        assert_eq!(
            coerce(&json!("01/15/2024 10:30:00 AM"), FieldType::Date).unwrap(),
            json!("2024-01-15")
        );
        assert_eq!(
            coerce(&json!("12/31/2023 11:59:59 PM"), FieldType::Date).unwrap(),
            json!("2023-12-31")
        );
    }

    #[test]
    fn falsy_date_yields_empty_string_not_omission() {
        assert_eq!(coerce(&json!(""), FieldType::Date).unwrap(), json!(""));
        assert_eq!(
            coerce(&Value::Null, FieldType::Date).unwrap(),
            json!("")
        );
    }

    #[test]
    fn malformed_date_errors() {
        coerce(&json!("2024-01-15"), FieldType::Date).expect_err("wrong pattern");
        coerce(&json!("13/40/2024 10:30:00 AM"), FieldType::Date).expect_err("out of range");
    }
}
