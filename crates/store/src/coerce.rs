//! Loose scalar coercion for persisted blobs.
//!
//! Blobs may have been written by older releases or edited by hand, so field
//! values are read leniently: numbers may arrive as strings, text as numbers.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Parse a decimal, accepting surrounding whitespace and `1e3` notation.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Strings as-is, numbers and booleans printed, anything else empty.
pub(crate) fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Like [`text`], but `None` for a missing or `null` field.
pub(crate) fn optional_text(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        other => Some(text(other)),
    }
}

/// `null`, `false` and blank strings count as zero; a missing field, a
/// non-numeric string or a compound value is unreadable (`None`).
pub(crate) fn number(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Null => Some(Decimal::ZERO),
        Value::Bool(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        Value::String(s) if s.trim().is_empty() => Some(Decimal::ZERO),
        Value::String(s) => parse_decimal(s),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text() {
        assert_eq!(text(Some(&json!("a"))), "a");
        assert_eq!(text(Some(&json!(12))), "12");
        assert_eq!(text(Some(&json!(true))), "true");
        assert_eq!(text(Some(&json!(null))), "");
        assert_eq!(text(Some(&json!([1]))), "");
        assert_eq!(text(None), "");
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some(&json!(null))), None);
        assert_eq!(optional_text(Some(&json!(""))), Some(String::new()));
    }

    #[test]
    fn test_number() {
        assert_eq!(number(Some(&json!(3))), Some(Decimal::from(3)));
        assert_eq!(number(Some(&json!(" 2.5 "))), parse_decimal("2.5"));
        assert_eq!(number(Some(&json!(""))), Some(Decimal::ZERO));
        assert_eq!(number(Some(&json!(null))), Some(Decimal::ZERO));
        assert_eq!(number(Some(&json!(true))), Some(Decimal::ONE));
        assert_eq!(number(Some(&json!("abc"))), None);
        assert_eq!(number(Some(&json!({}))), None);
        assert_eq!(number(None), None);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1e3"), Some(Decimal::from(1000)));
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("Infinity"), None);
    }
}
