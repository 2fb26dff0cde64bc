//! Guard predicates and value conversions used by generated accessors.
//!
//! Every predicate here answers a "does the value satisfy" question; the
//! generated guards negate them to decide when a value is invalid. None of
//! them fail: a value of the wrong shape simply does not satisfy.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use regex::Regex;
use strum::{Display, EnumIter, EnumString};
use tracing::trace;

use crate::record::{FieldKey, Record};
use crate::value::Value;
use crate::xml;

/// Base scalar types a value can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum ScalarType {
    /// Integer types. Conformance is the numeric test, so floats and
    /// numeric strings such as `"1e3"` pass too.
    #[strum(serialize = "int")]
    Integer,
    /// Any number or numeric string.
    #[strum(serialize = "float")]
    Decimal,
    #[strum(serialize = "bool")]
    Boolean,
    #[strum(serialize = "string")]
    Text,
}

impl ScalarType {
    /// Expectation phrase used in guard messages.
    pub fn expectation(&self) -> &'static str {
        match self {
            Self::Integer | Self::Decimal => "a numeric value",
            Self::Boolean => "a bool value",
            Self::Text => "a string value",
        }
    }
}

/// Comparison operator for range and length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Comparison {
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessOrEqual,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterOrEqual,
    #[strum(serialize = "==")]
    Equal,
}

impl Comparison {
    /// Applies the operator as `left op right`.
    pub fn holds(&self, left: f64, right: f64) -> bool {
        match self {
            Self::Less => left < right,
            Self::LessOrEqual => left <= right,
            Self::Greater => left > right,
            Self::GreaterOrEqual => left >= right,
            Self::Equal => left == right,
        }
    }
}

pub fn is_null(value: &Value) -> bool {
    value.is_null()
}

pub fn is_list(value: &Value) -> bool {
    matches!(value, Value::List(_))
}

/// Empty sequence or empty string.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::List(items) => items.is_empty(),
        Value::Str(s) => s.is_empty(),
        _ => false,
    }
}

pub fn is_xml_document(value: &Value) -> bool {
    matches!(value, Value::Xml(_))
}

/// Returns `true` for an XML document holding at least one node.
pub fn has_xml_content(value: &Value) -> bool {
    value.as_xml().is_some_and(xml::XmlDocument::has_content)
}

/// Returns `true` if the value is of the given scalar type. Null never conforms.
pub fn conforms(value: &Value, ty: ScalarType) -> bool {
    match ty {
        ScalarType::Integer | ScalarType::Decimal => value.is_numeric(),
        ScalarType::Boolean => matches!(value, Value::Bool(_)),
        ScalarType::Text => matches!(value, Value::Str(_)),
    }
}

/// Returns `true` if the numeric view of `value` satisfies `value op bound`.
/// Non-numeric values never satisfy.
pub fn compare(value: &Value, op: Comparison, bound: f64) -> bool {
    value.as_f64().is_some_and(|v| op.holds(v, bound))
}

/// Character count of the value's text form. Null and sequences have none.
pub fn char_length(value: &Value) -> Option<usize> {
    match value {
        Value::Null | Value::List(_) | Value::Xml(_) => None,
        other => Some(other.to_text().chars().count()),
    }
}

/// Returns `true` if the character count satisfies `length op bound`.
pub fn length_compare(value: &Value, op: Comparison, bound: usize) -> bool {
    char_length(value).is_some_and(|len| op.holds(len as f64, bound as f64))
}

/// Returns `true` if the whole text form of the value matches `pattern`.
///
/// Patterns are checked when code is generated, so an invalid pattern here
/// only means the value does not match.
pub fn matches_pattern(value: &Value, pattern: &str) -> bool {
    if char_length(value).is_none() {
        return false;
    }
    compiled_pattern(pattern).is_some_and(|re| re.is_match(&value.to_text()))
}

/// Anchored patterns compiled so far; `None` marks a pattern that does not
/// compile.
static PATTERNS: LazyLock<Mutex<HashMap<String, Option<Regex>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Compiles `pattern` once per process.
fn compiled_pattern(pattern: &str) -> Option<Regex> {
    let mut patterns = PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(compiled) = patterns.get(pattern) {
        return compiled.clone();
    }
    let compiled = match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(re) => Some(re),
        Err(err) => {
            trace!(pattern, error = %err, "pattern does not compile");
            None
        }
    };
    patterns.insert(pattern.to_string(), compiled.clone());
    compiled
}

/// Returns `true` if the value's text form is one of the allowed values.
pub fn one_of(value: &Value, allowed: &[&str]) -> bool {
    if char_length(value).is_none() {
        return false;
    }
    let text = value.to_text();
    allowed.iter().any(|candidate| *candidate == text)
}

/// Joins a sequence into one string. Anything else becomes null.
pub fn join_list(value: &Value, separator: &str) -> Value {
    match value {
        Value::List(items) => Value::Str(
            items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(separator),
        ),
        _ => Value::Null,
    }
}

/// Serializes the first child of a document. Other values, and documents
/// that fail to serialize, are returned unchanged.
pub fn serialize_xml(value: &Value) -> Value {
    match value {
        Value::Xml(doc) => match doc.serialize_first_child() {
            Ok(text) => Value::Str(text),
            Err(err) => {
                trace!(error = %err, "xml serialization failed, keeping document");
                value.clone()
            }
        },
        other => other.clone(),
    }
}

/// Materializes a stored string into a document. Null when the value is
/// not a string or does not parse.
pub fn parse_xml(value: &Value) -> Value {
    let Some(text) = value.as_str() else {
        return Value::Null;
    };
    match xml::parse(text) {
        Ok(doc) => Value::Xml(doc),
        Err(err) => {
            trace!(error = %err, "stored value is not an xml document");
            Value::Null
        }
    }
}

/// Returns `true` if any of the fields holds a non-null value.
pub fn any_set(record: &Record, keys: &[FieldKey<'_>]) -> bool {
    keys.iter().any(|key| record.is_set(key))
}

/// Name of the first field holding a non-null value, or an empty string.
pub fn first_set(record: &Record, keys: &[FieldKey<'_>]) -> String {
    keys.iter()
        .find(|key| record.is_set(key))
        .map(|key| key.name().to_string())
        .unwrap_or_default()
}

/// Comma separated field names, as listed in choice messages.
pub fn key_names(keys: &[FieldKey<'_>]) -> String {
    keys.iter().map(FieldKey::name).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn scalar_type_names_round_trip() {
        for ty in ScalarType::iter() {
            let parsed: ScalarType = ty.to_string().parse().unwrap();
            assert_eq!(parsed, ty);
        }
        assert_eq!(ScalarType::Integer.to_string(), "int");
    }

    #[test]
    fn conforms_checks_base_types() {
        assert!(conforms(&Value::from("12"), ScalarType::Integer));
        assert!(conforms(&Value::from(3.5), ScalarType::Integer));
        assert!(conforms(&Value::from("1e3"), ScalarType::Integer));
        assert!(!conforms(&Value::from("abc"), ScalarType::Integer));
        assert!(conforms(&Value::from("1.5"), ScalarType::Decimal));
        assert!(conforms(&Value::from(false), ScalarType::Boolean));
        assert!(!conforms(&Value::from(1), ScalarType::Text));
        assert!(!conforms(&Value::Null, ScalarType::Text));
    }

    #[test]
    fn compare_and_length_bounds() {
        assert!(compare(&Value::from(5), Comparison::GreaterOrEqual, 5.0));
        assert!(!compare(&Value::from(5), Comparison::Less, 5.0));
        assert!(!compare(&Value::from("x"), Comparison::Less, 5.0));
        assert!(length_compare(&Value::from("héllo"), Comparison::Equal, 5));
        assert!(!length_compare(&Value::Null, Comparison::LessOrEqual, 5));
    }

    #[test]
    fn pattern_is_anchored() {
        assert!(matches_pattern(&Value::from("ab12"), "[a-z]+[0-9]+"));
        assert!(!matches_pattern(&Value::from("ab12x"), "[a-z]+[0-9]+"));
        assert!(!matches_pattern(&Value::from("a"), "("));
    }

    #[test]
    fn patterns_compile_once() {
        let pattern = "[x-z]{3}";
        assert!(matches_pattern(&Value::from("xyz"), pattern));
        assert!(!matches_pattern(&Value::from("xy"), pattern));

        let patterns = PATTERNS.lock().unwrap();
        assert!(patterns.get(pattern).is_some_and(Option::is_some));
        assert!(!patterns.contains_key("^(?:[x-z]{3})$"));
    }

    #[test]
    fn broken_patterns_are_remembered() {
        assert!(!matches_pattern(&Value::from("a"), "[unclosed"));
        assert!(!matches_pattern(&Value::from("b"), "[unclosed"));
        let patterns = PATTERNS.lock().unwrap();
        assert!(matches!(patterns.get("[unclosed"), Some(None)));
    }

    #[test]
    fn one_of_compares_text_forms() {
        assert!(one_of(&Value::from("red"), &["red", "blue"]));
        assert!(one_of(&Value::from(2), &["1", "2"]));
        assert!(!one_of(&Value::from("green"), &["red", "blue"]));
    }

    #[test]
    fn join_list_nulls_non_sequences() {
        assert_eq!(join_list(&Value::from(vec!["a", "b"]), " "), Value::from("a b"));
        assert_eq!(join_list(&Value::from("a"), " "), Value::Null);
        assert_eq!(join_list(&Value::Null, " "), Value::Null);
    }

    #[test]
    fn xml_conversions() {
        let parsed = parse_xml(&Value::from("<a>1</a>"));
        assert!(has_xml_content(&parsed));
        assert_eq!(serialize_xml(&parsed), Value::from("<a>1</a>"));
        assert_eq!(parse_xml(&Value::from("not xml")), Value::Null);
        assert_eq!(serialize_xml(&Value::from("text")), Value::from("text"));
    }

    #[test]
    fn choice_helpers_report_first_set_sibling() {
        let a = FieldKey::new("a");
        let b = FieldKey::new("b");
        let mut record = Record::new();
        assert!(!any_set(&record, &[a, b]));
        record.assign(&b, Value::from(1));
        assert!(any_set(&record, &[a, b]));
        assert_eq!(first_set(&record, &[a, b]), "b");
        assert_eq!(key_names(&[a, b]), "a, b");
    }
}
