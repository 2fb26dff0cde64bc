//! Dynamic values held by generated records.

use std::fmt;

use crate::xml::XmlDocument;

/// A value stored in, or passed to, a generated accessor.
///
/// Generated structs are backed by a [`Record`](crate::Record) of `Value`s,
/// so a single type covers scalar attributes, array-backed attributes (the
/// `List` variant before the setter joins it) and XML-backed attributes.
///
/// ## Examples
///
/// ```rust
/// use accessory::Value;
///
/// let tags = Value::from(vec!["a", "b"]);
/// assert_eq!(tags.type_name(), "list");
/// assert_eq!(tags.describe(), "['a', 'b']");
///
/// assert_eq!(Value::from(42).describe(), "42");
/// assert!(Value::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The null marker.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// A sequence of values.
    List(Vec<Value>),
    /// A structured XML document.
    Xml(XmlDocument),
}

impl Value {
    /// Returns `true` for the null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the items if this is a sequence.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the document if this is an XML document.
    pub fn as_xml(&self) -> Option<&XmlDocument> {
        match self {
            Self::Xml(doc) => Some(doc),
            _ => None,
        }
    }

    /// Numeric view of the value: integers, floats and numeric strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) if f.is_finite() => Some(*f),
            Self::Str(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Returns `true` if [`as_f64`](Self::as_f64) yields a number.
    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }

    /// Runtime type of the value, as reported in guard messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Xml(_) => "xml document",
        }
    }

    /// Literal description of the value, as reported in guard messages.
    ///
    /// Strings are single-quoted with embedded quotes escaped, sequences are
    /// bracketed and documents are shown with their serialized form.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format!("{f:?}"),
            Self::Str(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Self::List(items) => {
                let inner: Vec<String> = items.iter().map(Value::describe).collect();
                format!("[{}]", inner.join(", "))
            }
            Self::Xml(doc) => format!("xml({})", doc.to_xml_string().unwrap_or_default()),
        }
    }

    /// Plain text form of the value: the string itself, the number, or the
    /// space-joined text of a sequence. Null is the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Str(s) => s.clone(),
            Self::List(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(" "),
            Self::Xml(doc) => doc.to_xml_string().unwrap_or_default(),
        }
    }

    /// Interprets the value as a flag: null, `false`, zero, `""` and empty
    /// sequences are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Xml(doc) => doc.has_content(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<XmlDocument> for Value {
    fn from(value: XmlDocument) -> Self {
        Self::Xml(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_quotes_strings_and_escapes() {
        assert_eq!(Value::from("it's").describe(), r"'it\'s'");
        assert_eq!(Value::Null.describe(), "null");
        assert_eq!(Value::from(1.5).describe(), "1.5");
        assert_eq!(Value::from(vec![1, 2]).describe(), "[1, 2]");
    }

    #[test]
    fn numeric_accepts_numbers_and_numeric_strings() {
        assert!(Value::from(3).is_numeric());
        assert!(Value::from(3.5).is_numeric());
        assert!(Value::from(" 12 ").is_numeric());
        assert!(Value::from("1e3").is_numeric());
        assert!(!Value::from("abc").is_numeric());
        assert!(!Value::from(f64::NAN).is_numeric());
        assert!(!Value::Null.is_numeric());
    }

    #[test]
    fn numeric_view_covers_numeric_strings() {
        assert_eq!(Value::from("2.5").as_f64(), Some(2.5));
        assert_eq!(Value::from(true).as_f64(), None);
        assert_eq!(Value::from(f64::NAN).as_f64(), None);
    }

    #[test]
    fn to_text_joins_sequences_with_spaces() {
        assert_eq!(Value::from(vec!["a", "b", "c"]).to_text(), "a b c");
        assert_eq!(Value::Null.to_text(), "");
    }

    #[test]
    fn option_conversion_maps_none_to_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn type_names_are_stable() {
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::from(1).type_name(), "int");
        assert_eq!(Value::from(vec![Value::Null]).type_name(), "list");
        assert_eq!(Value::Xml(XmlDocument::new()).type_name(), "xml document");
    }
}
