//! Literal values and schema facets attached to attributes.

use serde::{Deserialize, Serialize};

/// A literal default value declared by the schema.
///
/// Deserializes from plain JSON/YAML scalars and sequences, so a model file
/// can write `default: 3` or `default: []`.
///
/// ## Examples
///
/// ```
/// use accessory_define::Literal;
///
/// let lit: Literal = serde_json::from_str("[]").unwrap();
/// assert_eq!(lit, Literal::List(vec![]));
/// assert!(lit.is_list());
///
/// let lit: Literal = serde_json::from_str("\"abc\"").unwrap();
/// assert_eq!(lit, Literal::Str("abc".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
}

impl Literal {
    /// The empty sequence, default of every array attribute.
    pub fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// Schema facets restricting the values of an attribute.
///
/// Every facet is optional; an attribute without facets has
/// `Facets::default()`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Facets {
    /// Regular expression the whole value must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Exact character count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_inclusive: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_inclusive: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_exclusive: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_exclusive: Option<f64>,
}

impl Facets {
    /// Returns `true` if no facet is declared.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
