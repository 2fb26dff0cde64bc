//! Validation rules embedded in generated setters.
//!
//! [`Rule`] is a closed set of variants. Each variant produces the
//! condition under which a value is INVALID and the message reported when
//! it is, both expressed against a named parameter. Every rule lets null
//! through; nullability is the business of the setter, not of the guards.
//!
//! ## Examples
//!
//! ```
//! use accessory_gen::rules::{NumericKind, Rule};
//!
//! let rule = Rule::Numeric(NumericKind::Integer);
//! assert_eq!(rule.name(), "int");
//!
//! let check = rule.check("id");
//! assert_eq!(check.rule, "int");
//! ```

use accessory::{Comparison, ScalarType};

use crate::ir::{Check, Expr, FieldRef, Message};

/// Numeric base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// Integer types, checked with the numeric test.
    Integer,
    /// Any number or numeric string.
    Decimal,
}

/// Numeric range facets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeFacet {
    MinInclusive(f64),
    MaxInclusive(f64),
    MinExclusive(f64),
    MaxExclusive(f64),
}

impl RangeFacet {
    /// Comparison the value must satisfy against the bound.
    fn requirement(&self) -> (Comparison, f64, &'static str) {
        match *self {
            Self::MinInclusive(b) => (Comparison::GreaterOrEqual, b, "greater than or equal to"),
            Self::MaxInclusive(b) => (Comparison::LessOrEqual, b, "less than or equal to"),
            Self::MinExclusive(b) => (Comparison::Greater, b, "strictly greater than"),
            Self::MaxExclusive(b) => (Comparison::Less, b, "strictly less than"),
        }
    }
}

/// Character count facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthFacet {
    Min(usize),
    Max(usize),
    Exact(usize),
}

impl LengthFacet {
    fn requirement(&self) -> (Comparison, usize, &'static str) {
        match *self {
            Self::Min(n) => (Comparison::GreaterOrEqual, n, "greater than or equal to"),
            Self::Max(n) => (Comparison::LessOrEqual, n, "less than or equal to"),
            Self::Exact(n) => (Comparison::Equal, n, "equal to"),
        }
    }
}

/// One member of a union: its type label and the rules a value must pass
/// to be accepted as that member.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionBranch {
    pub label: String,
    pub rules: Vec<Rule>,
}

/// A validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Numeric(NumericKind),
    Boolean,
    Text,
    Range(RangeFacet),
    StringLength(LengthFacet),
    /// Regular expression the whole value must match.
    Pattern(String),
    Enumeration {
        restriction: String,
        values: Vec<String>,
    },
    /// At most one field of a choice group may hold a value.
    ChoiceExclusivity {
        /// Property being set.
        property: String,
        /// Every other field of the group.
        siblings: Vec<FieldRef>,
    },
    /// The value must pass every rule of at least one branch.
    Union { branches: Vec<UnionBranch> },
}

impl Rule {
    /// Base type rule for a scalar type.
    pub fn for_scalar(ty: ScalarType) -> Self {
        match ty {
            ScalarType::Integer => Self::Numeric(NumericKind::Integer),
            ScalarType::Decimal => Self::Numeric(NumericKind::Decimal),
            ScalarType::Boolean => Self::Boolean,
            ScalarType::Text => Self::Text,
        }
    }

    /// Identifying tag of the rule.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Numeric(NumericKind::Integer) => "int",
            Self::Numeric(NumericKind::Decimal) => "float",
            Self::Boolean => "bool",
            Self::Text => "string",
            Self::Range(RangeFacet::MinInclusive(_)) => "minInclusive",
            Self::Range(RangeFacet::MaxInclusive(_)) => "maxInclusive",
            Self::Range(RangeFacet::MinExclusive(_)) => "minExclusive",
            Self::Range(RangeFacet::MaxExclusive(_)) => "maxExclusive",
            Self::StringLength(LengthFacet::Min(_)) => "minLength",
            Self::StringLength(LengthFacet::Max(_)) => "maxLength",
            Self::StringLength(LengthFacet::Exact(_)) => "length",
            Self::Pattern(_) => "pattern",
            Self::Enumeration { .. } => "enumeration",
            Self::ChoiceExclusivity { .. } => "choice",
            Self::Union { .. } => "union",
        }
    }

    /// Condition that holds exactly when the value of `parameter` is invalid.
    pub fn test_condition(&self, parameter: &str) -> Expr {
        let value = Expr::var(parameter);
        let boxed = || Box::new(Expr::var(parameter));
        let violated = match self {
            Self::Numeric(kind) => {
                let ty = match kind {
                    NumericKind::Integer => ScalarType::Integer,
                    NumericKind::Decimal => ScalarType::Decimal,
                };
                Expr::not(Expr::Conforms(boxed(), ty))
            }
            Self::Boolean => Expr::not(Expr::Conforms(boxed(), ScalarType::Boolean)),
            Self::Text => Expr::not(Expr::Conforms(boxed(), ScalarType::Text)),
            Self::Range(facet) => {
                let (op, bound, _) = facet.requirement();
                Expr::not(Expr::Compare(boxed(), op, bound))
            }
            Self::StringLength(facet) => {
                let (op, bound, _) = facet.requirement();
                Expr::not(Expr::LengthCompare(boxed(), op, bound))
            }
            Self::Pattern(pattern) => Expr::not(Expr::MatchesPattern(boxed(), pattern.clone())),
            Self::Enumeration { values, .. } => Expr::not(Expr::OneOf(boxed(), values.clone())),
            Self::ChoiceExclusivity { siblings, .. } => Expr::AnySet(siblings.clone()),
            Self::Union { branches } => Expr::NoBranchPasses(branch_checks(branches, parameter)),
        };
        Expr::And(vec![Expr::not_null(value), violated])
    }

    /// Message reported when the value of `parameter` is invalid.
    pub fn failure_message(&self, parameter: &str) -> Message {
        let value = Expr::var(parameter);
        match self {
            Self::Numeric(_) => invalid_value(&value, "please provide a numeric value"),
            Self::Boolean => invalid_value(&value, "please provide a bool value"),
            Self::Text => invalid_value(&value, "please provide a string value"),
            Self::Range(facet) => {
                let (_, bound, phrase) = facet.requirement();
                invalid_value(
                    &value,
                    &format!("the value must be numerically {phrase} {}", format_bound(bound)),
                )
            }
            Self::StringLength(facet) => {
                let (_, bound, phrase) = facet.requirement();
                Message::new()
                    .text("Invalid length of ")
                    .length(&value)
                    .text(" for value ")
                    .describe(&value)
                    .text(format!(
                        ", the number of characters contained by the literal must be {phrase} {bound}, "
                    ))
                    .type_of(&value)
                    .text(" given")
            }
            Self::Pattern(pattern) => invalid_value(
                &value,
                &format!("please provide a literal that is valid according to the pattern {pattern}"),
            ),
            Self::Enumeration {
                restriction,
                values,
            } => invalid_value(
                &value,
                &format!(
                    "please use one of: {} from enumeration {restriction}",
                    values.join(", ")
                ),
            ),
            Self::ChoiceExclusivity { property, siblings } => {
                let mut group: Vec<&str> = vec![property.as_str()];
                group.extend(siblings.iter().map(|s| s.name.as_str()));
                Message::new()
                    .text(format!("The property {property} can't be set to "))
                    .describe(&value)
                    .text(" (")
                    .type_of(&value)
                    .text(") as the property ")
                    .first_set(siblings.clone())
                    .text(format!(
                        " is already set. Only one property must be set among these properties: {}.",
                        group.join(", ")
                    ))
            }
            Self::Union { branches } => {
                let labels: Vec<&str> = branches.iter().map(|b| b.label.as_str()).collect();
                Message::new()
                    .text("The value ")
                    .describe(&value)
                    .text(" (")
                    .type_of(&value)
                    .text(format!(
                        ") does not match any of the union rules: {}. See following errors:",
                        labels.join(", ")
                    ))
                    .branch_failures(branch_checks(branches, parameter))
            }
        }
    }

    /// Condition and message together.
    pub fn check(&self, parameter: &str) -> Check {
        Check {
            rule: self.name(),
            condition: self.test_condition(parameter),
            message: self.failure_message(parameter),
        }
    }
}

/// Checks of every branch, each against `parameter`.
fn branch_checks(branches: &[UnionBranch], parameter: &str) -> Vec<Vec<Check>> {
    branches
        .iter()
        .map(|branch| branch.rules.iter().map(|r| r.check(parameter)).collect())
        .collect()
}

/// `Invalid value <v>, <expectation>, <type> given`
fn invalid_value(value: &Expr, expectation: &str) -> Message {
    Message::new()
        .text("Invalid value ")
        .describe(value)
        .text(format!(", {expectation}, "))
        .type_of(value)
        .text(" given")
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}
