//! Plan descriptors produced by the planner.
//!
//! A [`StructPlan`] lists the properties and methods of one generated
//! struct. Method bodies are ordered [`Statement`]s over [`Expr`]essions, a
//! small language both the evaluator and the code emitter interpret. Method
//! kinds are fixed when a descriptor is created and never derived from the
//! method name.

use accessory::{Comparison, ScalarType, Value};
use accessory_define::Literal;
use strum::{Display, EnumIter, EnumString};

use crate::planner::docs::Documentation;

/// Kind of a generated method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum MethodKind {
    Constructor,
    Getter,
    Setter,
    AddTo,
    StateRestore,
}

/// Declared type of a parameter or property, for signatures and docs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    /// A single value of the named type.
    Value(String),
    /// A sequence of values of the named element type.
    List(String),
    /// A boolean switch.
    Flag,
    /// An exported field to value mapping.
    State,
}

impl TypeHint {
    pub fn label(&self) -> String {
        match self {
            Self::Value(name) => name.clone(),
            Self::List(name) => format!("{name}[]"),
            Self::Flag => "bool".to_string(),
            Self::State => "state".to_string(),
        }
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeHint,
    pub default: Option<Literal>,
    /// The caller may omit the argument.
    pub optional: bool,
}

/// A stored field: its clean key and, when the raw name differs, the raw
/// shadow key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub name: String,
    pub shadow: Option<String>,
}

impl FieldRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shadow: None,
        }
    }

    pub fn with_shadow(mut self, raw: impl Into<String>) -> Self {
        self.shadow = Some(raw.into());
        self
    }
}

/// A property of the generated struct.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub raw_name: String,
    pub field: FieldRef,
    pub ty: TypeHint,
    /// Value the field is seeded with. `None` seeds null.
    pub default: Option<Literal>,
    pub documentation: Documentation,
    /// Position of the attribute in its struct.
    pub attribute: usize,
}

/// A generated method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub kind: MethodKind,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
    pub documentation: Documentation,
    /// Attribute the method serves; `None` for constructor and restore.
    pub attribute: Option<usize>,
}

impl MethodDescriptor {
    /// Returns `true` if the body writes to the record.
    pub fn mutates(&self) -> bool {
        fn writes(statements: &[Statement]) -> bool {
            statements.iter().any(|s| match s {
                Statement::Assign { .. } | Statement::Unset(_) | Statement::Append { .. } => true,
                Statement::If {
                    then, otherwise, ..
                } => writes(then) || writes(otherwise),
                _ => false,
            })
        }
        writes(&self.body)
    }

    /// Every check guarding this method, in evaluation order.
    pub fn checks(&self) -> Vec<&Check> {
        self.body
            .iter()
            .filter_map(|s| match s {
                Statement::Guard(validation) => Some(validation.checks()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

/// The plan of one struct.
#[derive(Debug, Clone, PartialEq)]
pub struct StructPlan {
    pub name: String,
    pub packaged_name: String,
    pub parent: Option<String>,
    pub documentation: Documentation,
    pub properties: Vec<PropertyDescriptor>,
    pub methods: Vec<MethodDescriptor>,
}

impl StructPlan {
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn methods_of(&self, kind: MethodKind) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(move |m| m.kind == kind)
    }

    /// Field keys of every property, in declared order.
    pub fn fields(&self) -> Vec<&FieldRef> {
        self.properties.iter().map(|p| &p.field).collect()
    }
}

/// One statement of a method body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Fails the call with the first failing check's message.
    Guard(Validation),
    /// Binds a local value.
    Let { name: String, value: Expr },
    /// Writes a field and its shadow slot.
    Assign { field: FieldRef, value: Expr },
    /// Removes a field and its shadow slot.
    Unset(FieldRef),
    /// Appends to a sequence field.
    Append { field: FieldRef, value: Expr },
    If {
        condition: Expr,
        then: Vec<Statement>,
        otherwise: Vec<Statement>,
    },
    /// Routes a constructor argument through a setter. An optional argument
    /// the caller omitted is skipped.
    Apply {
        setter: String,
        argument: String,
        optional: bool,
    },
    /// Rebuilds the instance from the named state parameter.
    Restore { state: String },
    Return(Expr),
}

/// A guard over a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Checks run in order; the first failing one wins.
    Chain(Vec<Check>),
    /// Runs `checks` against every item of the sequence bound to `subject`,
    /// with each item bound to `binding`. Non-sequences are skipped.
    EachItem {
        subject: String,
        binding: String,
        checks: Vec<Check>,
    },
}

impl Validation {
    pub fn checks(&self) -> &[Check] {
        match self {
            Self::Chain(checks) | Self::EachItem { checks, .. } => checks,
        }
    }
}

/// A single rule check: `condition` is true when the value is invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    /// Name of the rule that produced the check.
    pub rule: &'static str,
    pub condition: Expr,
    pub message: Message,
}

/// Expressions over parameters, locals and stored fields.
///
/// Predicate variants evaluate to booleans; the rest to values.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A parameter or local binding.
    Var(String),
    /// A boolean parameter.
    Flag(String),
    /// A stored field; reading an absent field fails.
    Field(FieldRef),
    /// A stored field, null when absent.
    FieldOrNull(FieldRef),
    Literal(Literal),
    Null,
    /// The instance itself, for fluent returns.
    SelfRef,
    IsNull(Box<Expr>),
    IsList(Box<Expr>),
    IsEmpty(Box<Expr>),
    IsXmlDocument(Box<Expr>),
    HasXmlContent(Box<Expr>),
    IsPresent(FieldRef),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Conforms(Box<Expr>, ScalarType),
    Compare(Box<Expr>, Comparison, f64),
    LengthCompare(Box<Expr>, Comparison, usize),
    MatchesPattern(Box<Expr>, String),
    OneOf(Box<Expr>, Vec<String>),
    /// Any of the fields holds a non-null value.
    AnySet(Vec<FieldRef>),
    /// None of the branches has all of its checks passing.
    NoBranchPasses(Vec<Vec<Check>>),
    JoinList(Box<Expr>, String),
    SerializeXml(Box<Expr>),
    ParseXml(Box<Expr>),
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    pub fn not(inner: Expr) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn is_null(inner: Expr) -> Self {
        Self::IsNull(Box::new(inner))
    }

    pub fn not_null(inner: Expr) -> Self {
        Self::not(Self::is_null(inner))
    }

    pub fn conditional(condition: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// Returns `true` for variants that evaluate to a boolean.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            Self::Flag(_)
                | Self::IsNull(_)
                | Self::IsList(_)
                | Self::IsEmpty(_)
                | Self::IsXmlDocument(_)
                | Self::HasXmlContent(_)
                | Self::IsPresent(_)
                | Self::Not(_)
                | Self::And(_)
                | Self::Or(_)
                | Self::Conforms(..)
                | Self::Compare(..)
                | Self::LengthCompare(..)
                | Self::MatchesPattern(..)
                | Self::OneOf(..)
                | Self::AnySet(_)
                | Self::NoBranchPasses(_)
        )
    }
}

/// A failure message assembled at run time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    pub parts: Vec<MessagePart>,
}

/// A piece of a failure message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePart {
    Text(String),
    /// Literal description of a value.
    Describe(Expr),
    /// Runtime type name of a value.
    TypeOf(Expr),
    /// Character count of a value.
    Length(Expr),
    /// Name of the first set field among these.
    FirstSet(Vec<FieldRef>),
    /// First failure of every failing branch, each on its own ` - ` line.
    BranchFailures(Vec<Vec<Check>>),
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(MessagePart::Text(text.into()));
        self
    }

    pub fn describe(mut self, subject: &Expr) -> Self {
        self.parts.push(MessagePart::Describe(subject.clone()));
        self
    }

    pub fn type_of(mut self, subject: &Expr) -> Self {
        self.parts.push(MessagePart::TypeOf(subject.clone()));
        self
    }

    pub fn length(mut self, subject: &Expr) -> Self {
        self.parts.push(MessagePart::Length(subject.clone()));
        self
    }

    pub fn first_set(mut self, fields: Vec<FieldRef>) -> Self {
        self.parts.push(MessagePart::FirstSet(fields));
        self
    }

    pub fn branch_failures(mut self, branches: Vec<Vec<Check>>) -> Self {
        self.parts.push(MessagePart::BranchFailures(branches));
        self
    }
}

/// Converts a declared literal into a runtime value.
pub fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::List(items) => Value::List(items.iter().map(literal_value).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_values_convert_recursively() {
        let lit = Literal::List(vec![Literal::Int(1), Literal::Str("a".to_string())]);
        assert_eq!(literal_value(&lit), Value::from(vec![Value::from(1), Value::from("a")]));
    }

    #[test]
    fn type_hint_labels() {
        assert_eq!(TypeHint::List("string".to_string()).label(), "string[]");
        assert_eq!(TypeHint::Flag.label(), "bool");
    }

    #[test]
    fn mutation_is_detected_in_nested_branches() {
        let method = MethodDescriptor {
            kind: MethodKind::Getter,
            name: "getX".to_string(),
            parameters: vec![],
            body: vec![Statement::If {
                condition: Expr::Flag("f".to_string()),
                then: vec![Statement::Unset(FieldRef::new("x"))],
                otherwise: vec![],
            }],
            documentation: Documentation::default(),
            attribute: Some(0),
        };
        assert!(method.mutates());
        assert!(method.checks().is_empty());
    }
}
