//! Direct evaluation of struct plans.
//!
//! The [`Evaluator`] runs method bodies of a [`StructPlan`] against an
//! [`Instance`] without generating code. Guards, conversions and storage go
//! through the same `accessory` runtime helpers the emitted code calls, so
//! an evaluated plan behaves like the code generated from it.
//!
//! ## Examples
//!
//! ```
//! use accessory::Value;
//! use accessory_define::{Attribute, Model, Struct};
//! use accessory_gen::eval::{Evaluator, Returned};
//! use accessory_gen::options::GeneratorOptions;
//! use accessory_gen::planner::plan_struct;
//!
//! let person = Struct::new("Person").with_attribute(Attribute::new("id", "int"));
//! let model = Model::new().with_struct(person.clone());
//! let plan = plan_struct(&model, &person, &GeneratorOptions::default()).unwrap();
//!
//! let evaluator = Evaluator::new(&plan);
//! let mut person = evaluator.instantiate();
//! evaluator.call(&mut person, "setId", vec![Value::from(7)]).unwrap();
//! assert_eq!(
//!     evaluator.call(&mut person, "getId", vec![]).unwrap(),
//!     Returned::Value(Value::from(7))
//! );
//! assert!(evaluator.call(&mut person, "setId", vec![Value::from("seven")]).is_err());
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use accessory::{AccessorError, FieldKey, Record, Value, ops};
use thiserror::Error;
use tracing::{debug, trace};

use crate::ir::{
    Check, Expr, FieldRef, Message, MessagePart, MethodDescriptor, MethodKind, Statement,
    StructPlan, Validation, literal_value,
};

/// Errors raised while evaluating a plan.
#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("Unknown method '{0}'")]
    UnknownMethod(String),

    #[error("Method '{0}' cannot be called on an instance")]
    NotCallable(String),

    #[error("Missing argument '{parameter}' for method '{method}'")]
    MissingArgument { method: String, parameter: String },

    #[error("Method '{method}' takes {expected} argument(s), {given} given")]
    TooManyArguments {
        method: String,
        expected: usize,
        given: usize,
    },

    #[error("Unbound variable '{0}'")]
    UnboundVariable(String),

    #[error(transparent)]
    Accessor(#[from] AccessorError),
}

/// What a method call returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Returned {
    Value(Value),
    /// The instance itself, for chained calls.
    This,
}

impl Returned {
    /// The returned value; `None` for fluent returns.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::This => None,
        }
    }
}

/// A live instance of a planned struct.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Instance {
    record: Record,
}

impl Instance {
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Every stored field, raw shadow slots included.
    pub fn export(&self) -> BTreeMap<String, Value> {
        self.record.export()
    }
}

/// Local bindings of one method call.
#[derive(Debug, Default, Clone)]
struct Frame {
    vars: HashMap<String, Value>,
    /// Optional parameters the caller left out.
    omitted: HashSet<String>,
}

impl Frame {
    fn get(&self, name: &str) -> Result<&Value, EvalError> {
        self.vars
            .get(name)
            .ok_or_else(|| EvalError::UnboundVariable(name.to_string()))
    }
}

enum Flow {
    Continue,
    Return(Returned),
}

/// Runs the methods of one plan.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'p> {
    plan: &'p StructPlan,
}

impl<'p> Evaluator<'p> {
    pub fn new(plan: &'p StructPlan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &'p StructPlan {
        self.plan
    }

    /// A fresh instance with every field seeded from its default.
    pub fn instantiate(&self) -> Instance {
        let mut record = Record::new();
        for property in &self.plan.properties {
            let value = property
                .default
                .as_ref()
                .map(literal_value)
                .unwrap_or_default();
            record.assign(&key(&property.field), value);
        }
        Instance { record }
    }

    /// Runs the constructor. `None` omits an optional argument, which then
    /// keeps its seeded default; trailing arguments may be left out.
    ///
    /// ## Errors
    ///
    /// Fails on a missing required argument or on the first setter guard
    /// that rejects an argument.
    pub fn construct(&self, arguments: Vec<Option<Value>>) -> Result<Instance, EvalError> {
        let method = self
            .plan
            .methods_of(MethodKind::Constructor)
            .next()
            .ok_or_else(|| EvalError::UnknownMethod("new".to_string()))?;
        let frame = bind(method, arguments)?;
        let mut instance = self.instantiate();
        self.run(method, &mut instance, frame)?;
        debug!(struct_name = %self.plan.name, "instance constructed");
        Ok(instance)
    }

    /// Runs the constructor with every argument given.
    pub fn construct_values(&self, arguments: Vec<Value>) -> Result<Instance, EvalError> {
        self.construct(arguments.into_iter().map(Some).collect())
    }

    /// Rebuilds an instance from exported state, bypassing every guard.
    pub fn restore(&self, state: BTreeMap<String, Value>) -> Instance {
        let fields: Vec<FieldKey<'_>> = self.plan.properties.iter().map(|p| key(&p.field)).collect();
        Instance {
            record: Record::from_state(state, &fields),
        }
    }

    /// Calls a getter, setter or add-to method by name. Omitted trailing
    /// optional arguments take their declared default.
    pub fn call(
        &self,
        instance: &mut Instance,
        name: &str,
        arguments: Vec<Value>,
    ) -> Result<Returned, EvalError> {
        let method = self
            .plan
            .method(name)
            .ok_or_else(|| EvalError::UnknownMethod(name.to_string()))?;
        if matches!(method.kind, MethodKind::Constructor | MethodKind::StateRestore) {
            return Err(EvalError::NotCallable(name.to_string()));
        }
        trace!(method = name, "calling");
        let frame = bind(method, arguments.into_iter().map(Some).collect())?;
        self.run(method, instance, frame)
    }

    fn run(
        &self,
        method: &MethodDescriptor,
        instance: &mut Instance,
        mut frame: Frame,
    ) -> Result<Returned, EvalError> {
        match self.exec(&method.body, instance, &mut frame)? {
            Flow::Return(returned) => Ok(returned),
            Flow::Continue => Ok(Returned::This),
        }
    }

    fn exec(
        &self,
        statements: &[Statement],
        instance: &mut Instance,
        frame: &mut Frame,
    ) -> Result<Flow, EvalError> {
        for statement in statements {
            match statement {
                Statement::Guard(validation) => self.guard(validation, instance, frame)?,
                Statement::Let { name, value } => {
                    let value = self.value(value, instance, frame)?;
                    frame.vars.insert(name.clone(), value);
                }
                Statement::Assign { field, value } => {
                    let value = self.value(value, instance, frame)?;
                    instance.record.assign(&key(field), value);
                }
                Statement::Unset(field) => instance.record.unset(&key(field)),
                Statement::Append { field, value } => {
                    let value = self.value(value, instance, frame)?;
                    instance.record.append(&key(field), value)?;
                }
                Statement::If {
                    condition,
                    then,
                    otherwise,
                } => {
                    let branch = if self.truth(condition, instance, frame)? {
                        then
                    } else {
                        otherwise
                    };
                    if let Flow::Return(returned) = self.exec(branch, instance, frame)? {
                        return Ok(Flow::Return(returned));
                    }
                }
                Statement::Apply {
                    setter,
                    argument,
                    optional,
                } => {
                    if *optional && frame.omitted.contains(argument) {
                        continue;
                    }
                    let value = frame.get(argument)?.clone();
                    self.call(instance, setter, vec![value])?;
                }
                Statement::Restore { state } => {
                    return Err(EvalError::NotCallable(state.clone()));
                }
                Statement::Return(Expr::SelfRef) => return Ok(Flow::Return(Returned::This)),
                Statement::Return(expr) => {
                    let value = self.value(expr, instance, frame)?;
                    return Ok(Flow::Return(Returned::Value(value)));
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn guard(
        &self,
        validation: &Validation,
        instance: &Instance,
        frame: &Frame,
    ) -> Result<(), EvalError> {
        match validation {
            Validation::Chain(checks) => self.first_failure(checks, instance, frame),
            Validation::EachItem {
                subject,
                binding,
                checks,
            } => {
                let Some(items) = frame.get(subject)?.as_list() else {
                    return Ok(());
                };
                for item in items {
                    let mut scope = frame.clone();
                    scope.vars.insert(binding.clone(), item.clone());
                    self.first_failure(checks, instance, &scope)?;
                }
                Ok(())
            }
        }
    }

    fn first_failure(
        &self,
        checks: &[Check],
        instance: &Instance,
        frame: &Frame,
    ) -> Result<(), EvalError> {
        match self.failing_message(checks, instance, frame)? {
            Some(message) => {
                debug!(struct_name = %self.plan.name, %message, "guard rejected value");
                Err(AccessorError::invalid_argument(message).into())
            }
            None => Ok(()),
        }
    }

    /// Message of the first failing check, if any.
    fn failing_message(
        &self,
        checks: &[Check],
        instance: &Instance,
        frame: &Frame,
    ) -> Result<Option<String>, EvalError> {
        for check in checks {
            if self.truth(&check.condition, instance, frame)? {
                return self.message(&check.message, instance, frame).map(Some);
            }
        }
        Ok(None)
    }

    fn message(
        &self,
        message: &Message,
        instance: &Instance,
        frame: &Frame,
    ) -> Result<String, EvalError> {
        let mut out = String::new();
        for part in &message.parts {
            match part {
                MessagePart::Text(text) => out.push_str(text),
                MessagePart::Describe(e) => out.push_str(&self.value(e, instance, frame)?.describe()),
                MessagePart::TypeOf(e) => out.push_str(self.value(e, instance, frame)?.type_name()),
                MessagePart::Length(e) => {
                    let length = ops::char_length(&self.value(e, instance, frame)?).unwrap_or(0);
                    out.push_str(&length.to_string());
                }
                MessagePart::FirstSet(fields) => {
                    out.push_str(&ops::first_set(&instance.record, &keys(fields)));
                }
                MessagePart::BranchFailures(branches) => {
                    for checks in branches {
                        if let Some(failure) = self.failing_message(checks, instance, frame)? {
                            out.push_str("\n - ");
                            out.push_str(&failure);
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    fn value(&self, expr: &Expr, instance: &Instance, frame: &Frame) -> Result<Value, EvalError> {
        if expr.is_predicate() {
            return self.truth(expr, instance, frame).map(Value::Bool);
        }
        let value = match expr {
            Expr::Var(name) => frame.get(name)?.clone(),
            Expr::Field(field) => instance.record.get(&key(field))?.clone(),
            Expr::FieldOrNull(field) => instance.record.get_or_null(&key(field)),
            Expr::Literal(literal) => literal_value(literal),
            Expr::Null | Expr::SelfRef => Value::Null,
            Expr::JoinList(inner, separator) => {
                ops::join_list(&self.value(inner, instance, frame)?, separator)
            }
            Expr::SerializeXml(inner) => ops::serialize_xml(&self.value(inner, instance, frame)?),
            Expr::ParseXml(inner) => ops::parse_xml(&self.value(inner, instance, frame)?),
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if self.truth(condition, instance, frame)? {
                    self.value(then, instance, frame)?
                } else {
                    self.value(otherwise, instance, frame)?
                }
            }
            predicate => Value::Bool(self.truth(predicate, instance, frame)?),
        };
        Ok(value)
    }

    fn truth(&self, expr: &Expr, instance: &Instance, frame: &Frame) -> Result<bool, EvalError> {
        let inner = |e: &Expr| self.value(e, instance, frame);
        let truth = match expr {
            Expr::Flag(name) => frame.get(name)?.is_truthy(),
            Expr::IsNull(e) => ops::is_null(&inner(e)?),
            Expr::IsList(e) => ops::is_list(&inner(e)?),
            Expr::IsEmpty(e) => ops::is_empty(&inner(e)?),
            Expr::IsXmlDocument(e) => ops::is_xml_document(&inner(e)?),
            Expr::HasXmlContent(e) => ops::has_xml_content(&inner(e)?),
            Expr::IsPresent(field) => instance.record.contains(&key(field)),
            Expr::Not(e) => !self.truth(e, instance, frame)?,
            Expr::And(parts) => {
                for part in parts {
                    if !self.truth(part, instance, frame)? {
                        return Ok(false);
                    }
                }
                true
            }
            Expr::Or(parts) => {
                for part in parts {
                    if self.truth(part, instance, frame)? {
                        return Ok(true);
                    }
                }
                false
            }
            Expr::Conforms(e, ty) => ops::conforms(&inner(e)?, *ty),
            Expr::Compare(e, op, bound) => ops::compare(&inner(e)?, *op, *bound),
            Expr::LengthCompare(e, op, bound) => ops::length_compare(&inner(e)?, *op, *bound),
            Expr::MatchesPattern(e, pattern) => ops::matches_pattern(&inner(e)?, pattern),
            Expr::OneOf(e, values) => {
                let allowed: Vec<&str> = values.iter().map(String::as_str).collect();
                ops::one_of(&inner(e)?, &allowed)
            }
            Expr::AnySet(fields) => ops::any_set(&instance.record, &keys(fields)),
            Expr::NoBranchPasses(branches) => {
                for checks in branches {
                    if self.failing_message(checks, instance, frame)?.is_none() {
                        return Ok(false);
                    }
                }
                true
            }
            other => self.value(other, instance, frame)?.is_truthy(),
        };
        Ok(truth)
    }
}

/// Binds call arguments to parameters.
fn bind(method: &MethodDescriptor, arguments: Vec<Option<Value>>) -> Result<Frame, EvalError> {
    if arguments.len() > method.parameters.len() {
        return Err(EvalError::TooManyArguments {
            method: method.name.clone(),
            expected: method.parameters.len(),
            given: arguments.len(),
        });
    }
    let mut frame = Frame::default();
    let mut arguments = arguments.into_iter();
    for parameter in &method.parameters {
        match arguments.next().flatten() {
            Some(value) => {
                frame.vars.insert(parameter.name.clone(), value);
            }
            None if parameter.optional => {
                let default = parameter
                    .default
                    .as_ref()
                    .map(literal_value)
                    .unwrap_or_default();
                frame.vars.insert(parameter.name.clone(), default);
                frame.omitted.insert(parameter.name.clone());
            }
            None => {
                return Err(EvalError::MissingArgument {
                    method: method.name.clone(),
                    parameter: parameter.name.clone(),
                });
            }
        }
    }
    Ok(frame)
}

fn key(field: &FieldRef) -> FieldKey<'_> {
    let key = FieldKey::new(&field.name);
    match &field.shadow {
        Some(raw) => key.with_shadow(raw),
        None => key,
    }
}

fn keys(fields: &[FieldRef]) -> Vec<FieldKey<'_>> {
    fields.iter().map(key).collect()
}
