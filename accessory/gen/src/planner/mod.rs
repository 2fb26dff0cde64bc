//! The accessor planner.
//!
//! For every attribute of a struct the planner resolves names and the
//! declared type, selects validation rules, and emits a property plus the
//! getter, setter and (for arrays) add-to method. A constructor and a
//! state-restore method complete the plan.
//!
//! ## Planning Flow
//!
//! 1. Model checks ([`crate::validation::validate_struct`])
//! 2. Name resolution with a resolver scoped to the struct
//! 3. Type resolution and rule selection per attribute
//! 4. Method descriptors: `new`, then per attribute `get`/`set`/`addTo`,
//!    then `fromState`
//!
//! ## Examples
//!
//! ```
//! use accessory_define::{Attribute, Model, Struct};
//! use accessory_gen::ir::MethodKind;
//! use accessory_gen::options::GeneratorOptions;
//! use accessory_gen::planner::plan_struct;
//!
//! let person = Struct::new("Person")
//!     .with_attribute(Attribute::new("id", "int").required())
//!     .with_attribute(Attribute::new("tags", "string").array());
//! let model = Model::new().with_struct(person.clone());
//!
//! let plan = plan_struct(&model, &person, &GeneratorOptions::default()).unwrap();
//! let names: Vec<&str> = plan.methods.iter().map(|m| m.name.as_str()).collect();
//! assert_eq!(
//!     names,
//!     ["new", "getId", "setId", "getTags", "setTags", "addToTags", "fromState"]
//! );
//! assert_eq!(plan.method("addToTags").unwrap().kind, MethodKind::AddTo);
//! ```

mod add_to;
mod constructor;
pub mod docs;
mod getter;
mod restore;
mod setter;

use accessory_define::{Attribute, Model, Struct};
use tracing::{debug, info, warn};

use crate::errors::GeneratorError;
use crate::ir::{FieldRef, PropertyDescriptor, StructPlan, TypeHint};
use crate::naming::{ResolvedNames, resolve_struct};
use crate::options::GeneratorOptions;
use crate::rules::{LengthFacet, RangeFacet, Rule, UnionBranch};
use crate::types::{ResolvedType, RestrictionRef, resolve_attribute};
use crate::validation::validate_struct;

/// Everything the method planners need to know about one attribute.
#[derive(Debug, Clone)]
pub(crate) struct AttributeContext<'a> {
    pub attribute: &'a Attribute,
    pub position: usize,
    pub names: &'a ResolvedNames,
    pub field: FieldRef,
    pub resolved: ResolvedType,
    /// Value rules in evaluation order, without choice exclusivity.
    pub rules: Vec<Rule>,
    pub choice: Option<Rule>,
    pub restriction: Option<RestrictionRef>,
    pub type_hint: TypeHint,
}

impl AttributeContext<'_> {
    /// Type label of a single item of an array attribute.
    pub fn element_label(&self) -> String {
        self.resolved.label()
    }
}

/// Outcome of planning a whole model.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub plans: Vec<StructPlan>,
    pub failures: Vec<StructFailure>,
}

/// A struct that could not be planned.
#[derive(Debug)]
pub struct StructFailure {
    pub struct_name: String,
    pub error: GeneratorError,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn plan(&self, name: &str) -> Option<&StructPlan> {
        self.plans.iter().find(|p| p.name == name)
    }
}

/// Plans every struct of the model.
///
/// Structs are planned independently; a failing struct is reported in
/// [`GenerationReport::failures`] and does not stop the others.
pub fn plan_model(model: &Model, options: &GeneratorOptions) -> GenerationReport {
    let mut report = GenerationReport::default();
    for item in &model.structs {
        match plan_struct(model, item, options) {
            Ok(plan) => report.plans.push(plan),
            Err(error) => {
                warn!(struct_name = %item.name, error = %error, "struct planning failed");
                report.failures.push(StructFailure {
                    struct_name: item.name.clone(),
                    error,
                });
            }
        }
    }
    info!(
        planned = report.plans.len(),
        failed = report.failures.len(),
        "model planned"
    );
    report
}

/// Plans the accessors of one struct.
///
/// ## Errors
///
/// Returns the first attribute-scoped [`GeneratorError`] encountered; no
/// partial plan is produced.
pub fn plan_struct(
    model: &Model,
    item: &Struct,
    options: &GeneratorOptions,
) -> Result<StructPlan, GeneratorError> {
    validate_struct(model, item)?;

    let names = resolve_struct(item);
    let contexts = build_contexts(model, item, &names)?;

    let properties = contexts
        .iter()
        .map(|ctx| PropertyDescriptor {
            name: ctx.names.property.to_string(),
            raw_name: ctx.attribute.raw_name.clone(),
            field: ctx.field.clone(),
            ty: ctx.type_hint.clone(),
            default: ctx.attribute.default_value(),
            documentation: docs::property_doc(ctx),
            attribute: ctx.position,
        })
        .collect();

    let mut methods = Vec::with_capacity(contexts.len() * 3 + 2);
    methods.push(constructor::plan(&item.name, item, &contexts));
    for ctx in &contexts {
        methods.push(getter::plan(ctx, &item.name));
        methods.push(setter::plan(ctx, &item.name, options.validation));
        if ctx.attribute.is_array {
            methods.push(add_to::plan(ctx, &item.name, options.validation));
        }
        debug!(
            struct_name = %item.name,
            attribute = %ctx.attribute.raw_name,
            rules = ctx.rules.len(),
            choice = ctx.choice.is_some(),
            "attribute planned"
        );
    }
    methods.push(restore::plan(&item.name, item.parent.as_deref()));

    info!(struct_name = %item.name, methods = methods.len(), "struct planned");

    Ok(StructPlan {
        name: item.name.clone(),
        packaged_name: item.packaged_name.clone(),
        parent: item.parent.clone(),
        documentation: docs::struct_doc(
            &item.name,
            &item.packaged_name,
            item.documentation.as_deref(),
        ),
        properties,
        methods,
    })
}

fn build_contexts<'a>(
    model: &Model,
    item: &'a Struct,
    names: &'a [ResolvedNames],
) -> Result<Vec<AttributeContext<'a>>, GeneratorError> {
    let fields: Vec<FieldRef> = item
        .attributes
        .iter()
        .zip(names)
        .map(|(attribute, names)| field_ref(attribute, names))
        .collect();

    item.attributes
        .iter()
        .zip(names)
        .enumerate()
        .map(|(position, (attribute, names))| {
            let resolved = resolve_attribute(model, &item.name, attribute)?;
            let restriction = match &resolved {
                ResolvedType::Restriction(r) => Some(r.clone()),
                _ => None,
            };
            let rules = select_rules(&resolved, attribute);
            let choice = attribute.choice_group.as_ref().map(|group| {
                let siblings = item
                    .attributes
                    .iter()
                    .enumerate()
                    .filter(|(i, other)| {
                        *i != position && other.choice_group.as_ref() == Some(group)
                    })
                    .map(|(i, _)| fields[i].clone())
                    .collect();
                Rule::ChoiceExclusivity {
                    property: names.property.to_string(),
                    siblings,
                }
            });
            let label = resolved.label();
            let type_hint = if attribute.is_array {
                TypeHint::List(label)
            } else {
                TypeHint::Value(label)
            };
            Ok(AttributeContext {
                attribute,
                position,
                names,
                field: fields[position].clone(),
                resolved,
                rules,
                choice,
                restriction,
                type_hint,
            })
        })
        .collect()
}

fn field_ref(attribute: &Attribute, names: &ResolvedNames) -> FieldRef {
    let field = FieldRef::new(names.property.as_str());
    if names.name_is_clean {
        field
    } else {
        field.with_shadow(attribute.raw_name.as_str())
    }
}

/// Value rules of an attribute: base type (or union), enumeration, length,
/// pattern and range facets, in that order.
pub fn select_rules(resolved: &ResolvedType, attribute: &Attribute) -> Vec<Rule> {
    let mut rules = type_rules(resolved);

    let facets = &attribute.facets;
    if let Some(n) = facets.length {
        rules.push(Rule::StringLength(LengthFacet::Exact(n)));
    }
    if let Some(n) = facets.min_length {
        rules.push(Rule::StringLength(LengthFacet::Min(n)));
    }
    if let Some(n) = facets.max_length {
        rules.push(Rule::StringLength(LengthFacet::Max(n)));
    }
    if let Some(pattern) = &facets.pattern {
        rules.push(Rule::Pattern(pattern.clone()));
    }
    if let Some(b) = facets.min_inclusive {
        rules.push(Rule::Range(RangeFacet::MinInclusive(b)));
    }
    if let Some(b) = facets.max_inclusive {
        rules.push(Rule::Range(RangeFacet::MaxInclusive(b)));
    }
    if let Some(b) = facets.min_exclusive {
        rules.push(Rule::Range(RangeFacet::MinExclusive(b)));
    }
    if let Some(b) = facets.max_exclusive {
        rules.push(Rule::Range(RangeFacet::MaxExclusive(b)));
    }
    rules
}

fn type_rules(resolved: &ResolvedType) -> Vec<Rule> {
    match resolved {
        ResolvedType::Scalar(ty) => vec![Rule::for_scalar(*ty)],
        ResolvedType::Restriction(r) => vec![
            Rule::for_scalar(r.base),
            Rule::Enumeration {
                restriction: r.name.clone(),
                values: r.values.clone(),
            },
        ],
        ResolvedType::Union(members) => vec![Rule::Union {
            branches: members
                .iter()
                .map(|member| UnionBranch {
                    label: member.label(),
                    rules: type_rules(member),
                })
                .collect(),
        }],
        ResolvedType::Xml | ResolvedType::Struct(_) => Vec::new(),
    }
}
