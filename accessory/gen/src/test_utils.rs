//! Shared test utilities for accessory-gen tests.
//!
//! This module provides model fixtures and small helpers used by unit and
//! integration tests, so every suite plans the same structs.

use accessory::{Value, XmlDocument, XmlElement};
use accessory_define::{Attribute, Facets, Model, Restriction, Struct};

use crate::eval::{Evaluator, Instance, Returned};
use crate::ir::StructPlan;
use crate::options::GeneratorOptions;
use crate::planner::{plan_model, plan_struct};

/// `Person { id: int required, tags: string[] removable, address: xml }`.
pub fn person() -> Struct {
    Struct::new("Person")
        .with_documentation("A person known to the directory")
        .with_attribute(Attribute::new("id", "int").required())
        .with_attribute(Attribute::new("tags", "string").array().removable())
        .with_attribute(Attribute::new("address", "string").xml())
}

/// A model holding only [`person`].
pub fn person_model() -> Model {
    Model::new().with_struct(person())
}

/// A model exercising restrictions, choices, unions and facets.
///
/// - `Paint.colour`: restricted to `Colour` (`red`, `green`, `blue`)
/// - `Paint.email` / `Paint.phone`: one choice group
/// - `Paint.code`: union of `int` and `Colour`
/// - `Paint.label`: 2 to 5 characters, lowercase letters only
/// - `Paint.weight`: decimal between 0 and 100, upper bound exclusive
pub fn paint_model() -> Model {
    let label = Facets {
        min_length: Some(2),
        max_length: Some(5),
        pattern: Some("[a-z]+".to_string()),
        ..Facets::default()
    };
    let weight = Facets {
        min_inclusive: Some(0.0),
        max_exclusive: Some(100.0),
        ..Facets::default()
    };
    Model::new()
        .with_restriction(Restriction::new("Colour", ["red", "green", "blue"]))
        .with_struct(
            Struct::new("Paint")
                .with_attribute(Attribute::new("colour", "Colour"))
                .with_attribute(Attribute::new("email", "string").in_choice("contact"))
                .with_attribute(Attribute::new("phone", "string").in_choice("contact"))
                .with_attribute(Attribute::new("code", "string").with_union(["int", "Colour"]))
                .with_attribute(Attribute::new("label", "string").with_facets(label))
                .with_attribute(Attribute::new("weight", "decimal").with_facets(weight))
                .with_attribute(Attribute::new("shades", "Colour").array()),
        )
}

/// Plans every struct of the model with default options, panicking on
/// the first failure.
pub fn plan_all(model: &Model) -> Vec<StructPlan> {
    plan_all_with(model, &GeneratorOptions::default())
}

/// Plans every struct of the model with the given options, panicking on
/// the first failure.
pub fn plan_all_with(model: &Model, options: &GeneratorOptions) -> Vec<StructPlan> {
    let report = plan_model(model, options);
    if let Some(failure) = report.failures.first() {
        panic!("{} failed to plan: {}", failure.struct_name, failure.error);
    }
    report.plans
}

/// Plans one struct of the model with the given options.
pub fn plan_with(model: &Model, name: &str, options: &GeneratorOptions) -> StructPlan {
    let item = model
        .get_struct(name)
        .unwrap_or_else(|| panic!("no struct named {name}"));
    plan_struct(model, item, options).unwrap_or_else(|e| panic!("{name} failed to plan: {e}"))
}

/// Plans one struct of the model with default options.
pub fn plan_of(model: &Model, name: &str) -> StructPlan {
    plan_with(model, name, &GeneratorOptions::default())
}

/// Calls a method and returns its value, panicking on errors and on
/// fluent returns.
pub fn get(evaluator: &Evaluator<'_>, instance: &mut Instance, method: &str, args: Vec<Value>) -> Value {
    match evaluator.call(instance, method, args) {
        Ok(Returned::Value(value)) => value,
        Ok(Returned::This) => panic!("{method} returned the instance"),
        Err(e) => panic!("{method} failed: {e}"),
    }
}

/// `<address><city>Paris</city></address>`
pub fn address_document() -> XmlDocument {
    XmlDocument::with_root(
        XmlElement::new("address").with_child(XmlElement::new("city").with_text("Paris")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_plan_cleanly() {
        assert_eq!(plan_all(&person_model()).len(), 1);
        assert_eq!(plan_of(&paint_model(), "Paint").properties.len(), 7);
    }

    #[test]
    fn plan_all_with_honors_options() {
        let options = GeneratorOptions::default().without_validation();
        let plans = plan_all_with(&person_model(), &options);
        assert!(plans[0].methods.iter().all(|m| m.checks().is_empty()));
    }

    #[test]
    fn address_document_has_content() {
        assert!(address_document().has_content());
    }
}
