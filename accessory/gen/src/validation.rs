//! Pre-planning checks on model structs.
//!
//! These checks reject attribute shapes that cannot be planned before any
//! naming or rule selection happens, so the error points at the declaration
//! rather than at a half-built plan.
//!
//! ## Validation Checks
//!
//! - **XML and restriction**: an XML attribute cannot be restricted to a
//!   closed list of values
//! - **Array defaults**: an array attribute's explicit default must be a
//!   sequence
//! - **Patterns**: every pattern facet must compile as a regular expression
//!
//! ## Examples
//!
//! ```
//! use accessory_define::{Attribute, Model, Restriction, Struct};
//! use accessory_gen::validation::validate_struct;
//!
//! let model = Model::new().with_restriction(Restriction::new("Colour", ["red"]));
//! let bad = Struct::new("S").with_attribute(Attribute::new("c", "Colour").xml());
//! assert!(validate_struct(&model, &bad).is_err());
//! ```

use accessory_define::{Attribute, Literal, Model, Struct};
use regex::Regex;

use crate::errors::GeneratorError;

/// Validates every attribute of a struct, failing on the first problem.
///
/// ## Errors
///
/// Returns `GeneratorError::XmlRestrictionConflict`,
/// `GeneratorError::ArrayDefault` or `GeneratorError::InvalidPattern`, each
/// scoped to the struct and attribute.
pub fn validate_struct(model: &Model, item: &Struct) -> Result<(), GeneratorError> {
    for attribute in &item.attributes {
        validate_attribute(model, &item.name, attribute)?;
    }
    Ok(())
}

fn validate_attribute(
    model: &Model,
    struct_name: &str,
    attribute: &Attribute,
) -> Result<(), GeneratorError> {
    if attribute.is_xml {
        let restriction = attribute.restriction.clone().or_else(|| {
            model
                .restriction(&attribute.type_name)
                .map(|r| r.name.clone())
        });
        if let Some(restriction) = restriction {
            return Err(GeneratorError::XmlRestrictionConflict {
                struct_name: struct_name.to_string(),
                attribute: attribute.raw_name.clone(),
                restriction,
            });
        }
    }

    if attribute.is_array
        && let Some(default) = &attribute.default
        && !matches!(default, Literal::List(_))
    {
        return Err(GeneratorError::ArrayDefault {
            struct_name: struct_name.to_string(),
            attribute: attribute.raw_name.clone(),
        });
    }

    if let Some(pattern) = &attribute.facets.pattern {
        Regex::new(&format!("^(?:{pattern})$")).map_err(|e| GeneratorError::InvalidPattern {
            struct_name: struct_name.to_string(),
            attribute: attribute.raw_name.clone(),
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}
