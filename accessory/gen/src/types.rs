//! Resolution of declared attribute types.
//!
//! A declared type name resolves to a base scalar type, a restriction, a
//! struct of the model, or (with several union members) a union of those.
//! XML attributes resolve to [`ResolvedType::Xml`] whatever their declared
//! type.

use accessory::ScalarType;
use accessory_define::{Attribute, Model, Restriction};

use crate::errors::GeneratorError;

/// What an attribute's declared type resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType {
    Scalar(ScalarType),
    Xml,
    Restriction(RestrictionRef),
    /// Another struct of the model. No base-type guard applies.
    Struct(String),
    /// Member types in declared order.
    Union(Vec<ResolvedType>),
}

/// A resolved restriction: its base type and allowed values.
#[derive(Debug, Clone, PartialEq)]
pub struct RestrictionRef {
    pub name: String,
    pub base: ScalarType,
    pub values: Vec<String>,
}

impl ResolvedType {
    /// Short type name used in type hints and union messages.
    pub fn label(&self) -> String {
        match self {
            Self::Scalar(ty) => ty.to_string(),
            Self::Xml => "xml".to_string(),
            Self::Restriction(r) => r.name.clone(),
            Self::Struct(name) => name.clone(),
            Self::Union(members) => members
                .iter()
                .map(ResolvedType::label)
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

/// Maps a schema base type name to a scalar type.
///
/// Namespace prefixes such as `xs:` are ignored.
///
/// ## Examples
///
/// ```
/// use accessory::ScalarType;
/// use accessory_gen::types::base_type;
///
/// assert_eq!(base_type("xs:int"), Some(ScalarType::Integer));
/// assert_eq!(base_type("double"), Some(ScalarType::Decimal));
/// assert_eq!(base_type("dateTime"), Some(ScalarType::Text));
/// assert_eq!(base_type("Person"), None);
/// ```
pub fn base_type(name: &str) -> Option<ScalarType> {
    let local = name.rsplit(':').next().unwrap_or(name);
    let ty = match local {
        "int" | "integer" | "long" | "short" | "byte" | "nonNegativeInteger"
        | "positiveInteger" | "negativeInteger" | "nonPositiveInteger" | "unsignedLong"
        | "unsignedInt" | "unsignedShort" | "unsignedByte" => ScalarType::Integer,
        "decimal" | "float" | "double" | "number" => ScalarType::Decimal,
        "boolean" | "bool" => ScalarType::Boolean,
        "string" | "normalizedString" | "token" | "anyURI" | "date" | "dateTime" | "time"
        | "duration" | "base64Binary" | "hexBinary" | "QName" | "NOTATION" | "ID" | "IDREF"
        | "IDREFS" | "ENTITY" | "ENTITIES" | "NMTOKEN" | "NMTOKENS" | "language" | "Name"
        | "NCName" | "gYear" | "gYearMonth" | "gMonth" | "gMonthDay" | "gDay" => {
            ScalarType::Text
        }
        _ => return None,
    };
    Some(ty)
}

/// Resolves the type of `attribute`, declared in struct `struct_name`.
pub fn resolve_attribute(
    model: &Model,
    struct_name: &str,
    attribute: &Attribute,
) -> Result<ResolvedType, GeneratorError> {
    if attribute.is_xml {
        return Ok(ResolvedType::Xml);
    }

    if let Some(name) = &attribute.restriction {
        let restriction =
            model
                .restriction(name)
                .ok_or_else(|| GeneratorError::UnknownRestriction {
                    struct_name: struct_name.to_string(),
                    attribute: attribute.raw_name.clone(),
                    restriction: name.clone(),
                })?;
        return restriction_ref(restriction, struct_name, attribute).map(ResolvedType::Restriction);
    }

    if attribute.union_members.len() > 1 {
        let members = attribute
            .union_members
            .iter()
            .map(|member| resolve_name(model, member, struct_name, attribute))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(ResolvedType::Union(members));
    }

    let declared = attribute
        .union_members
        .first()
        .unwrap_or(&attribute.type_name);
    resolve_name(model, declared, struct_name, attribute)
}

fn resolve_name(
    model: &Model,
    name: &str,
    struct_name: &str,
    attribute: &Attribute,
) -> Result<ResolvedType, GeneratorError> {
    if let Some(ty) = base_type(name) {
        return Ok(ResolvedType::Scalar(ty));
    }
    if let Some(restriction) = model.restriction(name) {
        return restriction_ref(restriction, struct_name, attribute).map(ResolvedType::Restriction);
    }
    if let Some(item) = model.get_struct(name) {
        return Ok(ResolvedType::Struct(item.name.clone()));
    }
    Err(GeneratorError::UnresolvedType {
        struct_name: struct_name.to_string(),
        attribute: attribute.raw_name.clone(),
        type_name: name.to_string(),
    })
}

fn restriction_ref(
    restriction: &Restriction,
    struct_name: &str,
    attribute: &Attribute,
) -> Result<RestrictionRef, GeneratorError> {
    let base = base_type(&restriction.base).ok_or_else(|| GeneratorError::UnresolvedType {
        struct_name: struct_name.to_string(),
        attribute: attribute.raw_name.clone(),
        type_name: restriction.base.clone(),
    })?;
    Ok(RestrictionRef {
        name: restriction.name.clone(),
        base,
        values: restriction.values.clone(),
    })
}
