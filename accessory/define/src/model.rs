//! Structs, attributes and restrictions: the input of one generation pass.
//!
//! A [`Model`] is either assembled in code with the builder methods or
//! loaded from a JSON/YAML file. Both paths finish through the same
//! normalization step, which fills in clean names, defaults packaged names
//! and builds the per-struct [`AttributeIndex`].

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::identifier::clean_name;
use crate::index::AttributeIndex;
use crate::types::{Facets, Literal};

/// One attribute of a struct.
///
/// ## Examples
///
/// ```
/// use accessory_define::{Attribute, Literal};
///
/// let tags = Attribute::new("tag-list", "string").array().removable();
/// assert_eq!(tags.clean_name, "tag_list");
/// assert!(!tags.name_is_clean());
/// assert_eq!(tags.default_value(), Some(Literal::List(vec![])));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Name as declared by the schema.
    pub raw_name: String,
    /// Identifier-safe form of `raw_name`. Computed when left empty.
    #[serde(default)]
    pub clean_name: String,
    /// Declared type: a base type, a restriction name or a struct name.
    /// For arrays this is the element type.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub is_xml: bool,
    #[serde(default)]
    pub required: bool,
    /// Nullable and optional: a null or empty input removes the value.
    #[serde(default)]
    pub removable_from_request: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,
    /// Name of the restriction limiting this attribute's values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restriction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_group: Option<String>,
    /// Candidate member types, in declared order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub union_members: Vec<String>,
    #[serde(default, skip_serializing_if = "Facets::is_empty")]
    pub facets: Facets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Attribute {
    /// Creates an optional scalar attribute.
    pub fn new(raw_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let raw_name = raw_name.into();
        Self {
            clean_name: clean_name(&raw_name),
            raw_name,
            type_name: type_name.into(),
            is_array: false,
            is_xml: false,
            required: false,
            removable_from_request: false,
            default: None,
            restriction: None,
            choice_group: None,
            union_members: Vec::new(),
            facets: Facets::default(),
            documentation: None,
        }
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn xml(mut self) -> Self {
        self.is_xml = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn removable(mut self) -> Self {
        self.removable_from_request = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Literal>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_restriction(mut self, restriction: impl Into<String>) -> Self {
        self.restriction = Some(restriction.into());
        self
    }

    pub fn in_choice(mut self, group: impl Into<String>) -> Self {
        self.choice_group = Some(group.into());
        self
    }

    pub fn with_union<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.union_members = members.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_facets(mut self, facets: Facets) -> Self {
        self.facets = facets;
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Returns `true` if the raw name is usable as is, in which case no
    /// shadow slot is kept.
    pub fn name_is_clean(&self) -> bool {
        self.raw_name == self.clean_name
    }

    /// Effective default: arrays always default to a sequence, the empty
    /// one unless a sequence default is declared.
    pub fn default_value(&self) -> Option<Literal> {
        if self.is_array {
            return match &self.default {
                Some(lit @ Literal::List(_)) => Some(lit.clone()),
                _ => Some(Literal::empty_list()),
            };
        }
        self.default.clone()
    }

    fn normalize(&mut self) {
        if self.clean_name.is_empty() {
            self.clean_name = clean_name(&self.raw_name);
        }
    }
}

/// A schema struct: a named, ordered list of attributes.
///
/// ## Examples
///
/// ```
/// use accessory_define::{Attribute, Struct};
///
/// let person = Struct::new("Person")
///     .with_attribute(Attribute::new("id", "int").required())
///     .with_attribute(Attribute::new("nick-name", "string"));
///
/// assert_eq!(person.packaged_name, "Person");
/// assert_eq!(person.attribute("nick_name").unwrap().raw_name, "nick-name");
/// assert_eq!(person.attribute("nick-name").unwrap().clean_name, "nick_name");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Struct {
    pub name: String,
    /// Fully qualified name. Defaults to `name`.
    #[serde(default)]
    pub packaged_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Attributes in declared order.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(skip)]
    index: AttributeIndex,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            packaged_name: name.clone(),
            name,
            parent: None,
            documentation: None,
            attributes: Vec::new(),
            index: AttributeIndex::default(),
        }
    }

    pub fn with_packaged_name(mut self, packaged_name: impl Into<String>) -> Self {
        self.packaged_name = packaged_name.into();
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Appends an attribute and refreshes the name index.
    pub fn with_attribute(mut self, mut attribute: Attribute) -> Self {
        attribute.normalize();
        self.attributes.push(attribute);
        self.index = AttributeIndex::build(&self.attributes);
        self
    }

    /// Looks an attribute up by raw or clean name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.index
            .position(name)
            .and_then(|position| self.attributes.get(position))
    }

    pub fn index(&self) -> &AttributeIndex {
        &self.index
    }

    /// Attribute positions in constructor order: required attributes in
    /// declared order, then optional ones in declared order.
    pub fn constructor_order(&self) -> Vec<usize> {
        let (required, optional): (Vec<usize>, Vec<usize>) =
            (0..self.attributes.len()).partition(|&i| self.attributes[i].required);
        required.into_iter().chain(optional).collect()
    }

    /// Fills derived fields and rebuilds the index.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateAttribute`] if two attributes share a
    /// raw name.
    pub fn normalize(&mut self) -> Result<(), ModelError> {
        if self.packaged_name.is_empty() {
            self.packaged_name = self.name.clone();
        }
        let mut seen = HashSet::new();
        for attribute in &mut self.attributes {
            attribute.normalize();
            if !seen.insert(attribute.raw_name.clone()) {
                return Err(ModelError::DuplicateAttribute {
                    struct_name: self.name.clone(),
                    attribute: attribute.raw_name.clone(),
                });
            }
        }
        self.index = AttributeIndex::build(&self.attributes);
        Ok(())
    }
}

/// A restriction: a base type limited to a closed list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restriction {
    pub name: String,
    #[serde(default)]
    pub packaged_name: String,
    /// Base type the values are drawn from.
    #[serde(default = "default_restriction_base")]
    pub base: String,
    /// Allowed values in declared order.
    pub values: Vec<String>,
}

fn default_restriction_base() -> String {
    "string".to_string()
}

impl Restriction {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        Self {
            packaged_name: name.clone(),
            name,
            base: default_restriction_base(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }
}

/// Everything one generation pass consumes.
///
/// ## Examples
///
/// ```
/// use accessory_define::Model;
///
/// let model = Model::from_json_str(r#"{
///     "structs": [{
///         "name": "Person",
///         "attributes": [
///             {"rawName": "id", "type": "int", "required": true},
///             {"rawName": "colour", "type": "Colour"}
///         ]
///     }],
///     "restrictions": [{"name": "Colour", "values": ["red", "blue"]}]
/// }"#).unwrap();
///
/// let person = model.get_struct("Person").unwrap();
/// assert_eq!(person.attributes.len(), 2);
/// assert!(model.restriction("Colour").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub structs: Vec<Struct>,
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_struct(mut self, mut item: Struct) -> Self {
        if item.packaged_name.is_empty() {
            item.packaged_name = item.name.clone();
        }
        self.structs.push(item);
        self
    }

    pub fn with_restriction(mut self, mut restriction: Restriction) -> Self {
        if restriction.packaged_name.is_empty() {
            restriction.packaged_name = restriction.name.clone();
        }
        self.restrictions.push(restriction);
        self
    }

    /// Parses and normalizes a JSON model.
    pub fn from_json_str(input: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(input)?;
        model.normalized()
    }

    /// Parses and normalizes a YAML model.
    pub fn from_yaml_str(input: &str) -> Result<Self, ModelError> {
        let model: Self = serde_yaml::from_str(input)?;
        model.normalized()
    }

    /// Loads a model file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let input = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match extension.as_str() {
            "json" => Self::from_json_str(&input),
            "yaml" | "yml" => Self::from_yaml_str(&input),
            other => Err(ModelError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn get_struct(&self, name: &str) -> Option<&Struct> {
        self.structs
            .iter()
            .find(|s| s.name == name || s.packaged_name == name)
    }

    /// Looks a restriction up by name or packaged name.
    pub fn restriction(&self, name: &str) -> Option<&Restriction> {
        self.restrictions
            .iter()
            .find(|r| r.name == name || r.packaged_name == name)
    }

    fn normalized(mut self) -> Result<Self, ModelError> {
        let mut names = HashSet::new();
        for item in &mut self.structs {
            item.normalize()?;
            if !names.insert(item.name.clone()) {
                return Err(ModelError::DuplicateStruct(item.name.clone()));
            }
        }
        for restriction in &mut self.restrictions {
            if restriction.packaged_name.is_empty() {
                restriction.packaged_name = restriction.name.clone();
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn constructor_order_puts_required_first() {
        let item = Struct::new("S")
            .with_attribute(Attribute::new("a", "string"))
            .with_attribute(Attribute::new("b", "int").required())
            .with_attribute(Attribute::new("c", "string"))
            .with_attribute(Attribute::new("d", "int").required());
        assert_eq!(item.constructor_order(), vec![1, 3, 0, 2]);
    }

    #[test]
    fn array_default_is_always_a_sequence() {
        let plain = Attribute::new("tags", "string").array();
        assert_eq!(plain.default_value(), Some(Literal::empty_list()));

        let scalar = Attribute::new("name", "string");
        assert_eq!(scalar.default_value(), None);
    }

    #[test]
    fn yaml_models_compute_clean_names() {
        let model = Model::from_yaml_str(
            r#"
structs:
  - name: Order
    packagedName: shop.Order
    attributes:
      - rawName: line-item
        type: string
        isArray: true
"#,
        )
        .unwrap();
        let order = model.get_struct("shop.Order").unwrap();
        let item = order.attribute("line_item").unwrap();
        assert_eq!(item.clean_name, "line_item");
        assert!(item.is_array);
    }

    #[test]
    fn duplicate_attribute_is_rejected() {
        let err = Model::from_json_str(
            r#"{"structs": [{"name": "S", "attributes": [
                {"rawName": "a", "type": "int"},
                {"rawName": "a", "type": "string"}
            ]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateAttribute { .. }), "got {err:?}");
    }

    #[test]
    fn duplicate_struct_is_rejected() {
        let err = Model::from_json_str(r#"{"structs": [{"name": "S"}, {"name": "S"}]}"#).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateStruct(name) if name == "S"));
    }

    #[test]
    fn load_picks_format_from_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"structs": [{{"name": "S"}}]}}"#).unwrap();
        let model = Model::load(file.path()).unwrap();
        assert_eq!(model.structs[0].packaged_name, "S");

        let other = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            Model::load(other.path()),
            Err(ModelError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }
}
