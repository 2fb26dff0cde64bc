//! Collision-free naming for generated properties and methods.
//!
//! Every struct gets its own [`NameResolver`]. Names are compared
//! case-insensitively within one [`NameContext`]; a collision is resolved by
//! appending `_N` with the smallest unused `N >= 1`. Attributes are resolved
//! in declared order, so identical input always yields identical names.
//!
//! ## Examples
//!
//! ```
//! use accessory_gen::naming::{NameContext, NameResolver};
//!
//! let mut resolver = NameResolver::new();
//! assert_eq!(resolver.resolve("id", NameContext::Method).as_str(), "id");
//! assert_eq!(resolver.resolve("ID", NameContext::Method).as_str(), "ID_1");
//! assert_eq!(resolver.resolve("Id", NameContext::Method).as_str(), "Id_2");
//!
//! // Property names live in their own space.
//! assert_eq!(resolver.resolve("id", NameContext::Property).as_str(), "id");
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use accessory_define::{Struct, clean_name};
use strum::{Display, EnumIter, EnumString};
use tracing::trace;

/// Independent name spaces: properties and methods within one struct,
/// types across a generated crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum NameContext {
    Property,
    Method,
    Type,
}

/// A resolved, collision-free identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Tracks the names already handed out for one struct.
#[derive(Debug, Default)]
pub struct NameResolver {
    taken: HashMap<NameContext, HashSet<String>>,
}

impl NameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `candidate`, or `candidate_N` with the smallest free `N`,
    /// and records the result as taken in `context`.
    pub fn resolve(&mut self, candidate: &str, context: NameContext) -> Identifier {
        let taken = self.taken.entry(context).or_default();
        let mut resolved = candidate.to_string();
        let mut suffix = 1usize;
        while taken.contains(&resolved.to_lowercase()) {
            resolved = format!("{candidate}_{suffix}");
            suffix += 1;
        }
        if resolved != candidate {
            trace!(candidate, resolved = %resolved, %context, "name collision resolved");
        }
        taken.insert(resolved.to_lowercase());
        Identifier(resolved)
    }

    /// Returns `true` if `name` is already taken in `context`.
    pub fn is_taken(&self, name: &str, context: NameContext) -> bool {
        self.taken
            .get(&context)
            .is_some_and(|names| names.contains(&name.to_lowercase()))
    }
}

/// Names generated for one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNames {
    /// Position of the attribute in its struct.
    pub attribute: usize,
    /// Property (record field) name.
    pub property: Identifier,
    /// Base of the accessor names.
    pub method: Identifier,
    pub getter: String,
    pub setter: String,
    pub add_to: String,
    /// Parameter name used by the setter and the constructor.
    pub parameter: String,
    /// Raw name equals clean name, so no shadow slot is kept.
    pub name_is_clean: bool,
}

/// Resolves the names of every attribute of `item` with a fresh resolver.
///
/// The result is indexed like `item.attributes`.
pub fn resolve_struct(item: &Struct) -> Vec<ResolvedNames> {
    let mut resolver = NameResolver::new();
    item.attributes
        .iter()
        .enumerate()
        .map(|(position, attribute)| {
            let property = resolver.resolve(&attribute.clean_name, NameContext::Property);
            let method = resolver.resolve(&attribute.clean_name, NameContext::Method);
            let upper = ucfirst(method.as_str());
            ResolvedNames {
                attribute: position,
                getter: format!("get{upper}"),
                setter: format!("set{upper}"),
                add_to: format!("addTo{upper}"),
                parameter: lcfirst(method.as_str()),
                name_is_clean: attribute.name_is_clean(),
                property,
                method,
            }
        })
        .collect()
}

/// Rust type name for a declared struct or restriction name.
pub fn type_name(raw: &str) -> String {
    ucfirst(&clean_name(raw))
}

/// Upper-cases the first character.
pub fn ucfirst(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character.
pub fn lcfirst(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use accessory_define::Attribute;

    use super::*;

    fn struct_with(names: &[&str]) -> Struct {
        names.iter().fold(Struct::new("S"), |s, name| {
            s.with_attribute(Attribute::new(*name, "string"))
        })
    }

    #[test]
    fn suffixes_follow_first_encounter_order() {
        let names = resolve_struct(&struct_with(&["item", "Item", "ITEM", "other"]));
        let methods: Vec<&str> = names.iter().map(|n| n.method.as_str()).collect();
        assert_eq!(methods, vec!["item", "Item_1", "ITEM_2", "other"]);
        assert_eq!(names[1].getter, "getItem_1");
        assert_eq!(names[2].setter, "setITEM_2");
    }

    #[test]
    fn resolution_is_stable_across_runs() {
        let item = struct_with(&["a-b", "a_b", "A_B"]);
        assert_eq!(resolve_struct(&item), resolve_struct(&item));
    }

    #[test]
    fn smallest_unused_suffix_is_chosen() {
        let mut resolver = NameResolver::new();
        resolver.resolve("x_1", NameContext::Method);
        assert_eq!(resolver.resolve("x", NameContext::Method).as_str(), "x");
        assert_eq!(resolver.resolve("x", NameContext::Method).as_str(), "x_2");
        assert!(resolver.is_taken("X_2", NameContext::Method));
        assert!(!resolver.is_taken("x_2", NameContext::Property));
    }

    #[test]
    fn sanitized_names_collide_with_clean_ones() {
        let names = resolve_struct(&struct_with(&["tag-list", "tag_list"]));
        assert_eq!(names[0].property.as_str(), "tag_list");
        assert_eq!(names[1].property.as_str(), "tag_list_1");
        assert!(!names[0].name_is_clean);
        assert!(names[1].name_is_clean);
    }

    #[test]
    fn accessor_names_use_case_helpers() {
        let names = resolve_struct(&struct_with(&["Address"]));
        assert_eq!(names[0].getter, "getAddress");
        assert_eq!(names[0].add_to, "addToAddress");
        assert_eq!(names[0].parameter, "address");
        assert_eq!(ucfirst(""), "");
        assert_eq!(lcfirst("ABC"), "aBC");
        assert_eq!(type_name("person"), "Person");
    }
}
