//! Module documentation generation for struct modules.
//!
//! This module provides the [`ModuleDocBuilder`] struct for generating
//! module-level documentation for generated struct modules. The
//! documentation includes an introduction, the list of fields, the methods
//! grouped by kind, and a usage example.

use proc_macro2::TokenStream;
use quote::quote;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

use crate::ir::{MethodKind, StructPlan};

/// Builds module-level documentation for a generated struct module.
///
/// The builder generates documentation sections including:
/// - Introduction paragraph with the struct name and its documentation
/// - Fields section listing every property with its raw name and type
/// - Methods section listing the accessors grouped by kind
/// - Example section with a basic usage example
///
/// ## Examples
///
/// ```ignore
/// use accessory_gen::codegen::ModuleDocBuilder;
///
/// let plan: StructPlan = /* ... */;
/// let doc_tokens = ModuleDocBuilder::new(&plan).build();
/// ```
pub struct ModuleDocBuilder<'a> {
    plan: &'a StructPlan,
}

impl<'a> ModuleDocBuilder<'a> {
    pub fn new(plan: &'a StructPlan) -> Self {
        Self { plan }
    }

    /// Builds the complete module documentation as a token stream of
    /// `#![doc = "..."]` attributes, one per line, so the formatted module
    /// starts with `//!` comments.
    pub fn build(&self) -> TokenStream {
        let lines = self.lines();
        quote! {
            #(#![doc = #lines])*
        }
    }

    /// Every documentation line, sections separated by an empty line.
    fn lines(&self) -> Vec<String> {
        let sections = [
            self.intro_paragraph(),
            self.fields_section(),
            self.methods_section(),
            self.example_section(),
        ];
        let mut lines = Vec::new();
        for (i, section) in sections.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.extend(section.trim_end().lines().map(str::to_string));
        }
        lines
    }

    /// The struct name, with its packaged name when they differ, followed
    /// by the struct's own documentation.
    fn intro_paragraph(&self) -> String {
        let plan = self.plan;
        let mut intro = if plan.packaged_name == plan.name {
            format!(" Accessors for `{}`.", plan.name)
        } else {
            format!(" Accessors for `{}` (`{}`).", plan.name, plan.packaged_name)
        };
        for note in &plan.documentation.notes {
            intro.push_str("\n\n ");
            intro.push_str(note);
        }
        if let Some(parent) = &plan.parent {
            intro.push_str(&format!("\n\n Extends `{parent}`."));
        }
        intro
    }

    fn fields_section(&self) -> String {
        if self.plan.properties.is_empty() {
            return " ## Fields\n\n No fields defined.".to_string();
        }
        let mut lines = vec![" ## Fields".to_string(), String::new()];
        for property in &self.plan.properties {
            if property.raw_name == property.name {
                lines.push(format!(" - `{}`: `{}`", property.name, property.ty.label()));
            } else {
                lines.push(format!(
                    " - `{}` (raw `{}`): `{}`",
                    property.name,
                    property.raw_name,
                    property.ty.label()
                ));
            }
        }
        lines.join("\n")
    }

    /// Groups method names by kind, in [`MethodKind`] order.
    fn categorize_methods(&self) -> BTreeMap<usize, (MethodKind, Vec<&'a str>)> {
        let mut categories = BTreeMap::new();
        for (order, kind) in MethodKind::iter().enumerate() {
            let names: Vec<&str> = self
                .plan
                .methods_of(kind)
                .map(|m| m.name.as_str())
                .collect();
            if !names.is_empty() {
                categories.insert(order, (kind, names));
            }
        }
        categories
    }

    fn methods_section(&self) -> String {
        let mut lines = vec![" ## Methods".to_string(), String::new()];
        for (kind, names) in self.categorize_methods().into_values() {
            lines.push(format!(" **{kind}**:"));
            for name in names {
                lines.push(format!(" - `{name}`"));
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }

    /// Builds an example with the first setter, or a bare construction when
    /// the struct has none.
    fn example_section(&self) -> String {
        let name = &self.plan.name;
        let setter = self
            .plan
            .methods_of(MethodKind::Setter)
            .next()
            .map(|m| format!("\n value.{}(accessory::Value::Null)?;", m.name))
            .unwrap_or_default();

        format!(
            r#" ## Example

 ```ignore
 let mut value = {name}::default();{setter}
 let state = value.export();
 let restored = {name}::fromState(state);
 assert_eq!(restored, value);
 ```"#
        )
    }
}
