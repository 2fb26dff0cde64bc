//! Struct generation for planned structs.
//!
//! Generates the struct backed by an `accessory::Record`, one field-key
//! constant per property, a `Default` impl seeding the declared defaults,
//! and every planned method.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use super::expr::{self, Receiver, field_const, literal_tokens, local_ident};
use crate::ir::{MethodDescriptor, MethodKind, Parameter, StructPlan, TypeHint};
use crate::planner::docs::Documentation;

/// Constructors with more parameters than this get a clippy allowance.
const MAX_ARGUMENTS: usize = 7;

/// Generates the struct and its impls for a plan.
///
/// ## Examples
///
/// ```ignore
/// // Generated for Person { id: int }:
/// #[derive(Debug, Clone, PartialEq)]
/// pub struct Person {
///     record: accessory::Record,
/// }
///
/// #[allow(non_snake_case)]
/// impl Person {
///     pub const FIELD_ID: accessory::FieldKey<'static> = accessory::FieldKey::new("id");
///     pub fn getId(&self) -> Result<accessory::Value, accessory::AccessorError> { ... }
///     pub fn setId(&mut self, id: impl Into<accessory::Value>)
///         -> Result<&mut Self, accessory::AccessorError> { ... }
/// }
/// ```
pub fn generate_struct(plan: &StructPlan, struct_name: &str) -> TokenStream {
    let struct_name = format_ident!("{}", struct_name);
    let doc_lines = doc_lines(&plan.documentation);

    let constants = generate_field_constants(plan);
    let default_impl = generate_default_impl(plan, &struct_name);
    let methods: Vec<TokenStream> = plan.methods.iter().map(generate_method).collect();

    quote! {
        #(#[doc = #doc_lines])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct #struct_name {
            record: accessory::Record,
        }

        #default_impl

        #[allow(non_snake_case)]
        impl #struct_name {
            #constants

            #(#methods)*

            /// Every stored field, raw shadow slots included.
            pub fn export(&self) -> std::collections::BTreeMap<String, accessory::Value> {
                self.record.export()
            }

            /// The underlying field store.
            pub fn record(&self) -> &accessory::Record {
                &self.record
            }
        }
    }
}

/// Rustdoc attribute values, one per line, each with a leading space.
pub fn doc_lines(documentation: &Documentation) -> Vec<String> {
    documentation
        .lines()
        .into_iter()
        .map(|line| if line.is_empty() { line } else { format!(" {line}") })
        .collect()
}

fn generate_field_constants(plan: &StructPlan) -> TokenStream {
    let constants = plan.properties.iter().map(|property| {
        let ident = field_const(&property.field);
        let name = &property.field.name;
        let docs = doc_lines(&property.documentation);
        let key = match &property.field.shadow {
            Some(raw) => quote! { accessory::FieldKey::new(#name).with_shadow(#raw) },
            None => quote! { accessory::FieldKey::new(#name) },
        };
        quote! {
            #(#[doc = #docs])*
            pub const #ident: accessory::FieldKey<'static> = #key;
        }
    });
    let all = plan.properties.iter().map(|p| field_const(&p.field));

    quote! {
        #(#constants)*

        /// Every field key, in declared order.
        pub const FIELDS: &'static [accessory::FieldKey<'static>] = &[#(Self::#all),*];
    }
}

/// Seeds every field with its declared default, or null.
fn generate_default_impl(plan: &StructPlan, struct_name: &Ident) -> TokenStream {
    if plan.properties.is_empty() {
        return quote! {
            impl Default for #struct_name {
                fn default() -> Self {
                    Self { record: accessory::Record::new() }
                }
            }
        };
    }

    let seeds = plan.properties.iter().map(|property| {
        let key = field_const(&property.field);
        let value = match &property.default {
            Some(literal) => literal_tokens(literal),
            None => quote! { accessory::Value::Null },
        };
        quote! { record.assign(&Self::#key, #value); }
    });

    quote! {
        impl Default for #struct_name {
            fn default() -> Self {
                let mut record = accessory::Record::new();
                #(#seeds)*
                Self { record }
            }
        }
    }
}

fn generate_method(method: &MethodDescriptor) -> TokenStream {
    let docs = doc_lines(&method.documentation);

    let body = match method.kind {
        MethodKind::Constructor => generate_constructor(method),
        MethodKind::Getter => generate_getter(method),
        MethodKind::Setter | MethodKind::AddTo => generate_setter(method),
        MethodKind::StateRestore => generate_restore(method),
    };

    quote! {
        #(#[doc = #docs])*
        #body
    }
}

/// Parameter list entry and the statement converting it to a `Value`.
fn value_parameter(parameter: &Parameter) -> (TokenStream, TokenStream) {
    let ident = local_ident(&parameter.name);
    if parameter.optional {
        (quote! { #ident: Option<accessory::Value> }, TokenStream::new())
    } else {
        (
            quote! { #ident: impl Into<accessory::Value> },
            quote! { let #ident: accessory::Value = #ident.into(); },
        )
    }
}

fn generate_constructor(method: &MethodDescriptor) -> TokenStream {
    let name = format_ident!("{}", method.name);
    let (params, conversions): (Vec<_>, Vec<_>) =
        method.parameters.iter().map(value_parameter).unzip();
    let body = expr::statements(&method.body, Receiver::This);
    let allow = (method.parameters.len() > MAX_ARGUMENTS)
        .then(|| quote! { #[allow(clippy::too_many_arguments)] });
    let binding = if method.parameters.is_empty() {
        quote! { let this = Self::default(); }
    } else {
        quote! { let mut this = Self::default(); }
    };

    quote! {
        #allow
        pub fn #name(#(#params),*) -> Result<Self, accessory::AccessorError> {
            #(#conversions)*
            #binding
            #body
        }
    }
}

fn generate_getter(method: &MethodDescriptor) -> TokenStream {
    let name = format_ident!("{}", method.name);
    let receiver = if method.mutates() {
        quote! { &mut self }
    } else {
        quote! { &self }
    };

    let mut params = Vec::new();
    let mut prologue = Vec::new();
    for parameter in &method.parameters {
        let ident = local_ident(&parameter.name);
        match parameter.ty {
            TypeHint::Flag => {
                let default = matches!(
                    parameter.default,
                    Some(accessory_define::Literal::Bool(true))
                );
                params.push(quote! { #ident: Option<bool> });
                prologue.push(quote! { let #ident: bool = #ident.unwrap_or(#default); });
            }
            _ => {
                let (param, conversion) = value_parameter(parameter);
                params.push(param);
                prologue.push(conversion);
            }
        }
    }
    let body = expr::statements(&method.body, Receiver::SelfRef);

    quote! {
        pub fn #name(#receiver #(, #params)*) -> Result<accessory::Value, accessory::AccessorError> {
            #(#prologue)*
            #body
        }
    }
}

fn generate_setter(method: &MethodDescriptor) -> TokenStream {
    let name = format_ident!("{}", method.name);
    let (params, conversions): (Vec<_>, Vec<_>) =
        method.parameters.iter().map(value_parameter).unzip();
    let body = expr::statements(&method.body, Receiver::SelfRef);

    quote! {
        pub fn #name(&mut self #(, #params)*) -> Result<&mut Self, accessory::AccessorError> {
            #(#conversions)*
            #body
        }
    }
}

fn generate_restore(method: &MethodDescriptor) -> TokenStream {
    let name = format_ident!("{}", method.name);
    let state = method
        .parameters
        .first()
        .map(|p| local_ident(&p.name))
        .unwrap_or_else(|| format_ident!("state"));
    let body = expr::statements(&method.body, Receiver::SelfRef);

    quote! {
        pub fn #name(#state: std::collections::BTreeMap<String, accessory::Value>) -> Self {
            #body
        }
    }
}

#[cfg(test)]
mod tests {
    use accessory_define::{Attribute, Model, Struct};

    use super::*;
    use crate::naming::type_name;
    use crate::options::GeneratorOptions;
    use crate::planner::plan_struct;

    fn generate(item: Struct) -> String {
        let model = Model::new().with_struct(item.clone());
        let plan = plan_struct(&model, &item, &GeneratorOptions::default()).unwrap();
        let tokens = generate_struct(&plan, &type_name(&plan.name));
        let file: syn::File = syn::parse2(tokens).unwrap();
        prettyplease::unparse(&file)
    }

    /// Drops whitespace and the trailing commas prettyplease adds when it
    /// wraps a call, so assertions survive line wrapping.
    fn squash(code: &str) -> String {
        let compact: String = code.chars().filter(|c| !c.is_whitespace()).collect();
        compact.replace(",)", ")").replace(",}", "}").replace(",]", "]")
    }

    fn assert_has(code: &str, fragment: &str) {
        assert!(squash(code).contains(&squash(fragment)), "missing `{}` in:\n{}", fragment, code);
    }

    #[test]
    fn generates_record_backed_struct() {
        let code = generate(Struct::new("Person").with_attribute(Attribute::new("id", "int")));
        assert_has(&code, "pub struct Person");
        assert_has(&code, "record: accessory::Record");
        assert_has(&code, "impl Default for Person");
        assert_has(&code, "pub const FIELD_ID");
    }

    #[test]
    fn shadowed_fields_carry_raw_key() {
        let code = generate(Struct::new("S").with_attribute(Attribute::new("tag-list", "string")));
        assert_has(&code, r#"accessory::FieldKey::new("tag_list").with_shadow("tag-list")"#);
    }

    #[test]
    fn squash_ignores_wrapping_commas() {
        let wrapped = "FieldKey::new(\n    \"tag_list\",\n)\n.with_shadow(\"tag-list\")";
        assert_has(wrapped, r#"FieldKey::new("tag_list").with_shadow("tag-list")"#);
    }

    #[test]
    fn xml_getter_takes_mutable_receiver_and_flag() {
        let code = generate(Struct::new("S").with_attribute(Attribute::new("address", "string").xml()));
        assert_has(&code, "pub fn getAddress(&mut self, asString: Option<bool>");
        assert_has(&code, "asString.unwrap_or(true)");
    }

    #[test]
    fn plain_getter_borrows_immutably() {
        let code = generate(Struct::new("S").with_attribute(Attribute::new("id", "int")));
        assert_has(&code, "pub fn getId(&self)");
    }

    #[test]
    fn constructor_takes_optional_arguments_as_options() {
        let code = generate(
            Struct::new("S")
                .with_attribute(Attribute::new("note", "string"))
                .with_attribute(Attribute::new("id", "int").required()),
        );
        assert_has(
            &code,
            "pub fn new(id: impl Into<accessory::Value>, note: Option<accessory::Value>",
        );
    }

    #[test]
    fn reserved_parameter_names_are_suffixed() {
        let code = generate(Struct::new("S").with_attribute(Attribute::new("type", "string")));
        assert_has(&code, "pub fn setType(&mut self, type_: impl Into<accessory::Value>");
    }

    #[test]
    fn empty_struct_still_generates() {
        let code = generate(Struct::new("Empty"));
        assert_has(&code, "pub const FIELDS: &'static [accessory::FieldKey<'static>] = &[];");
        assert_has(&code, "pub fn new() -> Result<Self, accessory::AccessorError>");
    }
}
