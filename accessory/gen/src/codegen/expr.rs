//! Rendering of plan expressions and statements to Rust tokens.
//!
//! Every local is an `accessory::Value`, except boolean flag parameters which
//! are plain `bool`s. Guards and conversions call the `accessory::ops`
//! helpers the evaluator uses.

use accessory::{Comparison, ScalarType};
use accessory_define::Literal;
use proc_macro2::{Ident, Literal as LitToken, TokenStream};
use quote::{format_ident, quote};

use crate::ir::{Check, Expr, FieldRef, Message, MessagePart, Statement, Validation};

/// Words that cannot be used as generated locals or parameters.
const RESERVED: &[&str] = &[
    "_", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "this", "trait", "true",
    "try", "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Identifier of a parameter or local.
pub fn local_ident(name: &str) -> Ident {
    if RESERVED.contains(&name) {
        format_ident!("{}_", name)
    } else {
        format_ident!("{}", name)
    }
}

/// Name of the associated constant holding a field key.
pub fn field_const(field: &FieldRef) -> Ident {
    format_ident!("FIELD_{}", field.name.to_uppercase())
}

/// Who `Return(SelfRef)` and constructor calls refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// A method on `&mut self`.
    SelfRef,
    /// The constructor's `this` binding.
    This,
}

/// Renders statements of a method body.
pub fn statements(body: &[Statement], receiver: Receiver) -> TokenStream {
    Scope::default().statements(body, receiver)
}

/// Which operator joins the parts an expression is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Junction {
    And,
    Or,
}

/// Rendering context. `borrowed` names the loop binding that already
/// holds a `&Value`, so it is passed to helpers without another borrow.
#[derive(Debug, Clone, Copy, Default)]
struct Scope<'a> {
    borrowed: Option<&'a str>,
}

impl<'a> Scope<'a> {
    fn statements(self, body: &[Statement], receiver: Receiver) -> TokenStream {
        let rendered = body.iter().map(|s| self.statement(s, receiver));
        quote! { #(#rendered)* }
    }

    fn statement(self, statement: &Statement, receiver: Receiver) -> TokenStream {
        match statement {
            Statement::Guard(validation) => self.guard(validation),
            Statement::Let { name, value } => {
                let ident = local_ident(name);
                let value = self.value_tokens(value);
                quote! { let #ident: accessory::Value = #value; }
            }
            Statement::Assign { field, value } => {
                let key = field_const(field);
                let value = self.value_tokens(value);
                quote! { self.record.assign(&Self::#key, #value); }
            }
            Statement::Unset(field) => {
                let key = field_const(field);
                quote! { self.record.unset(&Self::#key); }
            }
            Statement::Append { field, value } => {
                let key = field_const(field);
                let value = self.value_tokens(value);
                quote! { self.record.append(&Self::#key, #value)?; }
            }
            Statement::If {
                condition,
                then,
                otherwise,
            } => {
                let condition = self.bool_tokens(condition);
                let then = self.statements(then, receiver);
                if otherwise.is_empty() {
                    quote! { if #condition { #then } }
                } else {
                    let otherwise = self.statements(otherwise, receiver);
                    quote! { if #condition { #then } else { #otherwise } }
                }
            }
            Statement::Apply {
                setter,
                argument,
                optional,
            } => {
                let setter = format_ident!("{}", setter);
                let argument = local_ident(argument);
                if *optional {
                    quote! {
                        if let Some(value) = #argument {
                            this.#setter(value)?;
                        }
                    }
                } else {
                    quote! { this.#setter(#argument)?; }
                }
            }
            Statement::Restore { state } => {
                let state = local_ident(state);
                quote! { Self { record: accessory::Record::from_state(#state, Self::FIELDS) } }
            }
            Statement::Return(Expr::SelfRef) => match receiver {
                Receiver::SelfRef => quote! { Ok(self) },
                Receiver::This => quote! { Ok(this) },
            },
            Statement::Return(expr) => {
                let value = self.value_tokens(expr);
                quote! { Ok(#value) }
            }
        }
    }

    fn guard(self, validation: &Validation) -> TokenStream {
        match validation {
            Validation::Chain(checks) => {
                let checks = checks.iter().map(|c| self.check(c));
                quote! { #(#checks)* }
            }
            Validation::EachItem {
                subject,
                binding,
                checks,
            } => {
                let inner = Scope {
                    borrowed: Some(binding.as_str()),
                };
                let subject = local_ident(subject);
                let binding = local_ident(binding);
                let checks = checks.iter().map(|c| inner.check(c));
                quote! {
                    if let Some(items) = #subject.as_list() {
                        for #binding in items {
                            #(#checks)*
                        }
                    }
                }
            }
        }
    }

    fn check(self, check: &Check) -> TokenStream {
        let condition = self.bool_tokens(&check.condition);
        let message = self.message_tokens(&check.message);
        quote! {
            if #condition {
                return Err(accessory::AccessorError::invalid_argument(#message));
            }
        }
    }

    /// A `format!` call producing the message.
    fn message_tokens(self, message: &Message) -> TokenStream {
        let mut template = String::new();
        let mut arguments: Vec<TokenStream> = Vec::new();
        for part in &message.parts {
            match part {
                MessagePart::Text(text) => {
                    template.push_str(&text.replace('{', "{{").replace('}', "}}"))
                }
                MessagePart::Describe(e) => {
                    let value = self.receiver_tokens(e);
                    template.push_str("{}");
                    arguments.push(quote! { #value.describe() });
                }
                MessagePart::TypeOf(e) => {
                    let value = self.receiver_tokens(e);
                    template.push_str("{}");
                    arguments.push(quote! { #value.type_name() });
                }
                MessagePart::Length(e) => {
                    let value = self.ref_tokens(e);
                    template.push_str("{}");
                    arguments.push(quote! { accessory::ops::char_length(#value).unwrap_or(0) });
                }
                MessagePart::FirstSet(fields) => {
                    let keys = field_keys(fields);
                    template.push_str("{}");
                    arguments.push(quote! { accessory::ops::first_set(&self.record, &[#(#keys),*]) });
                }
                MessagePart::BranchFailures(branches) => {
                    let branches = branches.iter().map(|checks| self.first_failure(checks));
                    template.push_str("{}");
                    arguments.push(quote! {
                        [#(#branches),*]
                            .into_iter()
                            .flatten()
                            .map(|failure| format!("\n - {failure}"))
                            .collect::<String>()
                    });
                }
            }
        }
        quote! { format!(#template #(, #arguments)*) }
    }

    /// `Option<String>` holding the message of the first failing check.
    fn first_failure(self, checks: &[Check]) -> TokenStream {
        let arms = checks.iter().map(|c| {
            let condition = self.bool_tokens(&c.condition);
            let message = self.message_tokens(&c.message);
            quote! { if #condition { Some(#message) } else }
        });
        quote! { #(#arms)* { Option::<String>::None } }
    }

    /// An expression producing an owned `Value`.
    fn value_tokens(self, expr: &Expr) -> TokenStream {
        if expr.is_predicate() {
            let truth = self.bool_tokens(expr);
            return quote! { accessory::Value::Bool(#truth) };
        }
        match expr {
            Expr::Var(name) => {
                let ident = local_ident(name);
                quote! { #ident.clone() }
            }
            Expr::Field(field) => {
                let key = field_const(field);
                quote! { self.record.get(&Self::#key)?.clone() }
            }
            Expr::FieldOrNull(field) => {
                let key = field_const(field);
                quote! { self.record.get_or_null(&Self::#key) }
            }
            Expr::Literal(literal) => literal_tokens(literal),
            Expr::Null | Expr::SelfRef => quote! { accessory::Value::Null },
            Expr::JoinList(inner, separator) => {
                let inner = self.ref_tokens(inner);
                quote! { accessory::ops::join_list(#inner, #separator) }
            }
            Expr::SerializeXml(inner) => {
                let inner = self.ref_tokens(inner);
                quote! { accessory::ops::serialize_xml(#inner) }
            }
            Expr::ParseXml(inner) => {
                let inner = self.ref_tokens(inner);
                quote! { accessory::ops::parse_xml(#inner) }
            }
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                let condition = self.bool_tokens(condition);
                let then = self.value_tokens(then);
                let otherwise = self.value_tokens(otherwise);
                quote! { if #condition { #then } else { #otherwise } }
            }
            predicate => {
                let truth = self.bool_tokens(predicate);
                quote! { accessory::Value::Bool(#truth) }
            }
        }
    }

    /// An expression producing a `&Value`.
    fn ref_tokens(self, expr: &Expr) -> TokenStream {
        match expr {
            Expr::Var(name) if self.borrowed == Some(name.as_str()) => {
                let ident = local_ident(name);
                quote! { #ident }
            }
            Expr::Var(name) => {
                let ident = local_ident(name);
                quote! { &#ident }
            }
            Expr::Field(field) => {
                let key = field_const(field);
                quote! { self.record.get(&Self::#key)? }
            }
            other => {
                let value = self.value_tokens(other);
                quote! { &(#value) }
            }
        }
    }

    /// A method receiver for a `Value`; auto-ref covers owned locals and
    /// borrowed bindings alike.
    fn receiver_tokens(self, expr: &Expr) -> TokenStream {
        match expr {
            Expr::Var(name) => {
                let ident = local_ident(name);
                quote! { #ident }
            }
            Expr::Field(field) => {
                let key = field_const(field);
                quote! { self.record.get(&Self::#key)? }
            }
            other => {
                let value = self.value_tokens(other);
                quote! { (#value) }
            }
        }
    }

    /// An expression producing a `bool`.
    fn bool_tokens(self, expr: &Expr) -> TokenStream {
        match expr {
            Expr::Flag(name) => {
                let ident = local_ident(name);
                quote! { #ident }
            }
            Expr::IsNull(e) => self.call("is_null", e),
            Expr::IsList(e) => self.call("is_list", e),
            Expr::IsEmpty(e) => self.call("is_empty", e),
            Expr::IsXmlDocument(e) => self.call("is_xml_document", e),
            Expr::HasXmlContent(e) => self.call("has_xml_content", e),
            Expr::IsPresent(field) => {
                let key = field_const(field);
                quote! { self.record.contains(&Self::#key) }
            }
            Expr::Not(inner) => {
                let inner = self.grouped(inner, None);
                quote! { !#inner }
            }
            Expr::And(parts) => self.joined(parts, Junction::And),
            Expr::Or(parts) => self.joined(parts, Junction::Or),
            Expr::Conforms(e, ty) => {
                let value = self.ref_tokens(e);
                let ty = scalar_tokens(*ty);
                quote! { accessory::ops::conforms(#value, #ty) }
            }
            Expr::Compare(e, op, bound) => {
                let value = self.ref_tokens(e);
                let op = comparison_tokens(*op);
                let bound = float_tokens(*bound);
                quote! { accessory::ops::compare(#value, #op, #bound) }
            }
            Expr::LengthCompare(e, op, bound) => {
                let value = self.ref_tokens(e);
                let op = comparison_tokens(*op);
                let bound = LitToken::usize_unsuffixed(*bound);
                quote! { accessory::ops::length_compare(#value, #op, #bound) }
            }
            Expr::MatchesPattern(e, pattern) => {
                let value = self.ref_tokens(e);
                quote! { accessory::ops::matches_pattern(#value, #pattern) }
            }
            Expr::OneOf(e, values) => {
                let value = self.ref_tokens(e);
                quote! { accessory::ops::one_of(#value, &[#(#values),*]) }
            }
            Expr::AnySet(fields) => {
                let keys = field_keys(fields);
                quote! { accessory::ops::any_set(&self.record, &[#(#keys),*]) }
            }
            Expr::NoBranchPasses(branches) => {
                let failing: Vec<Expr> = branches
                    .iter()
                    .map(|checks| Expr::Or(checks.iter().map(|c| c.condition.clone()).collect()))
                    .collect();
                self.joined(&failing, Junction::And)
            }
            other => {
                let value = self.value_tokens(other);
                quote! { (#value).is_truthy() }
            }
        }
    }

    fn call(self, helper: &str, expr: &Expr) -> TokenStream {
        let helper = format_ident!("{}", helper);
        let value = self.ref_tokens(expr);
        quote! { accessory::ops::#helper(#value) }
    }

    /// Parenthesizes a junction of more than one part unless it joins with
    /// the same operator as its parent. `None` is a negation.
    fn grouped(self, expr: &Expr, parent: Option<Junction>) -> TokenStream {
        let tokens = self.bool_tokens(expr);
        let junction = match expr {
            Expr::And(parts) if parts.len() > 1 => Some(Junction::And),
            Expr::Or(parts) if parts.len() > 1 => Some(Junction::Or),
            Expr::NoBranchPasses(branches) if branches.len() > 1 => Some(Junction::And),
            _ => None,
        };
        match junction {
            Some(junction) if parent != Some(junction) => quote! { (#tokens) },
            _ => tokens,
        }
    }

    fn joined(self, parts: &[Expr], junction: Junction) -> TokenStream {
        let mut rendered = parts.iter().map(|p| self.grouped(p, Some(junction)));
        let Some(first) = rendered.next() else {
            return match junction {
                Junction::And => quote! { true },
                Junction::Or => quote! { false },
            };
        };
        rendered.fold(first, |acc, part| match junction {
            Junction::And => quote! { #acc && #part },
            Junction::Or => quote! { #acc || #part },
        })
    }
}

fn field_keys(fields: &[FieldRef]) -> Vec<TokenStream> {
    fields
        .iter()
        .map(|f| {
            let key = field_const(f);
            quote! { Self::#key }
        })
        .collect()
}

fn scalar_tokens(ty: ScalarType) -> TokenStream {
    match ty {
        ScalarType::Integer => quote! { accessory::ScalarType::Integer },
        ScalarType::Decimal => quote! { accessory::ScalarType::Decimal },
        ScalarType::Boolean => quote! { accessory::ScalarType::Boolean },
        ScalarType::Text => quote! { accessory::ScalarType::Text },
    }
}

fn comparison_tokens(op: Comparison) -> TokenStream {
    match op {
        Comparison::Less => quote! { accessory::Comparison::Less },
        Comparison::LessOrEqual => quote! { accessory::Comparison::LessOrEqual },
        Comparison::Greater => quote! { accessory::Comparison::Greater },
        Comparison::GreaterOrEqual => quote! { accessory::Comparison::GreaterOrEqual },
        Comparison::Equal => quote! { accessory::Comparison::Equal },
    }
}

fn float_tokens(value: f64) -> TokenStream {
    if value.is_nan() {
        quote! { f64::NAN }
    } else if value.is_infinite() {
        if value > 0.0 {
            quote! { f64::INFINITY }
        } else {
            quote! { f64::NEG_INFINITY }
        }
    } else if value < 0.0 {
        let magnitude = LitToken::f64_suffixed(-value);
        quote! { -#magnitude }
    } else {
        let literal = LitToken::f64_suffixed(value);
        quote! { #literal }
    }
}

fn int_tokens(value: i64) -> TokenStream {
    if value < 0 {
        let magnitude = LitToken::u64_unsuffixed(value.unsigned_abs());
        quote! { -#magnitude }
    } else {
        let literal = LitToken::i64_suffixed(value);
        quote! { #literal }
    }
}

/// A `Value` built from a declared literal.
pub fn literal_tokens(literal: &Literal) -> TokenStream {
    match literal {
        Literal::Bool(b) => quote! { accessory::Value::Bool(#b) },
        Literal::Int(i) => {
            let i = int_tokens(*i);
            quote! { accessory::Value::Int(#i) }
        }
        Literal::Float(f) => {
            let f = float_tokens(*f);
            quote! { accessory::Value::Float(#f) }
        }
        Literal::Str(s) => quote! { accessory::Value::Str(#s.to_string()) },
        Literal::List(items) => {
            let items = items.iter().map(literal_tokens);
            quote! { accessory::Value::List(vec![#(#items),*]) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(expr: &Expr) -> String {
        Scope::default().bool_tokens(expr).to_string()
    }

    fn each_item(checks: Vec<Check>) -> String {
        let validation = Validation::EachItem {
            subject: "values".to_string(),
            binding: "item".to_string(),
            checks,
        };
        statements(&[Statement::Guard(validation)], Receiver::SelfRef).to_string()
    }

    #[test]
    fn reserved_words_get_a_suffix() {
        assert_eq!(local_ident("type").to_string(), "type_");
        assert_eq!(local_ident("this").to_string(), "this_");
        assert_eq!(local_ident("_").to_string(), "__");
        assert_eq!(local_ident("name").to_string(), "name");
    }

    #[test]
    fn nested_junctions_are_parenthesized() {
        let expr = Expr::Or(vec![
            Expr::is_null(Expr::var("a")),
            Expr::And(vec![Expr::IsList(Box::new(Expr::var("a"))), Expr::IsEmpty(Box::new(Expr::var("a")))]),
        ]);
        let code = render(&expr);
        assert!(code.contains("|| (accessory :: ops :: is_list"), "got: {code}");
    }

    #[test]
    fn same_operator_junctions_are_flattened() {
        let expr = Expr::And(vec![
            Expr::not_null(Expr::var("a")),
            Expr::And(vec![Expr::IsList(Box::new(Expr::var("a"))), Expr::IsEmpty(Box::new(Expr::var("a")))]),
        ]);
        let code = render(&expr);
        assert!(!code.contains("&& ("), "got: {code}");
        assert!(code.contains("&& accessory :: ops :: is_list"), "got: {code}");
    }

    #[test]
    fn negated_junctions_keep_their_parentheses() {
        let expr = Expr::not(Expr::Or(vec![Expr::Flag("a".into()), Expr::Flag("b".into())]));
        assert_eq!(render(&expr), "! (a || b)");
    }

    #[test]
    fn negative_literals_render_as_negation() {
        let code = literal_tokens(&Literal::Float(-1.5)).to_string();
        assert!(code.contains("- 1.5f64"), "got: {code}");
        let code = literal_tokens(&Literal::Int(-3)).to_string();
        assert!(code.contains("Int (- 3)"), "got: {code}");
    }

    #[test]
    fn message_braces_are_escaped() {
        let message = Message::new().text("pattern {2}").describe(&Expr::var("v"));
        let code = Scope::default().message_tokens(&message).to_string();
        assert!(code.contains("pattern {{2}}{}"), "got: {code}");
    }

    #[test]
    fn message_values_are_method_receivers() {
        let message = Message::new()
            .text("Invalid value ")
            .describe(&Expr::var("v"))
            .text(", ")
            .type_of(&Expr::var("v"))
            .text(" given");
        let code = Scope::default().message_tokens(&message).to_string();
        assert!(code.contains(", v . describe ()"), "got: {code}");
        assert!(code.contains(", v . type_name ()"), "got: {code}");
        assert!(!code.contains("& v"), "got: {code}");
    }

    #[test]
    fn loop_bindings_are_not_borrowed_again() {
        let check = Check {
            rule: "float",
            condition: Expr::not(Expr::Conforms(Box::new(Expr::var("item")), ScalarType::Decimal)),
            message: Message::new().describe(&Expr::var("item")),
        };
        let code = each_item(vec![check]);
        assert!(code.contains("conforms (item ,"), "got: {code}");
        assert!(code.contains("item . describe ()"), "got: {code}");
        assert!(!code.contains("& item"), "got: {code}");
    }

    #[test]
    fn owned_locals_are_borrowed_for_helpers() {
        let code = render(&Expr::is_null(Expr::var("value")));
        assert_eq!(code, "accessory :: ops :: is_null (& value)");
    }

    #[test]
    fn generated_expressions_parse() {
        let expr = Expr::And(vec![
            Expr::not_null(Expr::var("v")),
            Expr::not(Expr::Compare(Box::new(Expr::var("v")), Comparison::Less, -2.0)),
        ]);
        let tokens = Scope::default().bool_tokens(&expr);
        syn::parse2::<syn::Expr>(tokens).unwrap();
    }
}
