//! Helper types for restrictions.
//!
//! Every restriction of the model becomes a unit struct exposing its allowed
//! values, so callers can check a value before handing it to a setter.

use accessory_define::Restriction;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::naming::type_name;

/// Generates the `restrictions` module body.
///
/// ## Examples
///
/// ```ignore
/// // Generated for Restriction { name: "Colour", values: ["red", "blue"] }:
/// pub struct Colour;
///
/// impl Colour {
///     pub const VALUES: &'static [&'static str] = &["red", "blue"];
///     pub fn value_is_valid(value: &accessory::Value) -> bool { ... }
///     pub fn valid_values() -> &'static [&'static str] { Self::VALUES }
/// }
/// ```
pub fn generate_restrictions(restrictions: &[Restriction]) -> TokenStream {
    let types = restrictions.iter().map(generate_restriction);
    quote! {
        //! Allowed values of every restriction.

        #(#types)*
    }
}

fn generate_restriction(restriction: &Restriction) -> TokenStream {
    let ident = format_ident!("{}", type_name(&restriction.name));
    let values = &restriction.values;
    let summary = if restriction.packaged_name == restriction.name {
        format!(" Allowed values of the `{}` restriction.", restriction.name)
    } else {
        format!(
            " Allowed values of the `{}` restriction (`{}`).",
            restriction.name, restriction.packaged_name
        )
    };
    let base = format!(" Base type: `{}`.", restriction.base);

    quote! {
        #[doc = #summary]
        #[doc = ""]
        #[doc = #base]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct #ident;

        impl #ident {
            pub const VALUES: &'static [&'static str] = &[#(#values),*];

            /// Returns `true` if the value is one of [`Self::VALUES`].
            pub fn value_is_valid(value: &accessory::Value) -> bool {
                accessory::ops::one_of(value, Self::VALUES)
            }

            pub fn valid_values() -> &'static [&'static str] {
                Self::VALUES
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_one_type_per_restriction() {
        let tokens = generate_restrictions(&[
            Restriction::new("Colour", ["red", "blue"]),
            Restriction::new("size-code", ["S", "M"]).with_base("token"),
        ]);
        let file: syn::File = syn::parse2(tokens).unwrap();
        let code = prettyplease::unparse(&file);
        assert!(code.contains("pub struct Colour;"), "got:\n{}", code);
        assert!(code.contains("pub struct Size_code;"), "got:\n{}", code);
        assert!(code.contains(r#"&["red", "blue"]"#));
    }
}
