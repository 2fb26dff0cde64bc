//! Code generation modules for accessory.
//!
//! This module contains generators that produce Rust source code from
//! struct plans. Each submodule handles a specific component of the
//! generated crate.
//!
//! ## Submodules
//!
//! - [`expr`] - Renders plan statements and expressions
//! - [`module_docs`] - Generates module-level documentation per struct
//! - [`restrictions`] - Generates helper types for restrictions
//! - [`struct_module`] - Generates the record-backed struct and its methods
//!
//! ## Code Generation Flow
//!
//! 1. Each plan gets module docs via [`ModuleDocBuilder`]
//! 2. The struct and its accessors are generated via [`generate_struct`]
//! 3. Restrictions get helper types via [`generate_restrictions`]
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`, which is then:
//! - Validated with `syn::parse2` to ensure correctness
//! - Formatted with `prettyplease` for consistent style
//!
//! See [`crate::output`] for the assembly and file writing logic.

pub mod expr;
pub mod module_docs;
pub mod restrictions;
pub mod struct_module;

pub use module_docs::ModuleDocBuilder;
pub use restrictions::generate_restrictions;
pub use struct_module::generate_struct;
