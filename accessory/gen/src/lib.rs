//! Accessor method planner and code generator.
//!
//! This crate turns schema structs defined with `accessory-define` into
//! accessor plans and, from those plans, into Rust source code backed by the
//! `accessory` runtime. For every attribute of a struct it produces:
//!
//! - A constructor parameter routed through the generated setter
//! - A getter (XML attributes take an `asString` flag)
//! - A setter guarded by the attribute's validation rules
//! - An `addTo` method for array attributes
//! - A `fromState` method rebuilding an instance from exported values
//!
//! ## Modules
//!
//! - [`naming`] - Collision-free identifiers per struct
//! - [`types`] - Resolution of declared attribute types
//! - [`rules`] - The closed set of validation rules
//! - [`planner`] - Struct plans built from the model
//! - [`ir`] - Plan descriptors, statements and expressions
//! - [`eval`] - Direct evaluation of plans
//! - [`codegen`] - Code generation for individual components
//! - [`output`] - Final assembly, validation, and file writing
//! - [`cargo_gen`] - Cargo.toml generation for the output package
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```
//! use accessory::Value;
//! use accessory_define::{Attribute, Model, Struct};
//! use accessory_gen::eval::Evaluator;
//! use accessory_gen::options::GeneratorOptions;
//! use accessory_gen::planner::plan_model;
//!
//! let model = Model::new().with_struct(
//!     Struct::new("Person")
//!         .with_attribute(Attribute::new("id", "int").required())
//!         .with_attribute(Attribute::new("tags", "string").array()),
//! );
//! let report = plan_model(&model, &GeneratorOptions::default());
//! assert!(report.is_success());
//!
//! let evaluator = Evaluator::new(&report.plans[0]);
//! let mut person = evaluator.construct_values(vec![Value::from(1)]).unwrap();
//! evaluator
//!     .call(&mut person, "setTags", vec![Value::from(vec!["a", "b"])])
//!     .unwrap();
//! assert_eq!(person.export()["tags"], Value::from("a b"));
//! ```
//!
//! ## Generated Code Structure
//!
//! For a struct `Person { id: int }`:
//!
//! ```text
//! pub struct Person { record: accessory::Record }
//!
//! impl Person {
//!     pub const FIELD_ID: accessory::FieldKey<'static> = ...;
//!     pub fn new(id: impl Into<Value>) -> Result<Self, AccessorError>;
//!     pub fn getId(&self) -> Result<Value, AccessorError>;
//!     pub fn setId(&mut self, id: impl Into<Value>) -> Result<&mut Self, AccessorError>;
//!     pub fn fromState(state: BTreeMap<String, Value>) -> Self;
//! }
//! ```

pub mod cargo_gen;
pub mod codegen;
pub mod errors;
pub mod eval;
pub mod ir;
pub mod naming;
pub mod options;
pub mod output;
pub mod planner;
pub mod rules;
pub mod types;
pub mod validation;

#[doc(hidden)]
pub mod test_utils;
