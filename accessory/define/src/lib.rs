//! Accessory Definition Library
//!
//! This crate provides the model consumed by the `accessory-gen` generator:
//! schema structs, their attributes and the restrictions (closed value
//! lists) attributes may reference. Models are built in code or loaded from
//! JSON/YAML files produced by an external schema parser.
//!
//! ## Core Types
//!
//! - [`Model`] - Structs and restrictions for one generation pass
//! - [`Struct`] - A named, ordered list of attributes
//! - [`Attribute`] - Declared type, flags, default, facets and references
//! - [`Restriction`] - A base type limited to a closed list of values
//! - [`Facets`] - Pattern, length and range facets of an attribute
//! - [`Literal`] - Literal default values
//! - [`AttributeIndex`] - Raw-or-clean name lookup built once per struct
//!
//! ## Examples
//!
//! ```
//! use accessory_define::{Attribute, Model, Struct};
//!
//! let model = Model::new().with_struct(
//!     Struct::new("Person")
//!         .with_attribute(Attribute::new("id", "int").required())
//!         .with_attribute(Attribute::new("tags", "string").array().removable())
//!         .with_attribute(Attribute::new("address", "string").xml()),
//! );
//!
//! let person = model.get_struct("Person").unwrap();
//! assert_eq!(person.constructor_order(), vec![0, 1, 2]);
//! assert!(person.attribute("tags").unwrap().removable_from_request);
//! ```

pub mod error;
pub mod identifier;
pub mod index;
pub mod model;
pub mod prelude;
pub mod types;

pub use error::ModelError;
pub use identifier::clean_name;
pub use index::AttributeIndex;
pub use model::{Attribute, Model, Restriction, Struct};
pub use types::{Facets, Literal};
