//! Convenient re-exports for building models in code.
//!
//! ## Examples
//!
//! ```
//! use accessory_define::prelude::*;
//!
//! let model = Model::new()
//!     .with_restriction(Restriction::new("Colour", ["red", "blue"]))
//!     .with_struct(
//!         Struct::new("Paint").with_attribute(Attribute::new("colour", "Colour").required()),
//!     );
//! assert_eq!(model.restriction("Colour").unwrap().values.len(), 2);
//! ```

pub use crate::error::ModelError;
pub use crate::model::{Attribute, Model, Restriction, Struct};
pub use crate::types::{Facets, Literal};
