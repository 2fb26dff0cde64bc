//! Runtime support for generated accessor methods.
//!
//! Code emitted by `accessory-gen` stores every attribute of a struct in a
//! [`Record`] and delegates its guard checks and value conversions to the
//! helpers in [`ops`]. The plan evaluator in `accessory-gen` uses the very
//! same helpers, so evaluated plans and emitted code share one behavior.
//!
//! ## Features
//!
//! - **Dynamic values**: [`Value`] covers scalars, sequences and XML documents
//! - **XML documents**: [`XmlDocument`] parses and serializes with `quick-xml`
//! - **Shadow slots**: [`Record`] keeps raw-named slots in sync with their
//!   clean-named fields through a single `assign` operation
//! - **Guard helpers**: type, range, length, pattern, enumeration and choice
//!   predicates used by generated setters
//!
//! ## Example
//!
//! ```rust
//! use accessory::{FieldKey, Record, Value};
//!
//! const TAGS: FieldKey<'static> = FieldKey::new("tags").with_shadow("tag-list");
//!
//! let mut record = Record::new();
//! record.assign(&TAGS, Value::from("a b"));
//!
//! assert_eq!(record.get(&TAGS).unwrap(), &Value::from("a b"));
//! assert_eq!(record.shadow("tag-list"), Some(&Value::from("a b")));
//! ```

pub mod error;
pub mod ops;
pub mod record;
pub mod value;
pub mod xml;

pub use error::{AccessorError, XmlError};
pub use ops::{Comparison, ScalarType};
pub use record::{FieldKey, Record};
pub use value::Value;
pub use xml::{XmlDocument, XmlElement, XmlNode};
