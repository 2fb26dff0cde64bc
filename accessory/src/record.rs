//! Attribute storage for generated structs.

use std::collections::BTreeMap;

use tracing::trace;

use crate::error::AccessorError;
use crate::value::Value;

/// Identifies a field of a generated struct.
///
/// `name` is the clean field name. `shadow` is the raw declared name when it
/// differs from the clean one; every write to the field is mirrored into the
/// shadow slot so both names always hold the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey<'a> {
    name: &'a str,
    shadow: Option<&'a str>,
}

impl<'a> FieldKey<'a> {
    /// A field whose declared name is already a valid identifier.
    pub const fn new(name: &'a str) -> Self {
        Self { name, shadow: None }
    }

    /// Adds the raw declared name mirrored by this field.
    pub const fn with_shadow(self, raw: &'a str) -> Self {
        Self {
            name: self.name,
            shadow: Some(raw),
        }
    }

    /// Clean field name.
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Raw declared name, if it differs from the clean one.
    pub const fn shadow(&self) -> Option<&'a str> {
        self.shadow
    }
}

/// Field storage for one generated struct instance.
///
/// An absent field and a field holding [`Value::Null`] are distinct: removable
/// attributes are removed from the record, the rest store null.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    primary: BTreeMap<String, Value>,
    shadow: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` in the field and in its shadow slot.
    pub fn assign(&mut self, key: &FieldKey<'_>, value: Value) {
        trace!(field = key.name(), value = %value.describe(), "assign");
        if let Some(raw) = key.shadow() {
            self.shadow.insert(raw.to_string(), value.clone());
        }
        self.primary.insert(key.name().to_string(), value);
    }

    /// Removes the field and its shadow slot.
    pub fn unset(&mut self, key: &FieldKey<'_>) {
        trace!(field = key.name(), "unset");
        if let Some(raw) = key.shadow() {
            self.shadow.remove(raw);
        }
        self.primary.remove(key.name());
    }

    /// Returns `true` if the field is present, even when it holds null.
    pub fn contains(&self, key: &FieldKey<'_>) -> bool {
        self.primary.contains_key(key.name())
    }

    /// Returns `true` if the field is present and not null.
    pub fn is_set(&self, key: &FieldKey<'_>) -> bool {
        self.primary.get(key.name()).is_some_and(|v| !v.is_null())
    }

    /// Stored value of the field.
    ///
    /// # Errors
    ///
    /// Returns [`AccessorError::UnsetField`] if the field is absent.
    pub fn get(&self, key: &FieldKey<'_>) -> Result<&Value, AccessorError> {
        self.primary
            .get(key.name())
            .ok_or_else(|| AccessorError::UnsetField {
                field: key.name().to_string(),
            })
    }

    /// Stored value of the field, or null when it is absent.
    pub fn get_or_null(&self, key: &FieldKey<'_>) -> Value {
        self.primary.get(key.name()).cloned().unwrap_or_default()
    }

    /// Appends `item` to a sequence field.
    ///
    /// An absent or null field starts a new sequence.
    ///
    /// # Errors
    ///
    /// Returns [`AccessorError::NotASequence`] if the field holds a non-null
    /// value that is not a sequence. The record is left unchanged.
    pub fn append(&mut self, key: &FieldKey<'_>, item: Value) -> Result<(), AccessorError> {
        let mut items = match self.primary.get(key.name()) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::List(items)) => items.clone(),
            Some(_) => {
                return Err(AccessorError::NotASequence {
                    field: key.name().to_string(),
                });
            }
        };
        items.push(item);
        self.assign(key, Value::List(items));
        Ok(())
    }

    /// Value of a shadow slot, by raw name.
    pub fn shadow(&self, raw: &str) -> Option<&Value> {
        self.shadow.get(raw)
    }

    /// Every present field by clean name, followed by every shadow slot by
    /// raw name.
    pub fn export(&self) -> BTreeMap<String, Value> {
        let mut out = self.primary.clone();
        for (raw, value) in &self.shadow {
            out.entry(raw.clone()).or_insert_with(|| value.clone());
        }
        out
    }

    /// Rebuilds a record from exported state without running any guard.
    ///
    /// Entries named by a clean field name land in that field. Entries named
    /// only by a raw name land in the matching clean field. Shadow slots are
    /// then re-mirrored from the clean fields. Unknown entries are kept as
    /// plain fields.
    pub fn from_state(state: BTreeMap<String, Value>, keys: &[FieldKey<'_>]) -> Self {
        let mut record = Self::new();
        let mut rest = state;

        for key in keys {
            let clean = rest.remove(key.name());
            let raw = key.shadow().and_then(|raw| rest.remove(raw));
            if let Some(value) = clean.or(raw) {
                record.assign(key, value);
            }
        }
        for (name, value) in rest {
            record.primary.insert(name, value);
        }

        trace!(fields = record.primary.len(), "restored record from state");
        record
    }
}
