//! Raw-or-clean name lookup for the attributes of one struct.

use std::collections::HashMap;

use crate::model::Attribute;

/// Maps both the raw and the clean name of every attribute to its position
/// in the owning struct.
///
/// Built once per struct when the struct is assembled or loaded. Lookups
/// are exact; when a raw name of one attribute equals the clean name of
/// another, the attribute declared first wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeIndex {
    positions: HashMap<String, usize>,
}

impl AttributeIndex {
    /// Builds the index over attributes in declared order.
    pub fn build(attributes: &[Attribute]) -> Self {
        let mut positions = HashMap::with_capacity(attributes.len() * 2);
        for (position, attribute) in attributes.iter().enumerate() {
            positions
                .entry(attribute.raw_name.clone())
                .or_insert(position);
            positions
                .entry(attribute.clean_name.clone())
                .or_insert(position);
        }
        Self { positions }
    }

    /// Position of the attribute known by `name` (raw or clean).
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }
}
