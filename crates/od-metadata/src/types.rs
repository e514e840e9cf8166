//! Property descriptors parsed from the metadata document.

use serde::Serialize;

/// A property exactly as declared on an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    /// The `Name` attribute.
    pub name: String,
    /// The `Type` attribute, e.g. `Edm.String` or
    /// `Collection(StandardODATA.OrderLine_RowType)`.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Property {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A property with recursive expansion applied.
///
/// Scalar properties keep `collection = false` and an empty `nested` list.
/// A tabular-section property (`Collection(..._RowType)` type) is marked as
/// a collection and carries the expansion of the referenced entity type in
/// `nested`, each level tagged with its depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub collection: bool,
    pub depth: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<ExpandedProperty>,
}
