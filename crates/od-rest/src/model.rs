//! The entity-model contract.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A typed record of one OData entity.
///
/// Serde attributes on the implementing type handle body serialization and
/// response validation; [`EntityModel::field_aliases`] additionally maps
/// logical field names to their wire aliases so `$filter`, `$select` and
/// `$expand` can be written against the logical names.
pub trait EntityModel: DeserializeOwned + Serialize {
    /// Logical-name → wire-alias pairs, in `$select` order.
    ///
    /// An empty table means the model exposes no alias information; filters
    /// then pass field names through untranslated and no `$select` is sent.
    fn field_aliases() -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// The wire alias of a logical field, if declared.
    fn wire_name(field: &str) -> Option<&'static str> {
        Self::field_aliases()
            .iter()
            .find(|(logical, _)| *logical == field)
            .map(|(_, wire)| *wire)
    }

    /// The alias table as an owned map, the shape filter rendering takes.
    fn field_mapping() -> HashMap<String, String> {
        Self::field_aliases()
            .iter()
            .map(|(logical, wire)| (logical.to_string(), wire.to_string()))
            .collect()
    }
}
