//! Recursive expansion of tabular-section property types.

use std::collections::HashSet;

use crate::catalog::MAX_EXPANSION_DEPTH;
use crate::parse::MetadataCache;
use crate::types::ExpandedProperty;

/// Expand the property list of `entity_type` into a bounded tree.
///
/// Unknown entity types expand to an empty list.
pub(crate) fn expand_properties(cache: &MetadataCache, entity_type: &str) -> Vec<ExpandedProperty> {
    let visited = HashSet::from([entity_type.to_string()]);
    expand(cache, entity_type, &visited, 0)
}

fn expand(
    cache: &MetadataCache,
    type_name: &str,
    visited: &HashSet<String>,
    depth: u32,
) -> Vec<ExpandedProperty> {
    if depth > MAX_EXPANSION_DEPTH {
        return Vec::new();
    }
    let Some(properties) = cache.entity_type_properties.get(type_name) else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|property| match collection_element_type(&property.type_name) {
            Some(referenced) if cache.entity_type_properties.contains_key(referenced) => {
                let nested = if visited.contains(referenced) || depth + 1 > MAX_EXPANSION_DEPTH {
                    // A type already on this expansion chain, or one past the
                    // depth cap, expands to nothing.
                    Vec::new()
                } else {
                    // Each sibling branch expands against its own visited set.
                    let mut branch = visited.clone();
                    branch.insert(referenced.to_string());
                    expand(cache, referenced, &branch, depth + 1)
                };
                ExpandedProperty {
                    name: property.name.clone(),
                    type_name: property.type_name.clone(),
                    collection: true,
                    depth,
                    nested,
                }
            }
            _ => ExpandedProperty {
                name: property.name.clone(),
                type_name: property.type_name.clone(),
                collection: false,
                depth,
                nested: Vec::new(),
            },
        })
        .collect()
}

/// The entity type referenced by a `Collection(<ns>.<TypeName>_RowType)`
/// declaration, or None for any other type string.
pub(crate) fn collection_element_type(declared: &str) -> Option<&str> {
    let inner = declared.strip_prefix("Collection(")?.strip_suffix(')')?;
    let unqualified = inner.rsplit('.').next()?;
    unqualified.strip_suffix("_RowType")
}
