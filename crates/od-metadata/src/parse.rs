//! EDM document parsing.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::{Error, ErrorKind, Result};
use crate::types::Property;

/// The EDM namespace 1C metadata documents declare their schema in.
pub const EDM_NAMESPACE: &str = "http://schemas.microsoft.com/ado/2009/11/edm";

/// The parsed metadata document.
#[derive(Debug, Default)]
pub(crate) struct MetadataCache {
    pub(crate) entity_sets: Vec<String>,
    pub(crate) entity_types: Vec<String>,
    pub(crate) entity_type_properties: HashMap<String, Vec<Property>>,
}

/// Parse a `$metadata` document into its navigable structures.
///
/// Every `EntitySet` and `EntityType` in the EDM namespace contributes its
/// `Name`; `Property` elements contribute `Name`/`Type` pairs to the
/// enclosing entity type. Elements missing those attributes are skipped,
/// matching what the service itself tolerates.
pub(crate) fn parse_metadata(xml: &str) -> Result<MetadataCache> {
    let mut reader = NsReader::from_str(xml);
    let mut cache = MetadataCache::default();
    let mut current_type: Option<String> = None;

    loop {
        let (resolve, event) = reader
            .read_resolved_event()
            .map_err(|e| Error::with_source(ErrorKind::Parse(e.to_string()), e))?;
        let in_edm = matches!(
            resolve,
            ResolveResult::Bound(Namespace(ns)) if ns == EDM_NAMESPACE.as_bytes()
        );

        match event {
            Event::Start(ref element) if in_edm => {
                open_element(element, true, &mut cache, &mut current_type)?;
            }
            Event::Empty(ref element) if in_edm => {
                open_element(element, false, &mut cache, &mut current_type)?;
            }
            Event::End(ref element) if in_edm && element.local_name().as_ref() == b"EntityType" => {
                current_type = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(cache)
}

fn open_element(
    element: &BytesStart<'_>,
    is_container: bool,
    cache: &mut MetadataCache,
    current_type: &mut Option<String>,
) -> Result<()> {
    match element.local_name().as_ref() {
        b"EntitySet" => {
            if let Some(name) = attr(element, b"Name")? {
                cache.entity_sets.push(name);
            }
        }
        b"EntityType" => {
            if let Some(name) = attr(element, b"Name")? {
                cache.entity_types.push(name.clone());
                cache.entity_type_properties.entry(name.clone()).or_default();
                // A self-closing EntityType has no Property children to collect.
                *current_type = is_container.then_some(name);
            } else {
                *current_type = None;
            }
        }
        b"Property" => {
            if let Some(entity_type) = current_type.as_deref() {
                if let (Some(name), Some(type_name)) =
                    (attr(element, b"Name")?, attr(element, b"Type")?)
                {
                    if let Some(properties) = cache.entity_type_properties.get_mut(entity_type) {
                        properties.push(Property::new(name, type_name));
                    }
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn attr(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute =
            attribute.map_err(|e| Error::with_source(ErrorKind::Parse(e.to_string()), e))?;
        if attribute.key.local_name().as_ref() == name {
            let value = attribute
                .unescape_value()
                .map_err(|e| Error::with_source(ErrorKind::Parse(e.to_string()), e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx xmlns:edmx="http://schemas.microsoft.com/ado/2007/06/edmx" Version="1.0">
  <edmx:DataServices>
    <Schema xmlns="http://schemas.microsoft.com/ado/2009/11/edm" Namespace="StandardODATA">
      <EntityType Name="TestEntity">
        <Property Name="ID" Type="Edm.Int32"/>
        <Property Name="Name" Type="Edm.String"/>
      </EntityType>
      <EntityType Name="Empty"/>
      <EntityContainer Name="StandardODATA">
        <EntitySet Name="TestEntities" EntityType="StandardODATA.TestEntity"/>
        <EntitySet EntityType="StandardODATA.Nameless"/>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

    #[test]
    fn test_parses_entity_sets_and_types() {
        let cache = parse_metadata(FIXTURE).unwrap();
        assert_eq!(cache.entity_sets, vec!["TestEntities"]);
        assert_eq!(cache.entity_types, vec!["TestEntity", "Empty"]);
    }

    #[test]
    fn test_parses_properties_in_declaration_order() {
        let cache = parse_metadata(FIXTURE).unwrap();
        assert_eq!(
            cache.entity_type_properties["TestEntity"],
            vec![
                Property::new("ID", "Edm.Int32"),
                Property::new("Name", "Edm.String"),
            ]
        );
    }

    #[test]
    fn test_self_closing_entity_type_has_no_properties() {
        let cache = parse_metadata(FIXTURE).unwrap();
        assert!(cache.entity_type_properties["Empty"].is_empty());
    }

    #[test]
    fn test_skips_incomplete_properties() {
        let xml = r#"<Schema xmlns="http://schemas.microsoft.com/ado/2009/11/edm">
          <EntityType Name="T">
            <Property Name="OnlyName"/>
            <Property Type="Edm.String"/>
            <Property Name="Ok" Type="Edm.String"/>
          </EntityType>
        </Schema>"#;
        let cache = parse_metadata(xml).unwrap();
        assert_eq!(
            cache.entity_type_properties["T"],
            vec![Property::new("Ok", "Edm.String")]
        );
    }

    #[test]
    fn test_foreign_namespace_elements_are_ignored() {
        let xml = r#"<Schema xmlns="http://example.com/not-edm">
          <EntityType Name="Alien"/>
        </Schema>"#;
        let cache = parse_metadata(xml).unwrap();
        assert!(cache.entity_types.is_empty());
    }

    #[test]
    fn test_malformed_xml_is_a_parse_error() {
        let err = parse_metadata("<Schema><EntityType").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Parse(_)));
    }
}
