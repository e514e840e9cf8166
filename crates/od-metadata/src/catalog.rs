//! The metadata catalog: lazy load, cached access, invalidation.

use odata1c_client::{Connection, ODataRequest};
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::expand::expand_properties;
use crate::parse::{parse_metadata, MetadataCache};
use crate::types::{ExpandedProperty, Property};

/// Hard cap on recursive expansion depth.
pub const MAX_EXPANSION_DEPTH: u32 = 5;

const ODATA_PATH: &str = "odata/standard.odata";
const METADATA_PATH: &str = "$metadata";

#[derive(Debug)]
enum CatalogState {
    Unloaded,
    Loaded(MetadataCache),
}

/// Catalog over one database's `$metadata` document.
///
/// Empty at construction; the first accessor call fetches and parses the
/// document, later calls serve the cache. [`MetadataCatalog::invalidate`]
/// resets to the unloaded state, and the next accessor rebuilds the cache
/// from scratch (replace, not merge).
#[derive(Debug)]
pub struct MetadataCatalog {
    connection: Connection,
    database: String,
    state: CatalogState,
}

impl MetadataCatalog {
    /// Create an unloaded catalog for the given database.
    pub fn new(connection: Connection, database: impl Into<String>) -> Self {
        Self {
            connection,
            database: database.into(),
            state: CatalogState::Unloaded,
        }
    }

    /// The database this catalog describes.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Whether the cache is currently populated.
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, CatalogState::Loaded(_))
    }

    /// Names of all entity sets, in document order.
    pub async fn entity_sets(&mut self) -> Result<&[String]> {
        Ok(&self.load().await?.entity_sets)
    }

    /// Names of all entity types, in document order.
    pub async fn entity_types(&mut self) -> Result<&[String]> {
        Ok(&self.load().await?.entity_types)
    }

    /// The declared property list of `entity_type`, without expansion.
    ///
    /// An unknown entity type yields an empty slice, not an error.
    pub async fn raw_properties(&mut self, entity_type: &str) -> Result<&[Property]> {
        let cache = self.load().await?;
        Ok(cache
            .entity_type_properties
            .get(entity_type)
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }

    /// The recursively expanded property tree of `entity_type`.
    ///
    /// Tabular-section properties carry the expansion of their row type in
    /// `nested`, bounded by [`MAX_EXPANSION_DEPTH`] and cycle detection.
    /// An unknown entity type yields an empty list, not an error.
    pub async fn properties(&mut self, entity_type: &str) -> Result<Vec<ExpandedProperty>> {
        let cache = self.load().await?;
        Ok(expand_properties(cache, entity_type))
    }

    /// Drop the cached document. The next accessor call refetches.
    pub fn invalidate(&mut self) {
        self.state = CatalogState::Unloaded;
        debug!(database = %self.database, "metadata cache invalidated");
    }

    async fn load(&mut self) -> Result<&MetadataCache> {
        if matches!(self.state, CatalogState::Unloaded) {
            let cache = self.fetch_and_parse().await?;
            debug!(
                database = %self.database,
                entity_sets = cache.entity_sets.len(),
                entity_types = cache.entity_types.len(),
                "metadata loaded"
            );
            self.state = CatalogState::Loaded(cache);
        }
        match &self.state {
            CatalogState::Loaded(cache) => Ok(cache),
            CatalogState::Unloaded => Err(Error::new(ErrorKind::Client(
                "metadata state lost after load".to_string(),
            ))),
        }
    }

    #[instrument(skip(self), fields(database = %self.database))]
    async fn fetch_and_parse(&self) -> Result<MetadataCache> {
        let relative_url = format!("{}/{}/{}", self.database, ODATA_PATH, METADATA_PATH);
        let response = self
            .connection
            .send(ODataRequest::get(relative_url).accept_xml())
            .await?;
        response.expect_status(200)?;
        parse_metadata(response.text())
    }
}
