//! # od-metadata
//!
//! Metadata catalog for 1C OData services.
//!
//! The catalog fetches the `$metadata` EDM document once, lazily, on the
//! first accessor call, parses entity-set names, entity-type names and
//! per-type property lists, and caches the result until [`MetadataCatalog::invalidate`]
//! resets it. Tabular-section properties declared as
//! `Collection(<namespace>.<TypeName>_RowType)` can be expanded recursively
//! into a bounded property tree.
//!
//! ## Example
//!
//! ```rust,ignore
//! use odata1c_client::{Connection, Credentials};
//! use odata1c_metadata::MetadataCatalog;
//!
//! let conn = Connection::new("1c.example.com", "https", Credentials::new("u", "p"))?;
//! let mut catalog = MetadataCatalog::new(conn, "zup-demo");
//!
//! for entity_type in catalog.entity_types().await? {
//!     println!("{entity_type}");
//! }
//! let tree = catalog.properties("Document_Заказ").await?;
//! ```
//!
//! Accessors take `&mut self`: the cache is single-owner state, and callers
//! sharing one catalog across tasks must serialize access themselves.

mod catalog;
mod error;
mod expand;
mod parse;
mod types;

pub use catalog::{MetadataCatalog, MAX_EXPANSION_DEPTH};
pub use error::{Error, ErrorKind, Result};
pub use parse::EDM_NAMESPACE;
pub use types::{ExpandedProperty, Property};
