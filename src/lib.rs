//! # odata1c-api
//!
//! A 1C OData client library for Rust.
//!
//! This library provides typed access to the standard OData interface of
//! 1C publications: Django-style filter expressions, lazily cached schema
//! metadata, and per-entity CRUD managers.
//!
//! ## Security
//!
//! Basic-auth credentials are redacted in Debug output and skipped in
//! tracing spans.
//!
//! ## Crates
//!
//! - **odata1c-client** - HTTP connection layer: requests, buffered
//!   responses, error classification
//! - **odata1c-query** - `$filter` expression builder (`Q`)
//! - **odata1c-metadata** - `$metadata` catalog with recursive expansion of
//!   tabular sections
//! - **odata1c-rest** - entity managers: queries, CRUD, document posting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use odata1c_api::{Connection, Credentials, EntityManager, EntityModel, Q};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Person {
//!     #[serde(rename = "Description")]
//!     name: String,
//! }
//!
//! impl EntityModel for Person {
//!     fn field_aliases() -> &'static [(&'static str, &'static str)] {
//!         &[("name", "Description")]
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let conn = Connection::new(
//!         "1c.example.com",
//!         "https",
//!         Credentials::new("svc-user", "secret"),
//!     )?;
//!
//!     let mut manager = EntityManager::<Person>::new(
//!         conn,
//!         "zup-demo",
//!         "Catalog_ФизическиеЛица",
//!     )
//!     .filter(Q::new("name", "Ivanov")?)
//!     .top(10);
//!
//!     for person in manager.all(true).await? {
//!         println!("{}", person.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "client")]
pub use odata1c_client as client;
#[cfg(feature = "metadata")]
pub use odata1c_metadata as metadata;
#[cfg(feature = "query")]
pub use odata1c_query as query;
#[cfg(feature = "rest")]
pub use odata1c_rest as rest;

// Re-export commonly used types at the top level
#[cfg(feature = "client")]
pub use odata1c_client::{ClientConfig, Connection, Credentials};
#[cfg(feature = "metadata")]
pub use odata1c_metadata::MetadataCatalog;
#[cfg(feature = "query")]
pub use odata1c_query::Q;
#[cfg(feature = "rest")]
pub use odata1c_rest::{EntityManager, EntityModel};
