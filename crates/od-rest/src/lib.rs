//! # od-rest
//!
//! Entity managers for 1C OData services.
//!
//! An [`EntityManager`] wraps one entity set of one database and provides
//! the query and mutation surface: `filter`/`expand`/`top`/`skip`
//! directives, `all`/`get`/`create`/`update`, and the 1C document
//! `Post`/`Unpost` operations. Records are validated into a caller-supplied
//! [`EntityModel`] type.
//!
//! ## Example
//!
//! ```rust,ignore
//! use odata1c_client::{Connection, Credentials};
//! use odata1c_query::Q;
//! use odata1c_rest::{EntityManager, EntityModel};
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
//! let conn = Connection::new("1c.example.com", "https", Credentials::new("u", "p"))?;
//! let mut manager = EntityManager::<Person>::new(conn, "zup-demo", "Catalog_ФизическиеЛица")
//!     .filter(Q::new("name", "Ivanov")?)
//!     .top(3);
//! let people = manager.all(true).await?;
//! ```

mod error;
mod manager;
mod model;

pub use error::{Error, ErrorKind, Result};
pub use manager::{EntityManager, ODATA_PATH};
pub use model::EntityModel;
