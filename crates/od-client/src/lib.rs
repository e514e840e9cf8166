//! # od-client
//!
//! HTTP connection layer for 1C OData services.
//!
//! This crate provides the transport the higher-level crates
//! (odata1c-metadata, odata1c-rest) are built on:
//! - `Connection` - one reqwest client bound to a service host with
//!   basic-auth credentials
//! - `ODataRequest` - method, relative URL, query parameters, JSON body
//! - `Response` - buffered status/reason/body with typed JSON decoding
//! - `Error`/`ErrorKind` - transport and response-status classification
//!
//! ## Security
//!
//! Credentials are redacted in Debug output.
//!
//! ## Example
//!
//! ```rust,ignore
//! use odata1c_client::{Connection, Credentials, ODataRequest};
//!
//! let conn = Connection::new(
//!     "1c.example.com",
//!     "https",
//!     Credentials::new("svc-user", "secret"),
//! )?;
//!
//! let response = conn
//!     .send(ODataRequest::get("zup-demo/odata/standard.odata/Catalog_Items"))
//!     .await?;
//! let body: serde_json::Value = response.json()?;
//! ```

mod config;
mod connection;
mod error;
mod request;
mod response;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use connection::{Connection, Credentials};
pub use error::{Error, ErrorKind, Result};
pub use request::{ODataRequest, RequestMethod};
pub use response::Response;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("odata1c-api/", env!("CARGO_PKG_VERSION"));
