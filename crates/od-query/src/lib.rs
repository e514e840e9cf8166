//! # od-query
//!
//! OData `$filter` expression builder with Django-style lookups.
//!
//! Conditions are written as `field[__operator][__annotation]` lookups and
//! composed into a boolean tree with `&`, `|` and `!`. The tree renders to
//! the `$filter` syntax the 1C OData service expects.
//!
//! ## Example
//!
//! ```rust
//! use odata1c_query::Q;
//!
//! let q = (Q::new("name", "Ivanov")? & Q::new("age__gt", 30)?)
//!     | !Q::new("code", "X")?;
//!
//! assert_eq!(
//!     q.render(),
//!     "name eq 'Ivanov' and age gt 30 or not (code eq 'X')"
//! );
//! # Ok::<(), odata1c_query::Error>(())
//! ```
//!
//! The builder never performs I/O; rendering is infallible because every
//! operator and annotation is validated when the lookup is parsed.

mod error;
mod filter;
mod value;

pub use error::{Error, Result};
pub use filter::{Annotation, Connector, Operator, Q};
pub use value::Value;
