//! Schema module
//!
//! Static stream schemas, catalog discovery and record conformance.
//!
//! # Features
//!
//! - **Embedded Schemas**: One JSON schema per stream, compiled into the binary
//! - **Custom Fields**: Account custom fields become typed schema properties
//! - **Standard Metadata**: Key, replication and inclusion metadata per stream
//! - **Transform**: Records are conformed to the catalog schema before emission

mod discovery;
mod embedded;
mod transform;
mod types;

pub use discovery::{apply_custom_fields, catalog_entry, discover, map_type, standard_metadata};
pub use embedded::{get_builtin, is_builtin, load_schema, BUILTIN_SCHEMAS};
pub use transform::{transform_record, transform_value};
pub use types::{JsonType, JsonTypeOrArray};
