#![deny(unsafe_code)]

pub mod allowlist;
pub mod error;
pub mod hash;
pub mod paths;
pub mod schema;

pub use crate::allowlist::{AllowAll, Authorizer, DigestAllowList, user_digest};
pub use crate::error::SchemaLoadError;
pub use crate::paths::{SCHEMA_ENV_VAR, default_schema_path};
pub use crate::schema::{load_schema, parse_schema_csv};
