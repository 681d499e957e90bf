//! Schema mapping: the user's schema configuration and its resolved form
//!
//! - schema: `SchemaEntry` / `ExtendedSchemaEntry` and their containers
//! - resolver: direct, vertical and horizontal resolution passes

pub mod resolver;
pub mod schema;

pub use resolver::SchemaResolver;
pub use schema::{
    ExtendedSchema, ExtendedSchemaEntry, OneOrMany, RawSchema, Representation, SchemaEntry,
    DEFAULT_PREFERRED_ID,
};
