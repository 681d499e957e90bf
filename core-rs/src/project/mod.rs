/**
 * project module
 * Run configuration: schema location, head and tail ontologies, cache
 */

pub mod config;

pub use config::{BiokgConfig, SchemaSource};
