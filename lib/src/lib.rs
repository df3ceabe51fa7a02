//! rs-import turns folders of tabular museum metadata (CSV record files plus
//! a YAML dataset description) into RDF statement sets and publishes them to
//! a SPARQL endpoint by replacing one named graph per dataset.
//!
//! The identifier derivation in [`ids`] is deterministic, so re-running an
//! import over the same source data replaces the same named graph with the
//! same IRIs.

pub mod builder;
pub mod config;
pub mod consts;
pub mod errors;
pub mod ids;
pub mod import;
pub mod records;
pub mod schema;
pub mod submit;

pub use config::Config;
pub use import::DataSetImport;
