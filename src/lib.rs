//! Warehouse ETL SDK - schema and query catalog for a star-schema event warehouse
//!
//! Declares the staging tables, dimensional schema, bulk-load templates, and
//! transform statements of a batch ETL pipeline, and exposes them as four
//! ordered statement collections for an external execution driver:
//!
//! - `drop_table_queries` - idempotent drops, fact table first
//! - `create_table_queries` - idempotent creates, dimensions before fact
//! - `copy_table_queries` - bulk loads from object storage into staging
//! - `insert_table_queries` - dedup/join transforms into the star schema
//!
//! Execution is entirely external: the driver owns the warehouse connection
//! and runs the collections sequentially, in that order.
//!
//! ```rust
//! use warehouse_etl_sdk::{EtlConfig, QueryCatalog};
//!
//! let config = EtlConfig::new(
//!     "arn:aws:iam::123456789012:role/dwhRole",
//!     "s3://example-data/log_data",
//!     "s3://example-data/log_json_path.json",
//!     "s3://example-data/song_data",
//! );
//! let catalog = QueryCatalog::build(&config).unwrap();
//! assert_eq!(catalog.create_table_queries.len(), 7);
//! ```

pub mod config;
pub mod models;
pub mod schema;
pub mod statements;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigError, EtlConfig};
pub use models::{Column, DistStyle, ForeignKey, Table};
pub use schema::SchemaError;
pub use statements::{
    CatalogError, CatalogManifest, CatalogResult, QueryCatalog, Statement, StatementKind,
};
pub use validation::{ValidationError, ValidationResult};
