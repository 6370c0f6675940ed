//! Statement catalogs consumed by an external execution driver
//!
//! The [`QueryCatalog`] aggregates four ordered statement collections:
//! drop, create, copy, and insert. A driver owns the warehouse connection
//! and executes the collections sequentially, in that order; nothing in
//! this crate opens a connection or retries a failed statement — engine
//! errors surface verbatim to the driver.

pub mod copy;
pub mod ddl;
pub mod transform;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EtlConfig;
use crate::schema::{self, SchemaError};
use crate::validation::{self, ValidationError};

/// Which catalog a statement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Drop,
    Create,
    Copy,
    Insert,
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatementKind::Drop => write!(f, "drop"),
            StatementKind::Create => write!(f, "create"),
            StatementKind::Copy => write!(f, "copy"),
            StatementKind::Insert => write!(f, "insert"),
        }
    }
}

/// A single named statement within a catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    /// Target table
    pub table: String,
    /// Catalog the statement belongs to
    pub kind: StatementKind,
    /// Statement text
    pub sql: String,
}

impl Statement {
    fn new(table: impl Into<String>, kind: StatementKind, sql: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind,
            sql: sql.into(),
        }
    }
}

/// Error during catalog construction or checking
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Schema ordering or reference problem
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Identifier or statement validation failure
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Manifest serialization failure
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Summary of one execution phase for runner consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseManifest {
    /// Phase name (collection identifier)
    pub phase: String,
    /// Target tables in execution order
    pub tables: Vec<String>,
}

/// Catalog manifest: the four phases in execution order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub phases: Vec<PhaseManifest>,
}

impl CatalogManifest {
    /// Serialize the manifest as pretty JSON
    pub fn to_json(&self) -> CatalogResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CatalogError::Serialization(e.to_string()))
    }

    /// Serialize the manifest as YAML
    pub fn to_yaml(&self) -> CatalogResult<String> {
        serde_yaml::to_string(self).map_err(|e| CatalogError::Serialization(e.to_string()))
    }
}

/// The four ordered statement collections
///
/// Field names match the collection names the external driver consumes:
/// drops run first, then creates, then copies, then inserts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCatalog {
    /// DROP statements, fact table before dimensions
    pub drop_table_queries: Vec<Statement>,
    /// CREATE statements, dimensions before the fact table
    pub create_table_queries: Vec<Statement>,
    /// Bulk-load statements for the staging tables
    pub copy_table_queries: Vec<Statement>,
    /// Transform statements, dimensions before the fact table
    pub insert_table_queries: Vec<Statement>,
}

impl QueryCatalog {
    /// Build the full catalog from resolved configuration
    ///
    /// Validates every table and column identifier, verifies the declared
    /// create order against the foreign-key graph, and renders all
    /// statement text. Configuration values appear only in the copy
    /// catalog.
    pub fn build(config: &EtlConfig) -> CatalogResult<Self> {
        let tables = schema::warehouse_tables();

        for table in &tables {
            validation::validate_identifier(&table.name, "table name")?;
            for column in &table.columns {
                validation::validate_identifier(&column.name, "column name")?;
            }
        }
        schema::verify_create_order(&tables)?;

        let drop_table_queries = schema::DROP_ORDER
            .iter()
            .map(|name| {
                let table = tables
                    .iter()
                    .find(|t| t.name == *name)
                    .expect("declared orders cover the same fixed table set");
                Statement::new(*name, StatementKind::Drop, ddl::drop_table_sql(table))
            })
            .collect();

        let create_table_queries = tables
            .iter()
            .map(|t| Statement::new(&t.name, StatementKind::Create, ddl::create_table_sql(t)))
            .collect();

        let copy_table_queries = vec![
            Statement::new(
                "staging_events",
                StatementKind::Copy,
                copy::staging_events_copy(config),
            ),
            Statement::new(
                "staging_songs",
                StatementKind::Copy,
                copy::staging_songs_copy(config),
            ),
        ];

        let insert_table_queries = transform::insert_statements()
            .into_iter()
            .map(|(table, sql)| Statement::new(table, StatementKind::Insert, sql.trim()))
            .collect();

        let catalog = Self {
            drop_table_queries,
            create_table_queries,
            copy_table_queries,
            insert_table_queries,
        };
        debug!(
            statements = catalog.len(),
            "built warehouse statement catalog"
        );
        Ok(catalog)
    }

    /// All statements in execution order: drop, create, copy, insert
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.drop_table_queries
            .iter()
            .chain(self.create_table_queries.iter())
            .chain(self.copy_table_queries.iter())
            .chain(self.insert_table_queries.iter())
    }

    /// Total number of statements across the four collections
    pub fn len(&self) -> usize {
        self.drop_table_queries.len()
            + self.create_table_queries.len()
            + self.copy_table_queries.len()
            + self.insert_table_queries.len()
    }

    /// True if no collection holds any statement
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse-check the statements the parser grammar covers
    ///
    /// Runs the syntax check over the drop and insert catalogs. Create and
    /// copy statements carry engine extensions (IDENTITY, DISTSTYLE,
    /// loader options) outside the parser's grammar and are skipped.
    pub fn check_syntax(&self) -> CatalogResult<()> {
        for stmt in self
            .drop_table_queries
            .iter()
            .chain(self.insert_table_queries.iter())
        {
            validation::check_statement(&stmt.table, &stmt.sql)?;
        }
        debug!("catalog syntax check passed");
        Ok(())
    }

    /// Manifest of the four phases in execution order
    pub fn manifest(&self) -> CatalogManifest {
        let phase = |name: &str, statements: &[Statement]| PhaseManifest {
            phase: name.to_string(),
            tables: statements.iter().map(|s| s.table.clone()).collect(),
        };
        CatalogManifest {
            phases: vec![
                phase("drop_table_queries", &self.drop_table_queries),
                phase("create_table_queries", &self.create_table_queries),
                phase("copy_table_queries", &self.copy_table_queries),
                phase("insert_table_queries", &self.insert_table_queries),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EtlConfig {
        EtlConfig::new(
            "arn:aws:iam::123456789012:role/etlRole",
            "s3://bucket/log_data",
            "s3://bucket/log_json_path.json",
            "s3://bucket/song_data",
        )
    }

    #[test]
    fn test_build_produces_all_four_collections() {
        let catalog = QueryCatalog::build(&test_config()).unwrap();
        assert_eq!(catalog.drop_table_queries.len(), 7);
        assert_eq!(catalog.create_table_queries.len(), 7);
        assert_eq!(catalog.copy_table_queries.len(), 2);
        assert_eq!(catalog.insert_table_queries.len(), 5);
        assert_eq!(catalog.len(), 21);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_statements_iterate_in_execution_order() {
        let catalog = QueryCatalog::build(&test_config()).unwrap();
        let kinds: Vec<StatementKind> = catalog.statements().map(|s| s.kind).collect();
        let mut expected = Vec::new();
        expected.extend(std::iter::repeat_n(StatementKind::Drop, 7));
        expected.extend(std::iter::repeat_n(StatementKind::Create, 7));
        expected.extend(std::iter::repeat_n(StatementKind::Copy, 2));
        expected.extend(std::iter::repeat_n(StatementKind::Insert, 5));
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_syntax_check_passes_for_built_catalog() {
        let catalog = QueryCatalog::build(&test_config()).unwrap();
        catalog.check_syntax().unwrap();
    }

    #[test]
    fn test_manifest_phase_order() {
        let catalog = QueryCatalog::build(&test_config()).unwrap();
        let manifest = catalog.manifest();
        let phases: Vec<&str> = manifest.phases.iter().map(|p| p.phase.as_str()).collect();
        assert_eq!(
            phases,
            vec![
                "drop_table_queries",
                "create_table_queries",
                "copy_table_queries",
                "insert_table_queries"
            ]
        );
        assert_eq!(manifest.phases[0].tables[2], "songplays");
        assert_eq!(manifest.phases[3].tables.last().unwrap(), "songplays");
    }

    #[test]
    fn test_manifest_serializes_to_json_and_yaml() {
        let catalog = QueryCatalog::build(&test_config()).unwrap();
        let manifest = catalog.manifest();
        let json = manifest.to_json().unwrap();
        assert!(json.contains("copy_table_queries"));
        let yaml = manifest.to_yaml().unwrap();
        assert!(yaml.contains("insert_table_queries"));
    }
}
