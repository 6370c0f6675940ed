//! Column model for warehouse table declarations

use serde::{Deserialize, Serialize};

/// Foreign key reference to a column in another table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForeignKey {
    /// Target table name
    pub table: String,
    /// Column name in the target table
    pub column: String,
}

/// Column model representing a field in a warehouse table
///
/// A column defines a single field with a SQL data type and constraints.
/// Columns can be primary keys, identity (engine-generated surrogate)
/// columns, and can reference a column in another table.
///
/// # Example
///
/// ```rust
/// use warehouse_etl_sdk::models::Column;
///
/// let col = Column::new("user_id", "INTEGER").primary_key();
/// assert!(col.primary_key);
/// assert!(!col.identity);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// SQL data type (e.g., "VARCHAR", "DECIMAL(9,6)", "TIMESTAMP")
    pub data_type: String,
    /// Whether the column allows NULL values (default: true)
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Whether this column is the primary key (default: false)
    #[serde(default)]
    pub primary_key: bool,
    /// Whether this column is an engine-generated identity column
    #[serde(default)]
    pub identity: bool,
    /// Foreign key reference if this column references another table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
}

fn default_true() -> bool {
    true
}

impl Column {
    /// Create a new nullable column with the given name and data type
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            primary_key: false,
            identity: false,
            foreign_key: None,
        }
    }

    /// Mark this column as the table's primary key
    ///
    /// Primary key columns are implicitly NOT NULL.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Mark this column NOT NULL
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark this column as an identity surrogate key
    ///
    /// Rendered as `IDENTITY(1,1)` in the CREATE statement; the engine
    /// guarantees uniqueness of generated values.
    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Declare a foreign key reference to `table(column)`
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKey {
            table: table.into(),
            column: column.into(),
        });
        self
    }
}
