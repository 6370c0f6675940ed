//! Table model for warehouse table declarations
//!
//! A [`Table`] carries everything the DDL renderer needs: columns with
//! constraints, and the MPP placement hints (distribution style and key,
//! sort key) the target engine uses for physical layout.

use serde::{Deserialize, Serialize};

use super::column::Column;

/// Distribution style hint for MPP engines
///
/// Engines without distribution support translate these to no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistStyle {
    /// Round-robin row placement
    Even,
    /// Rows co-located by the distribution key
    Key,
    /// Full copy on every node
    All,
}

impl std::fmt::Display for DistStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistStyle::Even => write!(f, "EVEN"),
            DistStyle::Key => write!(f, "KEY"),
            DistStyle::All => write!(f, "ALL"),
        }
    }
}

/// Table model: a named set of columns plus physical placement hints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
    /// Distribution style hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist_style: Option<DistStyle>,
    /// Distribution key column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist_key: Option<String>,
    /// Sort key column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl Table {
    /// Create a new table with the given name and columns
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            dist_style: None,
            dist_key: None,
            sort_key: None,
        }
    }

    /// Set the distribution style
    pub fn dist_style(mut self, style: DistStyle) -> Self {
        self.dist_style = Some(style);
        self
    }

    /// Set the distribution key column
    pub fn dist_key(mut self, column: impl Into<String>) -> Self {
        self.dist_key = Some(column.into());
        self
    }

    /// Set the sort key column
    pub fn sort_key(mut self, column: impl Into<String>) -> Self {
        self.sort_key = Some(column.into());
        self
    }

    /// Names of tables this table references through foreign keys
    ///
    /// Duplicates are collapsed; declaration order is preserved.
    pub fn dependencies(&self) -> Vec<&str> {
        let mut deps: Vec<&str> = Vec::new();
        for col in &self.columns {
            if let Some(fk) = &col.foreign_key
                && !deps.contains(&fk.table.as_str())
            {
                deps.push(fk.table.as_str());
            }
        }
        deps
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact_table() -> Table {
        Table::new(
            "plays",
            vec![
                Column::new("play_id", "INTEGER").identity().primary_key(),
                Column::new("start_time", "TIMESTAMP").references("time", "start_time"),
                Column::new("user_id", "INTEGER").references("users", "user_id"),
                Column::new("other_user", "INTEGER").references("users", "user_id"),
            ],
        )
        .dist_style(DistStyle::Key)
        .dist_key("start_time")
        .sort_key("start_time")
    }

    #[test]
    fn test_dependencies_deduplicated() {
        let table = fact_table();
        assert_eq!(table.dependencies(), vec!["time", "users"]);
    }

    #[test]
    fn test_column_lookup() {
        let table = fact_table();
        assert!(table.column("user_id").is_some());
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_dist_style_display() {
        assert_eq!(DistStyle::Key.to_string(), "KEY");
        assert_eq!(DistStyle::Even.to_string(), "EVEN");
        assert_eq!(DistStyle::All.to_string(), "ALL");
    }
}
