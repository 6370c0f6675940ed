//! Warehouse schema definitions
//!
//! Declares the two staging tables, the four dimensions, and the fact table
//! of the star schema, together with the statement orders an external runner
//! must respect:
//!
//! - drop order removes the fact table before the dimensions it references;
//! - create order declares every dimension before the fact table, so the
//!   fact table's foreign keys always resolve.
//!
//! [`verify_create_order`] checks the declared create order against the
//! foreign-key graph, so reordering a table without reordering its
//! dependents is caught at catalog build instead of at the warehouse.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use thiserror::Error;

use crate::models::{Column, DistStyle, Table};

/// Table names in create order: staging first, then dimensions, fact last.
pub const CREATE_ORDER: [&str; 7] = [
    "staging_events",
    "staging_songs",
    "users",
    "artists",
    "songs",
    "time",
    "songplays",
];

/// Table names in drop order: fact before the dimensions it references.
pub const DROP_ORDER: [&str; 7] = [
    "staging_events",
    "staging_songs",
    "songplays",
    "users",
    "songs",
    "artists",
    "time",
];

/// Error raised by schema-order verification
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A foreign key points at a table that is not part of the schema
    #[error("table '{table}' references unknown table '{referenced}'")]
    UnknownReference { table: String, referenced: String },

    /// A table is declared before one of its dependencies
    #[error("table '{table}' is created before its dependency '{dependency}'")]
    DependencyOrder { table: String, dependency: String },

    /// The foreign-key graph contains a cycle
    #[error("foreign-key cycle involving table '{table}'")]
    Cycle { table: String },
}

/// Staging table for raw event-log records
///
/// Column names mirror the JSON log fields verbatim, camelCase included, so
/// the bulk loader's path mapping stays one-to-one.
pub fn staging_events() -> Table {
    Table::new(
        "staging_events",
        vec![
            Column::new("artist", "VARCHAR"),
            Column::new("auth", "VARCHAR"),
            Column::new("firstName", "VARCHAR"),
            Column::new("gender", "CHAR(1)"),
            Column::new("itemInSession", "INTEGER"),
            Column::new("lastName", "VARCHAR"),
            Column::new("length", "FLOAT"),
            Column::new("level", "VARCHAR"),
            Column::new("location", "VARCHAR"),
            Column::new("method", "VARCHAR"),
            Column::new("page", "VARCHAR"),
            Column::new("registration", "VARCHAR"),
            Column::new("sessionId", "VARCHAR"),
            Column::new("song", "VARCHAR"),
            Column::new("status", "INTEGER"),
            Column::new("ts", "BIGINT"),
            Column::new("userAgent", "TEXT"),
            Column::new("userId", "INTEGER"),
        ],
    )
}

/// Staging table for raw song-metadata records
pub fn staging_songs() -> Table {
    Table::new(
        "staging_songs",
        vec![
            Column::new("num_songs", "INTEGER"),
            Column::new("artist_id", "VARCHAR"),
            Column::new("artist_latitude", "DECIMAL(9,6)"),
            Column::new("artist_longitude", "DECIMAL(9,6)"),
            Column::new("artist_location", "VARCHAR"),
            Column::new("artist_name", "VARCHAR"),
            Column::new("song_id", "VARCHAR"),
            Column::new("title", "VARCHAR"),
            Column::new("duration", "FLOAT"),
            Column::new("year", "INTEGER"),
        ],
    )
}

/// Users dimension
pub fn users() -> Table {
    Table::new(
        "users",
        vec![
            Column::new("user_id", "INTEGER").primary_key(),
            Column::new("first_name", "VARCHAR"),
            Column::new("last_name", "VARCHAR"),
            Column::new("gender", "CHAR(1)"),
            Column::new("level", "VARCHAR").not_null(),
        ],
    )
    .sort_key("user_id")
}

/// Songs dimension
pub fn songs() -> Table {
    Table::new(
        "songs",
        vec![
            Column::new("song_id", "VARCHAR").primary_key(),
            Column::new("title", "VARCHAR"),
            Column::new("artist_id", "VARCHAR"),
            Column::new("year", "INTEGER"),
            Column::new("duration", "FLOAT"),
        ],
    )
    .sort_key("song_id")
}

/// Artists dimension
pub fn artists() -> Table {
    Table::new(
        "artists",
        vec![
            Column::new("artist_id", "VARCHAR").primary_key(),
            Column::new("name", "VARCHAR"),
            Column::new("location", "VARCHAR"),
            Column::new("latitude", "DECIMAL(9,6)"),
            Column::new("longitude", "DECIMAL(9,6)"),
        ],
    )
    .sort_key("artist_id")
}

/// Time dimension, keyed by the derived playback timestamp
pub fn time() -> Table {
    Table::new(
        "time",
        vec![
            Column::new("start_time", "TIMESTAMP").primary_key(),
            Column::new("hour", "INTEGER"),
            Column::new("day", "INTEGER"),
            Column::new("week", "INTEGER"),
            Column::new("month", "INTEGER"),
            Column::new("year", "INTEGER"),
            Column::new("weekday", "VARCHAR").not_null(),
        ],
    )
    .dist_style(DistStyle::Key)
    .dist_key("start_time")
    .sort_key("start_time")
}

/// Songplays fact table
///
/// `songplay_id` is an engine-generated surrogate. The foreign keys are
/// declared for the planner; the load pattern relies on statement ordering,
/// not engine enforcement.
pub fn songplays() -> Table {
    Table::new(
        "songplays",
        vec![
            Column::new("songplay_id", "INTEGER").identity().primary_key(),
            Column::new("start_time", "TIMESTAMP").references("time", "start_time"),
            Column::new("user_id", "INTEGER").references("users", "user_id"),
            Column::new("level", "VARCHAR").not_null(),
            Column::new("song_id", "VARCHAR").references("songs", "song_id"),
            Column::new("artist_id", "VARCHAR").references("artists", "artist_id"),
            Column::new("session_id", "VARCHAR").not_null(),
            Column::new("location", "VARCHAR"),
            Column::new("user_agent", "TEXT"),
        ],
    )
    .dist_style(DistStyle::Key)
    .dist_key("start_time")
    .sort_key("start_time")
}

/// All warehouse tables in create order
pub fn warehouse_tables() -> Vec<Table> {
    vec![
        staging_events(),
        staging_songs(),
        users(),
        artists(),
        songs(),
        time(),
        songplays(),
    ]
}

/// Verify that a table sequence is a valid create order
///
/// Builds the foreign-key dependency graph, rejects unknown references and
/// cycles, then checks that every referenced table appears before its
/// referent in `tables`.
pub fn verify_create_order(tables: &[Table]) -> Result<(), SchemaError> {
    let positions: HashMap<&str, usize> = tables
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.as_str(), i))
        .collect();

    let mut graph = DiGraph::<&str, ()>::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    for table in tables {
        let idx = *nodes
            .entry(table.name.as_str())
            .or_insert_with(|| graph.add_node(table.name.as_str()));

        for dep in table.dependencies() {
            if !positions.contains_key(dep) {
                return Err(SchemaError::UnknownReference {
                    table: table.name.clone(),
                    referenced: dep.to_string(),
                });
            }
            let dep_idx = *nodes.entry(dep).or_insert_with(|| graph.add_node(dep));
            graph.add_edge(dep_idx, idx, ());
        }
    }

    petgraph::algo::toposort(&graph, None).map_err(|cycle| SchemaError::Cycle {
        table: graph[cycle.node_id()].to_string(),
    })?;

    for table in tables {
        for dep in table.dependencies() {
            if positions[dep] >= positions[table.name.as_str()] {
                return Err(SchemaError::DependencyOrder {
                    table: table.name.clone(),
                    dependency: dep.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_orders_cover_the_same_tables() {
        let mut create = CREATE_ORDER.to_vec();
        let mut drop = DROP_ORDER.to_vec();
        create.sort_unstable();
        drop.sort_unstable();
        assert_eq!(create, drop);
    }

    #[test]
    fn test_warehouse_tables_match_create_order() {
        let names: Vec<String> = warehouse_tables().into_iter().map(|t| t.name).collect();
        assert_eq!(names, CREATE_ORDER);
    }

    #[test]
    fn test_create_order_satisfies_dependencies() {
        verify_create_order(&warehouse_tables()).expect("declared order should verify");
    }

    #[test]
    fn test_fact_first_order_is_rejected() {
        let mut tables = warehouse_tables();
        let fact = tables.pop().unwrap();
        tables.insert(0, fact);
        assert!(matches!(
            verify_create_order(&tables),
            Err(SchemaError::DependencyOrder { .. })
        ));
    }

    #[test]
    fn test_unknown_reference_is_rejected() {
        let tables = vec![
            Table::new(
                "plays",
                vec![Column::new("user_id", "INTEGER").references("users", "user_id")],
            ),
        ];
        assert!(matches!(
            verify_create_order(&tables),
            Err(SchemaError::UnknownReference { .. })
        ));
    }

    #[test]
    fn test_reference_cycle_is_rejected() {
        let tables = vec![
            Table::new(
                "a",
                vec![Column::new("b_id", "INTEGER").references("b", "b_id")],
            ),
            Table::new(
                "b",
                vec![Column::new("a_id", "INTEGER").references("a", "a_id")],
            ),
        ];
        assert!(matches!(
            verify_create_order(&tables),
            Err(SchemaError::Cycle { .. })
        ));
    }

    #[test]
    fn test_drop_order_removes_fact_before_dimensions() {
        let pos = |name: &str| DROP_ORDER.iter().position(|n| *n == name).unwrap();
        for dim in ["users", "songs", "artists", "time"] {
            assert!(pos("songplays") < pos(dim));
        }
    }

    #[test]
    fn test_staging_tables_have_no_dependencies() {
        assert!(staging_events().dependencies().is_empty());
        assert!(staging_songs().dependencies().is_empty());
    }

    #[test]
    fn test_fact_table_references_all_dimensions() {
        assert_eq!(
            songplays().dependencies(),
            vec!["time", "users", "songs", "artists"]
        );
    }
}
