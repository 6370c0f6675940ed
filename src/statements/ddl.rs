//! DDL rendering from table models
//!
//! Renders idempotent CREATE and DROP text from [`Table`] declarations.
//! Both are safe to re-run: drops carry `IF EXISTS`, creates carry
//! `IF NOT EXISTS`, so a drop-then-create sequence resets a populated
//! warehouse to an empty, correctly shaped schema.

use crate::models::{Column, Table};

/// Render an idempotent DROP statement for a table
pub fn drop_table_sql(table: &Table) -> String {
    format!("DROP TABLE IF EXISTS {};", table.name)
}

/// Render an idempotent CREATE statement for a table
///
/// Columns render in declaration order; distribution and sort hints follow
/// the closing parenthesis.
pub fn create_table_sql(table: &Table) -> String {
    let mut sql = String::new();
    sql.push_str(&format!("CREATE TABLE IF NOT EXISTS {} (\n", table.name));

    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("    {}", render_column(c)))
        .collect();
    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    if let Some(style) = table.dist_style {
        sql.push_str(&format!("\nDISTSTYLE {}", style));
    }
    if let Some(key) = &table.dist_key {
        sql.push_str(&format!("\nDISTKEY ({})", key));
    }
    if let Some(key) = &table.sort_key {
        sql.push_str(&format!("\nSORTKEY ({})", key));
    }
    sql.push(';');
    sql
}

fn render_column(column: &Column) -> String {
    let mut parts = vec![column.name.clone(), column.data_type.clone()];

    if column.identity {
        parts.push("IDENTITY(1,1)".to_string());
    }
    if column.primary_key {
        parts.push("PRIMARY KEY".to_string());
    } else if !column.nullable {
        parts.push("NOT NULL".to_string());
    }
    if let Some(fk) = &column.foreign_key {
        parts.push(format!("REFERENCES {} ({})", fk.table, fk.column));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DistStyle;

    #[test]
    fn test_drop_is_idempotent() {
        let table = Table::new("users", vec![Column::new("user_id", "INTEGER")]);
        assert_eq!(drop_table_sql(&table), "DROP TABLE IF EXISTS users;");
    }

    #[test]
    fn test_create_is_idempotent() {
        let table = Table::new("users", vec![Column::new("user_id", "INTEGER")]);
        assert!(create_table_sql(&table).starts_with("CREATE TABLE IF NOT EXISTS users ("));
    }

    #[test]
    fn test_identity_primary_key_rendering() {
        let table = Table::new(
            "songplays",
            vec![Column::new("songplay_id", "INTEGER").identity().primary_key()],
        );
        let sql = create_table_sql(&table);
        assert!(sql.contains("songplay_id INTEGER IDENTITY(1,1) PRIMARY KEY"));
    }

    #[test]
    fn test_not_null_and_reference_rendering() {
        let table = Table::new(
            "songplays",
            vec![
                Column::new("level", "VARCHAR").not_null(),
                Column::new("user_id", "INTEGER").references("users", "user_id"),
            ],
        );
        let sql = create_table_sql(&table);
        assert!(sql.contains("level VARCHAR NOT NULL"));
        assert!(sql.contains("user_id INTEGER REFERENCES users (user_id)"));
    }

    #[test]
    fn test_placement_hints_follow_column_list() {
        let table = Table::new("time", vec![Column::new("start_time", "TIMESTAMP").primary_key()])
            .dist_style(DistStyle::Key)
            .dist_key("start_time")
            .sort_key("start_time");
        let sql = create_table_sql(&table);
        let body_end = sql.find(')').unwrap();
        assert!(sql[body_end..].contains("DISTSTYLE KEY"));
        assert!(sql[body_end..].contains("DISTKEY (start_time)"));
        assert!(sql[body_end..].contains("SORTKEY (start_time)"));
        assert!(sql.ends_with(';'));
    }

    #[test]
    fn test_primary_key_not_rendered_with_not_null() {
        let table = Table::new("users", vec![Column::new("user_id", "INTEGER").primary_key()]);
        let sql = create_table_sql(&table);
        assert!(sql.contains("user_id INTEGER PRIMARY KEY"));
        assert!(!sql.contains("PRIMARY KEY NOT NULL"));
    }
}
