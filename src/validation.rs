//! Input validation for schema identifiers and statement text.
//!
//! Identifier checks run over every table and column name before DDL is
//! rendered. Statement checks parse generated SQL with a Redshift-dialect
//! parser to catch syntax drift when statements are edited.
//!
//! # Security
//!
//! Identifier validation prevents SQL injection via malicious table or
//! column names reaching the rendered statement text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlparser::dialect::RedshiftSqlDialect;
use sqlparser::parser::Parser;
use thiserror::Error;

/// Maximum length for table and column names
pub const MAX_IDENTIFIER_LENGTH: usize = 127;

static RE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex"));

/// SQL keywords that cannot be used as bare identifiers.
const RESERVED_WORDS: &[&str] = &[
    "select", "insert", "update", "delete", "from", "where", "join", "inner", "outer", "left",
    "right", "on", "and", "or", "not", "null", "distinct", "group", "order", "by", "having",
    "union", "into", "values", "set", "create", "drop", "alter", "table", "primary", "foreign",
    "references", "copy", "grant", "revoke", "as", "case", "when", "then", "else", "end",
];

/// Errors that can occur during validation.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Input exceeds maximum allowed length
    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Input contains invalid characters
    #[error("{field} contains invalid characters: {value}")]
    InvalidCharacters { field: &'static str, value: String },

    /// Input is a reserved word
    #[error("{field} cannot be a reserved word: {word}")]
    ReservedWord { field: &'static str, word: String },

    /// Statement failed to parse
    #[error("syntax error in statement '{name}': {message}")]
    Syntax { name: String, message: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a table or column identifier.
///
/// # Rules
///
/// - Must not be empty
/// - Must not exceed 127 characters
/// - Must start with a letter or underscore and contain only letters,
///   digits, and underscores
/// - Cannot be a SQL reserved word
///
/// # Examples
///
/// ```
/// use warehouse_etl_sdk::validation::validate_identifier;
///
/// assert!(validate_identifier("staging_events", "table name").is_ok());
/// assert!(validate_identifier("user_id", "column name").is_ok());
/// assert!(validate_identifier("", "table name").is_err());
/// assert!(validate_identifier("select", "table name").is_err());
/// assert!(validate_identifier("1965_hits", "table name").is_err());
/// ```
pub fn validate_identifier(name: &str, field: &'static str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::Empty(field));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_IDENTIFIER_LENGTH,
            actual: name.len(),
        });
    }

    if !RE_IDENTIFIER.is_match(name) {
        return Err(ValidationError::InvalidCharacters {
            field,
            value: name.to_string(),
        });
    }

    if RESERVED_WORDS.contains(&name.to_lowercase().as_str()) {
        return Err(ValidationError::ReservedWord {
            field,
            word: name.to_string(),
        });
    }

    Ok(())
}

/// Parse a statement with the Redshift dialect and report syntax errors.
///
/// Only statements within the parser's grammar can be checked: the bulk-load
/// and CREATE statements use loader and table-attribute extensions the
/// parser does not model, so callers restrict this to drop and transform
/// statements.
pub fn check_statement(name: &str, sql: &str) -> ValidationResult<()> {
    Parser::parse_sql(&RedshiftSqlDialect {}, sql).map_err(|e| ValidationError::Syntax {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}
