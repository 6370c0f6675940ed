//! Bulk-load statement templates
//!
//! Builds the two COPY statements that ingest object-storage files into the
//! staging tables. Configuration values reach the statement text only
//! through [`quote_literal`], never by raw splicing.
//!
//! Malformed-record behavior is delegated entirely to the warehouse
//! loader; no row-count or checksum verification happens here.

use crate::config::EtlConfig;

/// Quote a string as a SQL literal, doubling embedded single quotes
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// COPY for the event-log staging table
///
/// Uses the explicit JSON-path mapping because the raw log field names do
/// not line up with column order.
pub fn staging_events_copy(config: &EtlConfig) -> String {
    format!(
        "COPY staging_events\nFROM {}\nIAM_ROLE {}\nREGION {}\nJSON {};",
        quote_literal(&config.s3.log_data),
        quote_literal(&config.iam_role.arn),
        quote_literal(&config.s3.region),
        quote_literal(&config.s3.log_jsonpath),
    )
}

/// COPY for the song-metadata staging table
///
/// Song metadata field names match the column names, so the loader infers
/// the mapping (`JSON 'auto'`).
pub fn staging_songs_copy(config: &EtlConfig) -> String {
    format!(
        "COPY staging_songs\nFROM {}\nIAM_ROLE {}\nREGION {}\nJSON 'auto';",
        quote_literal(&config.s3.song_data),
        quote_literal(&config.iam_role.arn),
        quote_literal(&config.s3.region),
    )
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
    fn test_quote_literal_escapes_single_quotes() {
        assert_eq!(quote_literal("plain"), "'plain'");
        assert_eq!(quote_literal("o'clock"), "'o''clock'");
    }

    #[test]
    fn test_events_copy_uses_jsonpath_mapping() {
        let sql = staging_events_copy(&test_config());
        assert!(sql.starts_with("COPY staging_events\nFROM 's3://bucket/log_data'"));
        assert!(sql.contains("IAM_ROLE 'arn:aws:iam::123456789012:role/etlRole'"));
        assert!(sql.contains("REGION 'us-west-2'"));
        assert!(sql.ends_with("JSON 's3://bucket/log_json_path.json';"));
    }

    #[test]
    fn test_songs_copy_infers_mapping() {
        let sql = staging_songs_copy(&test_config());
        assert!(sql.starts_with("COPY staging_songs\nFROM 's3://bucket/song_data'"));
        assert!(sql.ends_with("JSON 'auto';"));
    }

    #[test]
    fn test_region_override_reaches_statement() {
        let mut config = test_config();
        config.s3.region = "eu-central-1".to_string();
        assert!(staging_events_copy(&config).contains("REGION 'eu-central-1'"));
        assert!(staging_songs_copy(&config).contains("REGION 'eu-central-1'"));
    }

    #[test]
    fn test_hostile_config_value_stays_inside_literal() {
        let mut config = test_config();
        config.s3.log_data = "s3://bucket'; DROP TABLE users; --".to_string();
        let sql = staging_events_copy(&config);
        assert!(sql.contains("'s3://bucket''; DROP TABLE users; --'"));
    }
}
