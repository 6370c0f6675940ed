//! Transform statements populating the dimensional schema from staging
//!
//! Each statement is a `SELECT DISTINCT` over staging data written into its
//! target table. Dimension loads dedup on the natural key; when duplicate
//! staging rows disagree on an attribute, whichever row the engine retains
//! wins.
//!
//! Both timestamp-deriving statements compute
//! `TIMESTAMP 'epoch' + (ts / 1000) * INTERVAL '1 second'` from the raw
//! millisecond epoch. [`epoch_start_time`] is the Rust reference for that
//! arithmetic; keep all three in sync when editing any of them.

use chrono::{DateTime, Utc};

/// Fact-table load.
///
/// Matches events to song metadata by exact equality on song title and
/// artist name. The join is inner: an event whose song/artist text matches
/// no staging_songs row produces no fact row at all.
pub const SONGPLAYS_INSERT: &str = r#"
INSERT INTO songplays (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
SELECT DISTINCT
    TIMESTAMP 'epoch' + (e.ts / 1000) * INTERVAL '1 second' AS start_time,
    e.userId AS user_id,
    e.level AS level,
    s.song_id AS song_id,
    s.artist_id AS artist_id,
    e.sessionId AS session_id,
    e.location AS location,
    e.userAgent AS user_agent
FROM staging_events e
JOIN staging_songs s ON e.song = s.title
                    AND e.artist = s.artist_name
WHERE e.page = 'NextSong';
"#;

/// Users dimension load. NULL userId rows are navigation/auth noise and are
/// excluded to satisfy the primary key.
pub const USERS_INSERT: &str = r#"
INSERT INTO users (user_id, first_name, last_name, gender, level)
SELECT DISTINCT
    e.userId AS user_id,
    e.firstName AS first_name,
    e.lastName AS last_name,
    e.gender AS gender,
    e.level AS level
FROM staging_events e
WHERE e.page = 'NextSong' AND e.userId IS NOT NULL;
"#;

/// Songs dimension load.
pub const SONGS_INSERT: &str = r#"
INSERT INTO songs (song_id, title, artist_id, year, duration)
SELECT DISTINCT
    s.song_id AS song_id,
    s.title AS title,
    s.artist_id AS artist_id,
    s.year AS year,
    s.duration AS duration
FROM staging_songs s
WHERE s.song_id IS NOT NULL;
"#;

/// Artists dimension load.
pub const ARTISTS_INSERT: &str = r#"
INSERT INTO artists (artist_id, name, location, latitude, longitude)
SELECT DISTINCT
    s.artist_id AS artist_id,
    s.artist_name AS name,
    s.artist_location AS location,
    s.artist_latitude AS latitude,
    s.artist_longitude AS longitude
FROM staging_songs s
WHERE s.artist_id IS NOT NULL;
"#;

/// Time dimension load.
///
/// Re-derives start_time from raw `ts` instead of reading the fact table,
/// and filters to playback events so the dimension covers exactly the
/// timestamps the fact table can reference.
pub const TIME_INSERT: &str = r#"
INSERT INTO time (start_time, hour, day, week, month, year, weekday)
SELECT DISTINCT
    TIMESTAMP 'epoch' + (ts / 1000) * INTERVAL '1 second' AS start_time,
    EXTRACT(HOUR FROM start_time) AS hour,
    EXTRACT(DAY FROM start_time) AS day,
    EXTRACT(WEEK FROM start_time) AS week,
    EXTRACT(MONTH FROM start_time) AS month,
    EXTRACT(YEAR FROM start_time) AS year,
    to_char(start_time, 'Day') AS weekday
FROM staging_events
WHERE page = 'NextSong';
"#;

/// Transform statements as (target table, SQL) in load order:
/// every dimension before the fact table.
pub fn insert_statements() -> Vec<(&'static str, &'static str)> {
    vec![
        ("users", USERS_INSERT),
        ("artists", ARTISTS_INSERT),
        ("songs", SONGS_INSERT),
        ("time", TIME_INSERT),
        ("songplays", SONGPLAYS_INSERT),
    ]
}

/// Reference implementation of the statement timestamp derivation
///
/// Integer-divides the millisecond epoch down to seconds, exactly as
/// `(ts / 1000) * INTERVAL '1 second'` does in the warehouse.
/// Returns `None` for values outside the representable timestamp range.
pub fn epoch_start_time(ts_millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts_millis / 1000, 0)
}
