//! Database schema definitions
//!
//! This module contains the SQL schema for the compliance-checker database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Persisted client state (last result, check history)
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - Database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
