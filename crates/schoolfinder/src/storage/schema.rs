//! `SQLite` schema definitions for schoolfinder.

/// SQL statement to create the schools table.
///
/// `created_at` is filled by the database as a UTC RFC 3339 timestamp.
pub const CREATE_SCHOOLS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS schools (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_SCHOOLS_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_schools_table_contains_required_columns() {
        assert!(CREATE_SCHOOLS_TABLE.contains("id INTEGER PRIMARY KEY"));
        assert!(CREATE_SCHOOLS_TABLE.contains("name TEXT NOT NULL"));
        assert!(CREATE_SCHOOLS_TABLE.contains("address TEXT NOT NULL"));
        assert!(CREATE_SCHOOLS_TABLE.contains("latitude REAL NOT NULL"));
        assert!(CREATE_SCHOOLS_TABLE.contains("longitude REAL NOT NULL"));
        assert!(CREATE_SCHOOLS_TABLE.contains("created_at TEXT NOT NULL"));
    }
}
