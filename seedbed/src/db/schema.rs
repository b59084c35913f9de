//! Settings database schema.

pub const SCHEMA_VERSION: i32 = 1;

const SCHEMA_VERSION_TABLE: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    updated_at TEXT NOT NULL
);
";

const SETTINGS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS settings (
    environment TEXT NOT NULL,
    type TEXT NOT NULL,
    name TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    version INTEGER NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (environment, type, name, key)
);
";

pub fn all_schemas() -> [&'static str; 2] {
    [SCHEMA_VERSION_TABLE, SETTINGS_TABLE]
}
