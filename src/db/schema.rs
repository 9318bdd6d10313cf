//! SQL DDL for initializing the feedback database.

/// SQLite schema with:
/// - `feedback`: one row per submission, `id` INTEGER PRIMARY KEY
///   AUTOINCREMENT, `created_at` stored as RFC3339 text
/// - `settings`: key/value pairs; the only key currently in use is
///   `admin_password`
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    rating INTEGER NOT NULL,
    comment TEXT NOT NULL DEFAULT '',
    name TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
