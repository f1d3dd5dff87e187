//! SQLite schema for Tabula
//!
//! Auth tables (`user`, `session`, `account`, `verification`) mirror the
//! layout of the external auth provider. Domain tables cascade on delete:
//! user -> sheets -> fields/rows -> cells.

use rusqlite::Connection;

use crate::error::{DbError, DbResult};

/// Complete Tabula schema
pub const TABULA_SCHEMA: &str = r#"
-- ============================================
-- Auth provider tables
-- ============================================
CREATE TABLE IF NOT EXISTS "user" (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    email_verified INTEGER NOT NULL DEFAULT 0,
    image TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS session (
    id TEXT PRIMARY KEY,
    expires_at TEXT NOT NULL,
    token TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    ip_address TEXT,
    user_agent TEXT,
    user_id TEXT NOT NULL REFERENCES "user"(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS account (
    id TEXT PRIMARY KEY,
    account_id TEXT NOT NULL,
    provider_id TEXT NOT NULL,
    user_id TEXT NOT NULL REFERENCES "user"(id) ON DELETE CASCADE,
    access_token TEXT,
    refresh_token TEXT,
    id_token TEXT,
    access_token_expires_at TEXT,
    refresh_token_expires_at TEXT,
    scope TEXT,
    password TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS verification (
    id TEXT PRIMARY KEY,
    identifier TEXT NOT NULL,
    value TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    created_at TEXT,
    updated_at TEXT
);

-- ============================================
-- Sheets
-- ============================================
CREATE TABLE IF NOT EXISTS sheets (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    user_id TEXT NOT NULL REFERENCES "user"(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sheets_user_name ON sheets(user_id, name);

-- ============================================
-- Fields (columns)
-- ============================================
CREATE TABLE IF NOT EXISTS fields (
    id TEXT PRIMARY KEY,
    sheet_id TEXT NOT NULL REFERENCES sheets(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    type TEXT NOT NULL DEFAULT 'text'
        CHECK (type IN ('text', 'longText', 'number', 'select', 'multiSelect', 'date', 'datetime')),
    options TEXT,
    "order" INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_fields_sheet ON fields(sheet_id, "order");

-- ============================================
-- Rows
-- ============================================
CREATE TABLE IF NOT EXISTS "rows" (
    id TEXT PRIMARY KEY,
    sheet_id TEXT NOT NULL REFERENCES sheets(id) ON DELETE CASCADE,
    "order" INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_rows_sheet ON "rows"(sheet_id, "order");

-- ============================================
-- Cells
-- ============================================
CREATE TABLE IF NOT EXISTS cells (
    id TEXT PRIMARY KEY,
    row_id TEXT NOT NULL REFERENCES "rows"(id) ON DELETE CASCADE,
    field_id TEXT NOT NULL REFERENCES fields(id) ON DELETE CASCADE,
    value TEXT,
    updated_at TEXT NOT NULL,
    UNIQUE (row_id, field_id)
);
CREATE INDEX IF NOT EXISTS idx_cells_field ON cells(field_id);
"#;

/// Create all tables. Idempotent.
pub fn init(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(TABULA_SCHEMA)
        .map_err(|e| DbError::SchemaError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init(&conn).unwrap();
        init(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
                 ('user', 'session', 'account', 'verification', 'sheets', 'fields', 'rows', 'cells')",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 8);
    }
}
