//! Row mapping between SQLite and core types
//!
//! Each table maps onto one `tabula_core` type through the `Entity` trait.
//! Identifiers are stored as hyphenated UUID text, timestamps as RFC 3339
//! text, JSON payloads (`fields.options`, `cells.value`) as JSON text.

use rusqlite::types::Type;
use rusqlite::{Connection, Params};
use serde::de::DeserializeOwned;
use tabula_core::{Cell, Field, Row, Session, Sheet, User, UserId};
use uuid::Uuid;

use crate::error::DbResult;

/// A type loaded from one table
pub trait Entity: Sized {
    /// Quoted table name
    const TABLE: &'static str;
    /// Column list matching `from_row`
    const COLUMNS: &'static str;

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;
}

/// `SELECT <columns> FROM <table> <tail>`, all matches
pub fn query_all<E: Entity, P: Params>(conn: &Connection, tail: &str, params: P) -> DbResult<Vec<E>> {
    let sql = format!("SELECT {} FROM {} {}", E::COLUMNS, E::TABLE, tail);
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params, E::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// `SELECT <columns> FROM <table> <tail> LIMIT 1`
pub fn query_one<E: Entity, P: Params>(conn: &Connection, tail: &str, params: P) -> DbResult<Option<E>> {
    let sql = format!("SELECT {} FROM {} {} LIMIT 1", E::COLUMNS, E::TABLE, tail);
    let mut stmt = conn.prepare_cached(&sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(E::from_row(row)?)),
        None => Ok(None),
    }
}

fn uuid_col<T: From<Uuid>>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text)
        .map(T::from)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn json_col<T: DeserializeOwned>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<T>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        serde_json::from_str(&t)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Serialize an optional JSON payload for storage
pub fn to_json_text<T: serde::Serialize>(value: Option<&T>) -> DbResult<Option<String>> {
    Ok(value.map(serde_json::to_string).transpose()?)
}

impl Entity for User {
    const TABLE: &'static str = "\"user\"";
    const COLUMNS: &'static str = "id, name, email, email_verified, image, created_at, updated_at";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: UserId(row.get(0)?),
            name: row.get(1)?,
            email: row.get(2)?,
            email_verified: row.get(3)?,
            image: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl Entity for Session {
    const TABLE: &'static str = "session";
    const COLUMNS: &'static str =
        "id, token, user_id, expires_at, created_at, updated_at, ip_address, user_agent";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            token: row.get(1)?,
            user_id: UserId(row.get(2)?),
            expires_at: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
            ip_address: row.get(6)?,
            user_agent: row.get(7)?,
        })
    }
}

impl Entity for Sheet {
    const TABLE: &'static str = "sheets";
    const COLUMNS: &'static str = "id, name, description, user_id, created_at, updated_at";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: uuid_col(row, 0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            user_id: UserId(row.get(3)?),
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl Entity for Field {
    const TABLE: &'static str = "fields";
    const COLUMNS: &'static str =
        "id, sheet_id, name, type, options, \"order\", created_at, updated_at";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let field_type: String = row.get(3)?;
        Ok(Self {
            id: uuid_col(row, 0)?,
            sheet_id: uuid_col(row, 1)?,
            name: row.get(2)?,
            field_type: field_type
                .parse()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
            options: json_col(row, 4)?,
            order: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl Entity for Row {
    const TABLE: &'static str = "\"rows\"";
    const COLUMNS: &'static str = "id, sheet_id, \"order\", created_at, updated_at";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: uuid_col(row, 0)?,
            sheet_id: uuid_col(row, 1)?,
            order: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

impl Entity for Cell {
    const TABLE: &'static str = "cells";
    const COLUMNS: &'static str = "id, row_id, field_id, value, updated_at";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: uuid_col(row, 0)?,
            row_id: uuid_col(row, 1)?,
            field_id: uuid_col(row, 2)?,
            value: json_col(row, 3)?,
            updated_at: row.get(4)?,
        })
    }
}
