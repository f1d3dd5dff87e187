//! Field repository

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tabula_core::{Field, FieldId, SheetId};

use crate::entities::{query_all, query_one, to_json_text};
use crate::error::DbResult;

/// Field repository
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRepo;

impl FieldRepo {
    pub fn insert(&self, conn: &Connection, field: &Field) -> DbResult<()> {
        conn.execute(
            "INSERT INTO fields (id, sheet_id, name, type, options, \"order\", created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                field.id.to_string(),
                field.sheet_id.to_string(),
                field.name,
                field.field_type.as_str(),
                to_json_text(field.options.as_ref())?,
                field.order,
                field.created_at,
                field.updated_at
            ],
        )?;
        Ok(())
    }

    /// Field by id, only if it belongs to `sheet_id`
    pub fn get_in_sheet(
        &self,
        conn: &Connection,
        sheet_id: &SheetId,
        field_id: &FieldId,
    ) -> DbResult<Option<Field>> {
        query_one(
            conn,
            "WHERE id = ?1 AND sheet_id = ?2",
            params![field_id.to_string(), sheet_id.to_string()],
        )
    }

    /// Fields of a sheet, left to right
    pub fn list_by_sheet(&self, conn: &Connection, sheet_id: &SheetId) -> DbResult<Vec<Field>> {
        query_all(
            conn,
            "WHERE sheet_id = ?1 ORDER BY \"order\", created_at, rowid",
            params![sheet_id.to_string()],
        )
    }

    pub fn max_order(&self, conn: &Connection, sheet_id: &SheetId) -> DbResult<Option<i64>> {
        let max = conn
            .query_row(
                "SELECT MAX(\"order\") FROM fields WHERE sheet_id = ?1",
                params![sheet_id.to_string()],
                |r| r.get::<_, Option<i64>>(0),
            )
            .optional()?;
        Ok(max.flatten())
    }

    pub fn update(&self, conn: &Connection, field: &Field) -> DbResult<usize> {
        Ok(conn.execute(
            "UPDATE fields SET name = ?2, type = ?3, options = ?4, updated_at = ?5 WHERE id = ?1",
            params![
                field.id.to_string(),
                field.name,
                field.field_type.as_str(),
                to_json_text(field.options.as_ref())?,
                field.updated_at
            ],
        )?)
    }

    /// Set the order of one field of `sheet_id`; 0 when the field is elsewhere
    pub fn set_order(
        &self,
        conn: &Connection,
        sheet_id: &SheetId,
        field_id: &FieldId,
        order: i64,
        now: DateTime<Utc>,
    ) -> DbResult<usize> {
        Ok(conn.execute(
            "UPDATE fields SET \"order\" = ?3, updated_at = ?4 WHERE id = ?1 AND sheet_id = ?2",
            params![field_id.to_string(), sheet_id.to_string(), order, now],
        )?)
    }

    /// Delete a field; its cells cascade
    pub fn delete(&self, conn: &Connection, field_id: &FieldId) -> DbResult<usize> {
        Ok(conn.execute(
            "DELETE FROM fields WHERE id = ?1",
            params![field_id.to_string()],
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use tabula_core::{FieldOptions, FieldType};

    fn field(sheet_id: SheetId, name: &str, order: i64) -> Field {
        let now = Utc::now();
        Field {
            id: FieldId::generate(),
            sheet_id,
            name: name.into(),
            field_type: FieldType::Select,
            options: Some(FieldOptions {
                choices: Some(vec!["a".into(), "b".into()]),
                ..Default::default()
            }),
            order,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_insert_and_list_in_order() {
        let db = database();
        db.read(|conn| {
            let alice = user(conn, "alice");
            let s = sheet(conn, &alice.id, "s");
            assert_eq!(db.fields.max_order(conn, &s.id)?, None);

            let second = field(s.id, "second", 1);
            let first = field(s.id, "first", 0);
            db.fields.insert(conn, &second)?;
            db.fields.insert(conn, &first)?;

            let listed = db.fields.list_by_sheet(conn, &s.id)?;
            let ids: Vec<_> = listed.iter().map(|f| f.id).collect();
            assert_eq!(ids, vec![first.id, second.id]);
            assert_eq!(listed[0].field_type, FieldType::Select);
            assert_eq!(listed[0].options, first.options);
            assert_eq!(db.fields.max_order(conn, &s.id)?, Some(1));
            Ok::<_, crate::DbError>(())
        })
        .unwrap();
    }

    #[test]
    fn test_set_order_is_scoped_to_sheet() {
        let db = database();
        db.read(|conn| {
            let alice = user(conn, "alice");
            let a = sheet(conn, &alice.id, "a");
            let b = sheet(conn, &alice.id, "b");
            let f = field(b.id, "f", 0);
            db.fields.insert(conn, &f)?;

            assert_eq!(db.fields.set_order(conn, &a.id, &f.id, 5, Utc::now())?, 0);
            assert_eq!(db.fields.set_order(conn, &b.id, &f.id, 5, Utc::now())?, 1);
            assert_eq!(db.fields.get_in_sheet(conn, &b.id, &f.id)?.unwrap().order, 5);
            assert!(db.fields.get_in_sheet(conn, &a.id, &f.id)?.is_none());
            Ok::<_, crate::DbError>(())
        })
        .unwrap();
    }
}
