//! Record projection
//!
//! The public per-sheet API exposes rows as flat JSON objects keyed by field
//! name: `{ "_id": <rowId>, "<fieldName>": value, ... }`. This module converts
//! between that shape and the normalized field/row/cell model.
//!
//! Rules:
//! - fields appear in `order`; a row without a cell for a field reads `null`
//! - when two fields share a name, the later one (by order) wins on read and
//!   every one of them receives the value on write
//! - keys that do not name a field are ignored on write
//! - `_id` always holds the row id; a field named `_id` is not projected

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::constants::RECORD_ID_KEY;
use crate::error::{SheetError, SheetResult};
use crate::types::{Cell, CellValue, Field, FieldId, Row, RowId};

/// Flattened view of one row
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RowId,
    /// Field name and value, in field order, names unique
    pub values: Vec<(String, Option<CellValue>)>,
}

impl Record {
    /// Look up a value by field name. `None` means no such field.
    pub fn get(&self, name: &str) -> Option<Option<&CellValue>> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_ref())
    }

    fn push(&mut self, name: &str, value: Option<CellValue>) {
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name.to_string(), value)),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(RECORD_ID_KEY, &self.id)?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Build a record from a row's field values, `fields` sorted by order
pub fn build_record<'a, F>(row_id: RowId, fields: &[Field], mut value_of: F) -> Record
where
    F: FnMut(&FieldId) -> Option<&'a CellValue>,
{
    let mut record = Record {
        id: row_id,
        values: Vec::with_capacity(fields.len()),
    };
    for field in fields.iter().filter(|f| f.name != RECORD_ID_KEY) {
        record.push(&field.name, value_of(&field.id).cloned());
    }
    record
}

/// Project one row. `cells` may contain cells of other rows.
pub fn project_row(row_id: RowId, fields: &[Field], cells: &[Cell]) -> Record {
    let by_field: HashMap<FieldId, &Cell> = cells
        .iter()
        .filter(|c| c.row_id == row_id)
        .map(|c| (c.field_id, c))
        .collect();
    build_record(row_id, fields, |field_id| {
        by_field.get(field_id).and_then(|c| c.value.as_ref())
    })
}

/// Project every row, keeping the order of `rows`
pub fn project_rows(rows: &[Row], fields: &[Field], cells: &[Cell]) -> Vec<Record> {
    let index: HashMap<(RowId, FieldId), &Cell> =
        cells.iter().map(|c| ((c.row_id, c.field_id), c)).collect();
    rows.iter()
        .map(|row| {
            build_record(row.id, fields, |field_id| {
                index.get(&(row.id, *field_id)).and_then(|c| c.value.as_ref())
            })
        })
        .collect()
}

/// Body of a record write, keyed by field name
#[derive(Debug, Clone, Default)]
pub struct RecordInput {
    values: Map<String, Value>,
}

impl RecordInput {
    /// Accept a JSON object; anything else is a validation error
    pub fn from_json(body: Value) -> SheetResult<Self> {
        match body {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(SheetError::validation("Request body must be a JSON object")),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// One value per field; fields missing from the input get `None`
    pub fn values_for_all(&self, fields: &[Field]) -> SheetResult<Vec<(FieldId, Option<CellValue>)>> {
        fields
            .iter()
            .map(|field| {
                let value = match self.values.get(&field.name) {
                    Some(v) => CellValue::from_json(v)?,
                    None => None,
                };
                Ok((field.id, value))
            })
            .collect()
    }

    /// Values only for fields named in the input
    pub fn values_for_present(
        &self,
        fields: &[Field],
    ) -> SheetResult<Vec<(FieldId, Option<CellValue>)>> {
        fields
            .iter()
            .filter_map(|field| {
                self.values
                    .get(&field.name)
                    .map(|v| CellValue::from_json(v).map(|value| (field.id, value)))
            })
            .collect()
    }
}

impl From<Map<String, Value>> for RecordInput {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellId, FieldType, SheetId};
    use chrono::Utc;
    use serde_json::json;

    fn field(sheet_id: SheetId, name: &str, order: i64) -> Field {
        let now = Utc::now();
        Field {
            id: FieldId::generate(),
            sheet_id,
            name: name.into(),
            field_type: FieldType::Text,
            options: None,
            order,
            created_at: now,
            updated_at: now,
        }
    }

    fn row(sheet_id: SheetId, order: i64) -> Row {
        let now = Utc::now();
        Row {
            id: RowId::generate(),
            sheet_id,
            order,
            created_at: now,
            updated_at: now,
        }
    }

    fn cell(row: &Row, field: &Field, value: Option<CellValue>) -> Cell {
        Cell {
            id: CellId::generate(),
            row_id: row.id,
            field_id: field.id,
            value,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_project_rows_missing_cell_is_null() {
        let sheet = SheetId::generate();
        let name = field(sheet, "name", 0);
        let age = field(sheet, "age", 1);
        let r1 = row(sheet, 0);
        let r2 = row(sheet, 1);
        let cells = vec![
            cell(&r1, &name, Some("Alice".into())),
            cell(&r1, &age, Some(25.into())),
            cell(&r2, &name, Some("Bob".into())),
        ];

        let records = project_rows(&[r1.clone(), r2.clone()], &[name, age], &cells);
        assert_eq!(records.len(), 2);
        assert_eq!(
            serde_json::to_value(&records[0]).unwrap(),
            json!({"_id": r1.id.to_string(), "name": "Alice", "age": 25})
        );
        assert_eq!(
            serde_json::to_value(&records[1]).unwrap(),
            json!({"_id": r2.id.to_string(), "name": "Bob", "age": null})
        );
    }

    #[test]
    fn test_serialize_keeps_field_order() {
        let sheet = SheetId::generate();
        let b = field(sheet, "b", 0);
        let a = field(sheet, "a", 1);
        let r = row(sheet, 0);
        let record = project_row(r.id, &[b, a], &[]);
        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, format!("{{\"_id\":\"{}\",\"b\":null,\"a\":null}}", r.id));
    }

    #[test]
    fn test_field_named_id_does_not_shadow_row_id() {
        let sheet = SheetId::generate();
        let shadow = field(sheet, "_id", 0);
        let name = field(sheet, "name", 1);
        let r = row(sheet, 0);
        let cells = vec![
            cell(&r, &shadow, Some("spoofed".into())),
            cell(&r, &name, Some("Alice".into())),
        ];
        let record = project_row(r.id, &[shadow, name], &cells);
        assert_eq!(record.get("_id"), None);

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, format!("{{\"_id\":\"{}\",\"name\":\"Alice\"}}", r.id));
    }

    #[test]
    fn test_duplicate_names_later_field_wins() {
        let sheet = SheetId::generate();
        let first = field(sheet, "name", 0);
        let second = field(sheet, "name", 1);
        let r = row(sheet, 0);
        let cells = vec![
            cell(&r, &first, Some("old".into())),
            cell(&r, &second, Some("new".into())),
        ];
        let record = project_row(r.id, &[first, second], &cells);
        assert_eq!(record.values.len(), 1);
        assert_eq!(record.get("name"), Some(Some(&CellValue::Text("new".into()))));
    }

    #[test]
    fn test_input_values_for_all_defaults_to_null() {
        let sheet = SheetId::generate();
        let name = field(sheet, "name", 0);
        let age = field(sheet, "age", 1);
        let input = RecordInput::from_json(json!({"name": "Alice", "extra": 1})).unwrap();
        let values = input.values_for_all(&[name.clone(), age.clone()]).unwrap();
        assert_eq!(values, vec![(name.id, Some("Alice".into())), (age.id, None)]);
    }

    #[test]
    fn test_input_values_for_present_only() {
        let sheet = SheetId::generate();
        let name = field(sheet, "name", 0);
        let age = field(sheet, "age", 1);
        let input = RecordInput::from_json(json!({"age": null})).unwrap();
        let values = input.values_for_present(&[name, age.clone()]).unwrap();
        assert_eq!(values, vec![(age.id, None)]);
        assert!(input.contains("age"));
        assert!(!input.contains("name"));
    }

    #[test]
    fn test_input_must_be_object() {
        assert!(RecordInput::from_json(json!([1, 2])).is_err());
        assert!(RecordInput::from_json(json!("x")).is_err());
    }

    #[test]
    fn test_input_rejects_bad_value() {
        let sheet = SheetId::generate();
        let name = field(sheet, "name", 0);
        let input = RecordInput::from_json(json!({"name": {"nested": true}})).unwrap();
        assert!(input.values_for_all(&[name]).is_err());
    }
}
