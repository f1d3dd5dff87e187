//! Cells - the value of one field for one row

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{CellId, FieldId, RowId};
use crate::error::{SheetError, SheetResult};

/// Non-null cell value.
///
/// Values are loosely typed: any field may hold any variant. A missing value
/// is represented as `Option::None` by the containing type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(serde_json::Number),
    Text(String),
    /// Multi-select choices
    List(Vec<String>),
}

impl CellValue {
    /// Convert from arbitrary JSON. `null` maps to `None`; booleans, objects
    /// and arrays holding non-strings are rejected.
    pub fn from_json(value: &Value) -> SheetResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => Ok(Some(Self::Number(n.clone()))),
            Value::String(s) => Ok(Some(Self::Text(s.clone()))),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(SheetError::validation(
                        "List cell values must contain only strings",
                    )),
                })
                .collect::<SheetResult<Vec<_>>>()
                .map(|list| Some(Self::List(list))),
            Value::Bool(_) | Value::Object(_) => Err(SheetError::validation(
                "Cell value must be a string, number, list of strings or null",
            )),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

/// Cell record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub row_id: RowId,
    pub field_id: FieldId,
    pub value: Option<CellValue>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(CellValue::from_json(&json!(null)).unwrap(), None);
        assert_eq!(
            CellValue::from_json(&json!("Alice")).unwrap(),
            Some(CellValue::Text("Alice".into()))
        );
        assert_eq!(
            CellValue::from_json(&json!(25)).unwrap(),
            Some(CellValue::from(25))
        );
    }

    #[test]
    fn test_from_json_list() {
        assert_eq!(
            CellValue::from_json(&json!(["red", "blue"])).unwrap(),
            Some(CellValue::List(vec!["red".into(), "blue".into()]))
        );
        assert!(CellValue::from_json(&json!(["red", 1])).is_err());
    }

    #[test]
    fn test_from_json_rejects_bool_and_object() {
        assert!(CellValue::from_json(&json!(true)).is_err());
        assert!(CellValue::from_json(&json!({"a": 1})).is_err());
    }

    #[test]
    fn test_integer_stays_integer() {
        let value = CellValue::from_json(&json!(25)).unwrap().unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), "25");
        let value = CellValue::from_json(&json!(2.5)).unwrap().unwrap();
        assert_eq!(serde_json::to_value(&value).unwrap(), json!(2.5));
    }

    #[test]
    fn test_untagged_deserialize() {
        let value: CellValue = serde_json::from_str("[\"a\"]").unwrap();
        assert_eq!(value, CellValue::List(vec!["a".into()]));
        let value: CellValue = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(value, CellValue::Text("7".into()));
    }
}
