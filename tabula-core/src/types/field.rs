//! Fields - typed column definitions within a sheet

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::common::{FieldId, SheetId};
use super::sheet::require_name;
use crate::error::{SheetError, SheetResult};

/// Column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    /// Single line text
    #[default]
    Text,
    /// Multi-line text
    LongText,
    Number,
    /// One of `options.choices`
    Select,
    /// Any subset of `options.choices`
    MultiSelect,
    Date,
    Datetime,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        Self::Text,
        Self::LongText,
        Self::Number,
        Self::Select,
        Self::MultiSelect,
        Self::Date,
        Self::Datetime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::LongText => "longText",
            Self::Number => "number",
            Self::Select => "select",
            Self::MultiSelect => "multiSelect",
            Self::Date => "date",
            Self::Datetime => "datetime",
        }
    }
}

impl FromStr for FieldType {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SheetError::validation(format!("Invalid field type: {}", s)))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number display format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

/// Type-dependent field options. Unknown keys are ignored and no option is
/// required for any type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<NumberFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

/// Field record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub sheet_id: SheetId,
    pub name: String,
    pub field_type: FieldType,
    pub options: Option<FieldOptions>,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New field input
#[derive(Debug, Clone)]
pub struct NewField {
    pub name: String,
    pub field_type: Option<FieldType>,
    pub options: Option<FieldOptions>,
}

impl NewField {
    pub fn validate(&self) -> SheetResult<()> {
        require_name(&self.name)
    }
}

/// Partial field update
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub field_type: Option<FieldType>,
    pub options: Option<Option<FieldOptions>>,
}

impl FieldPatch {
    pub fn apply_to(self, field: &mut Field) -> SheetResult<()> {
        if let Some(name) = self.name {
            require_name(&name)?;
            field.name = name;
        }
        if let Some(field_type) = self.field_type {
            field.field_type = field_type;
        }
        if let Some(options) = self.options {
            field.options = options;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_wire_names() {
        for t in FieldType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            assert_eq!(t.as_str().parse::<FieldType>().unwrap(), t);
        }
    }

    #[test]
    fn test_field_type_rejects_unknown() {
        assert!(matches!(
            "checkbox".parse::<FieldType>(),
            Err(SheetError::Validation(_))
        ));
    }

    #[test]
    fn test_default_field_type_is_text() {
        assert_eq!(FieldType::default(), FieldType::Text);
    }

    #[test]
    fn test_options_camel_case() {
        let options: FieldOptions = serde_json::from_value(serde_json::json!({
            "choices": ["a", "b"],
            "numberFormat": { "decimals": 2, "prefix": "$" },
            "dateFormat": "YYYY-MM-DD",
            "somethingElse": true
        }))
        .unwrap();
        assert_eq!(options.choices.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(options.number_format.unwrap().decimals, Some(2));
        assert_eq!(options.date_format.as_deref(), Some("YYYY-MM-DD"));
    }

    #[test]
    fn test_patch_rejects_empty_name() {
        let now = Utc::now();
        let mut field = Field {
            id: FieldId::generate(),
            sheet_id: SheetId::generate(),
            name: "age".into(),
            field_type: FieldType::Number,
            options: None,
            order: 0,
            created_at: now,
            updated_at: now,
        };
        let patch = FieldPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.apply_to(&mut field).is_err());
        assert_eq!(field.name, "age");
    }
}
