//! Sheets - user-owned named tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::common::{SheetId, UserId};
use super::field::Field;
use super::row::Row;
use crate::error::{SheetError, SheetResult};

/// Sheet record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: SheetId,
    pub name: String,
    pub description: Option<String>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New sheet input
#[derive(Debug, Clone)]
pub struct NewSheet {
    pub name: String,
    pub description: Option<String>,
}

impl NewSheet {
    /// Validate and normalize: name must be non-empty, an empty description
    /// is stored as absent.
    pub fn validated(self) -> SheetResult<Self> {
        require_name(&self.name)?;
        Ok(Self {
            name: self.name,
            description: self.description.filter(|d| !d.is_empty()),
        })
    }
}

/// Partial sheet update.
///
/// `description: Some(None)` clears the description; `None` leaves it.
#[derive(Debug, Clone, Default)]
pub struct SheetPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl SheetPatch {
    /// Apply the patch to a sheet. An empty name keeps the current one.
    pub fn apply_to(self, sheet: &mut Sheet) {
        if let Some(name) = self.name.filter(|n| !n.is_empty()) {
            sheet.name = name;
        }
        if let Some(description) = self.description {
            sheet.description = description;
        }
    }
}

/// A sheet with everything needed to render it
#[derive(Debug, Clone, Serialize)]
pub struct SheetDetail {
    pub sheet: Sheet,
    pub fields: Vec<Field>,
    pub rows: Vec<Row>,
    pub cells: Vec<Cell>,
}

/// Require a non-empty name
pub fn require_name(name: &str) -> SheetResult<()> {
    if name.is_empty() {
        return Err(SheetError::validation("Name is required"));
    }
    Ok(())
}
