//! Rows - records within a sheet

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{RowId, SheetId};

/// Row record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub sheet_id: SheetId,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
