//! Ownership checks

use rusqlite::Connection;
use tabula_core::{Sheet, SheetError, SheetId, SheetResult, UserId};

use crate::repos::SheetDatabase;

/// How a sheet owned by someone else is reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnForeign {
    /// Pretend the sheet does not exist (`NotFound`)
    Conceal,
    /// Report the ownership failure (`Forbidden`)
    Deny,
}

/// Load a sheet and check that `owner` owns it
pub(crate) fn owned_sheet(
    database: &SheetDatabase,
    conn: &Connection,
    owner: &UserId,
    sheet_id: &SheetId,
    on_foreign: OnForeign,
) -> SheetResult<Sheet> {
    let sheet = database
        .sheets
        .get(conn, sheet_id)?
        .ok_or_else(|| SheetError::not_found("Sheet"))?;

    if &sheet.user_id != owner {
        return Err(match on_foreign {
            OnForeign::Conceal => SheetError::not_found("Sheet"),
            OnForeign::Deny => SheetError::forbidden(),
        });
    }
    Ok(sheet)
}

/// Check that the owner of a resource is the caller
pub(crate) fn require_owner(resource_owner: &UserId, caller: &UserId) -> SheetResult<()> {
    if resource_owner != caller {
        return Err(SheetError::forbidden());
    }
    Ok(())
}
