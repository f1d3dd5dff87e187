//! Cell Service Implementation

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tabula_core::store::CellStore;
use tabula_core::{Cell, CellId, CellValue, SheetError, SheetResult, UserId};
use tracing::info;

use super::access::require_owner;
use crate::repos::SheetDatabase;

/// Cell Service
pub struct CellService {
    database: Arc<SheetDatabase>,
}

impl CellService {
    pub fn new(database: Arc<SheetDatabase>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl CellStore for CellService {
    async fn update_cell(
        &self,
        owner: &UserId,
        cell_id: &CellId,
        value: Option<CellValue>,
    ) -> SheetResult<Cell> {
        let (caller, id) = (owner.clone(), *cell_id);
        let cell = self
            .database
            .transact(move |db, tx| {
                let cell_owner = db
                    .cells
                    .owner_of(tx, &id)?
                    .ok_or_else(|| SheetError::not_found("Cell"))?;
                require_owner(&cell_owner, &caller)?;

                db.cells.update_value(tx, &id, value.as_ref(), Utc::now())?;
                db.cells
                    .get(tx, &id)?
                    .ok_or_else(|| SheetError::not_found("Cell"))
            })
            .await?;

        info!(cell_id = %cell_id, row_id = %cell.row_id, field_id = %cell.field_id, "Cell updated");
        Ok(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{FieldService, RowService, SheetService};
    use super::*;
    use tabula_core::store::{FieldStore, RowStore, SheetStore};
    use tabula_core::{NewField, NewSheet};

    #[tokio::test]
    async fn test_update_cell_only_touches_cell() {
        let db = database();
        let alice = user(&db, "alice").await;
        let bob = user(&db, "bob").await;
        let sheets = SheetService::new(db.clone());
        let sheet = sheets
            .create_sheet(
                &alice.id,
                NewSheet {
                    name: "Contacts".into(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let field = FieldService::new(db.clone())
            .create_field(
                &alice.id,
                &sheet.id,
                NewField {
                    name: "name".into(),
                    field_type: None,
                    options: None,
                },
            )
            .await
            .unwrap();
        let row = RowService::new(db.clone())
            .create_row(&alice.id, &sheet.id)
            .await
            .unwrap();
        let before = sheets.get_sheet(&alice.id, &sheet.id).await.unwrap();
        let cell_id = before.cells[0].id;

        let service = CellService::new(db);
        assert!(matches!(
            service.update_cell(&bob.id, &cell_id, None).await,
            Err(SheetError::Forbidden(_))
        ));
        assert!(matches!(
            service.update_cell(&alice.id, &CellId::generate(), None).await,
            Err(SheetError::NotFound(_))
        ));

        let cell = service
            .update_cell(&alice.id, &cell_id, Some("Alice".into()))
            .await
            .unwrap();
        assert_eq!(cell.value, Some(CellValue::Text("Alice".into())));
        assert_eq!((cell.row_id, cell.field_id), (row.id, field.id));

        let after = sheets.get_sheet(&alice.id, &sheet.id).await.unwrap();
        assert_eq!(after.rows[0].updated_at, before.rows[0].updated_at);
        assert_eq!(after.fields[0].updated_at, before.fields[0].updated_at);

        let cleared = service.update_cell(&alice.id, &cell_id, None).await.unwrap();
        assert_eq!(cleared.value, None);
    }
}
