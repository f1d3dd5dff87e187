//! Field Service Implementation
//!
//! Implements `FieldStore`. New fields are appended after the current last
//! field and never back-fill cells into existing rows.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;
use std::sync::Arc;
use tabula_core::store::FieldStore;
use tabula_core::{
    check_order, next_order, Field, FieldId, FieldPatch, NewField, OrderUpdate, SheetError,
    SheetId, SheetResult, UserId,
};
use tracing::{debug, info};

use super::access::{owned_sheet, OnForeign};
use crate::repos::SheetDatabase;

/// Field Service
pub struct FieldService {
    database: Arc<SheetDatabase>,
}

impl FieldService {
    pub fn new(database: Arc<SheetDatabase>) -> Self {
        Self { database }
    }
}

fn field_in_sheet(
    database: &SheetDatabase,
    conn: &Connection,
    owner: &UserId,
    sheet_id: &SheetId,
    field_id: &FieldId,
) -> SheetResult<Field> {
    owned_sheet(database, conn, owner, sheet_id, OnForeign::Deny)?;
    database
        .fields
        .get_in_sheet(conn, sheet_id, field_id)?
        .ok_or_else(|| SheetError::not_found("Field"))
}

#[async_trait]
impl FieldStore for FieldService {
    async fn create_field(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        input: NewField,
    ) -> SheetResult<Field> {
        input.validate()?;

        let (caller, id) = (owner.clone(), *sheet_id);
        let field = self
            .database
            .transact(move |db, tx| {
                owned_sheet(db, tx, &caller, &id, OnForeign::Conceal)?;
                let now = Utc::now();
                let field = Field {
                    id: FieldId::generate(),
                    sheet_id: id,
                    name: input.name,
                    field_type: input.field_type.unwrap_or_default(),
                    options: input.options,
                    order: next_order(db.fields.max_order(tx, &id)?)?,
                    created_at: now,
                    updated_at: now,
                };
                db.fields.insert(tx, &field)?;
                Ok::<_, SheetError>(field)
            })
            .await?;

        info!(
            sheet_id = %sheet_id,
            field_id = %field.id,
            field_type = %field.field_type,
            order = field.order,
            "Field created"
        );
        Ok(field)
    }

    async fn update_field(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        field_id: &FieldId,
        patch: FieldPatch,
    ) -> SheetResult<Field> {
        let (caller, sheet, id) = (owner.clone(), *sheet_id, *field_id);
        let field = self
            .database
            .transact(move |db, tx| {
                let mut field = field_in_sheet(db, tx, &caller, &sheet, &id)?;
                patch.apply_to(&mut field)?;
                field.updated_at = Utc::now();
                db.fields.update(tx, &field)?;
                Ok::<_, SheetError>(field)
            })
            .await?;

        info!(sheet_id = %sheet_id, field_id = %field_id, "Field updated");
        Ok(field)
    }

    async fn delete_field(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        field_id: &FieldId,
    ) -> SheetResult<()> {
        let (caller, sheet, id) = (owner.clone(), *sheet_id, *field_id);
        self.database
            .transact(move |db, tx| {
                field_in_sheet(db, tx, &caller, &sheet, &id)?;
                db.fields.delete(tx, &id)?;
                Ok::<_, SheetError>(())
            })
            .await?;

        info!(sheet_id = %sheet_id, field_id = %field_id, "Field deleted");
        Ok(())
    }

    async fn reorder_fields(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        orders: &[OrderUpdate<FieldId>],
    ) -> SheetResult<usize> {
        for update in orders {
            check_order(update.order)?;
        }

        let (caller, id, batch) = (owner.clone(), *sheet_id, orders.to_vec());
        let updated = self
            .database
            .transact(move |db, tx| {
                owned_sheet(db, tx, &caller, &id, OnForeign::Deny)?;
                let now = Utc::now();
                let mut updated = 0;
                for update in &batch {
                    updated += db.fields.set_order(tx, &id, &update.id, update.order, now)?;
                }
                Ok::<_, SheetError>(updated)
            })
            .await?;

        if updated < orders.len() {
            debug!(
                sheet_id = %sheet_id,
                skipped = orders.len() - updated,
                "Ignored order updates for fields outside the sheet"
            );
        }
        info!(sheet_id = %sheet_id, count = updated, "Fields reordered");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{RowService, SheetService};
    use super::*;
    use tabula_core::store::{RowStore, SheetStore};
    use tabula_core::{FieldOptions, FieldType, NewSheet, Sheet, User};

    fn new_field(name: &str) -> NewField {
        NewField {
            name: name.to_string(),
            field_type: None,
            options: None,
        }
    }

    async fn setup() -> (Arc<SheetDatabase>, User, Sheet, FieldService) {
        let db = database();
        let alice = user(&db, "alice").await;
        let sheet = SheetService::new(db.clone())
            .create_sheet(
                &alice.id,
                NewSheet {
                    name: "Contacts".into(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let service = FieldService::new(db.clone());
        (db, alice, sheet, service)
    }

    #[tokio::test]
    async fn test_create_appends_in_order() {
        let (_db, alice, sheet, service) = setup().await;

        let a = service.create_field(&alice.id, &sheet.id, new_field("a")).await.unwrap();
        let b = service.create_field(&alice.id, &sheet.id, new_field("b")).await.unwrap();

        assert_eq!(a.order, 0);
        assert_eq!(b.order, 1);
        assert_eq!(a.field_type, FieldType::Text);
    }

    #[tokio::test]
    async fn test_order_follows_max_not_count() {
        let (_db, alice, sheet, service) = setup().await;
        let a = service.create_field(&alice.id, &sheet.id, new_field("a")).await.unwrap();
        service
            .reorder_fields(&alice.id, &sheet.id, &[OrderUpdate { id: a.id, order: 10 }])
            .await
            .unwrap();

        let b = service.create_field(&alice.id, &sheet.id, new_field("b")).await.unwrap();
        assert_eq!(b.order, 11);
    }

    #[tokio::test]
    async fn test_field_after_rows_adds_no_cells() {
        let (db, alice, sheet, service) = setup().await;
        let rows = RowService::new(db.clone());
        service.create_field(&alice.id, &sheet.id, new_field("a")).await.unwrap();
        rows.create_row(&alice.id, &sheet.id).await.unwrap();

        service.create_field(&alice.id, &sheet.id, new_field("b")).await.unwrap();

        let detail = SheetService::new(db)
            .get_sheet(&alice.id, &sheet.id)
            .await
            .unwrap();
        assert_eq!(detail.fields.len(), 2);
        assert_eq!(detail.cells.len(), 1);
    }

    #[tokio::test]
    async fn test_reorder_fields() {
        let (db, alice, sheet, service) = setup().await;
        let a = service.create_field(&alice.id, &sheet.id, new_field("A")).await.unwrap();
        let b = service.create_field(&alice.id, &sheet.id, new_field("B")).await.unwrap();

        let updated = service
            .reorder_fields(
                &alice.id,
                &sheet.id,
                &[
                    OrderUpdate { id: a.id, order: 1 },
                    OrderUpdate { id: b.id, order: 0 },
                ],
            )
            .await
            .unwrap();
        assert_eq!(updated, 2);

        let names: Vec<_> = SheetService::new(db)
            .get_sheet(&alice.id, &sheet.id)
            .await
            .unwrap()
            .fields
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_reorder_skips_foreign_ids() {
        let (db, alice, sheet, service) = setup().await;
        let other = SheetService::new(db.clone())
            .create_sheet(
                &alice.id,
                NewSheet {
                    name: "Other".into(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let a = service.create_field(&alice.id, &sheet.id, new_field("a")).await.unwrap();
        let foreign = service.create_field(&alice.id, &other.id, new_field("x")).await.unwrap();

        let updated = service
            .reorder_fields(
                &alice.id,
                &sheet.id,
                &[
                    OrderUpdate { id: a.id, order: 5 },
                    OrderUpdate { id: foreign.id, order: 9 },
                    OrderUpdate { id: FieldId::generate(), order: 3 },
                ],
            )
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let untouched = db
            .read(|conn| Ok::<_, SheetError>(db.fields.get_in_sheet(conn, &other.id, &foreign.id)?))
            .unwrap()
            .unwrap();
        assert_eq!(untouched.order, 0);
    }

    #[tokio::test]
    async fn test_ownership_errors() {
        let (db, alice, sheet, service) = setup().await;
        let bob = user(&db, "bob").await;
        let a = service.create_field(&alice.id, &sheet.id, new_field("a")).await.unwrap();

        assert!(matches!(
            service.create_field(&bob.id, &sheet.id, new_field("b")).await,
            Err(SheetError::NotFound(_))
        ));
        assert!(matches!(
            service
                .update_field(&bob.id, &sheet.id, &a.id, FieldPatch::default())
                .await,
            Err(SheetError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete_field(&bob.id, &sheet.id, &a.id).await,
            Err(SheetError::Forbidden(_))
        ));
        assert!(matches!(
            service.reorder_fields(&bob.id, &sheet.id, &[]).await,
            Err(SheetError::Forbidden(_))
        ));
        assert!(matches!(
            service.reorder_fields(&alice.id, &SheetId::generate(), &[]).await,
            Err(SheetError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_field() {
        let (db, alice, sheet, service) = setup().await;
        let rows = RowService::new(db.clone());
        let status = service.create_field(&alice.id, &sheet.id, new_field("status")).await.unwrap();
        rows.create_row(&alice.id, &sheet.id).await.unwrap();

        let updated = service
            .update_field(
                &alice.id,
                &sheet.id,
                &status.id,
                FieldPatch {
                    name: None,
                    field_type: Some(FieldType::Select),
                    options: Some(Some(FieldOptions {
                        choices: Some(vec!["open".into(), "closed".into()]),
                        ..Default::default()
                    })),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "status");
        assert_eq!(updated.field_type, FieldType::Select);

        service.delete_field(&alice.id, &sheet.id, &status.id).await.unwrap();
        assert!(matches!(
            service.delete_field(&alice.id, &sheet.id, &status.id).await,
            Err(SheetError::NotFound(_))
        ));

        let detail = SheetService::new(db)
            .get_sheet(&alice.id, &sheet.id)
            .await
            .unwrap();
        assert!(detail.fields.is_empty());
        assert!(detail.cells.is_empty());
        assert_eq!(detail.rows.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_orders() {
        let (_db, alice, sheet, service) = setup().await;
        let service = Arc::new(service);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                let owner = alice.id.clone();
                let sheet_id = sheet.id;
                tokio::spawn(async move {
                    service
                        .create_field(&owner, &sheet_id, new_field(&format!("field{}", i)))
                        .await
                })
            })
            .collect();

        let mut orders = Vec::new();
        for handle in handles {
            orders.push(handle.await.unwrap().unwrap().order);
        }
        orders.sort_unstable();
        assert_eq!(orders, (0..16).collect::<Vec<i64>>());
    }
}
