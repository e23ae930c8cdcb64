//! Product management

use tracing::{debug, warn};

use crate::ledger::InventoryManager;
use crate::traits::*;
use crate::types::*;

impl<S: DocumentStore> InventoryManager<S> {
    /// Create a product and append it to the ledger
    pub async fn add_product(&mut self, data: NewProduct) -> InventoryResult<Product> {
        let session = self
            .session
            .as_mut()
            .ok_or(InventoryError::Unauthenticated)?;
        self.validator.validate_product(&data)?;

        let product = self.store.save_product(&session.user, &data).await?;
        debug!(id = %product.id, sku = %product.sku, "Product added");
        session.ledger.push_product(product.clone());
        Ok(product)
    }

    /// Persist a partial update and merge it into the ledger.
    ///
    /// The store write is issued even when `id` is not in the ledger; the
    /// ledger is then left as is.
    pub async fn update_product(&mut self, id: &str, patch: ProductPatch) -> InventoryResult<()> {
        let session = self
            .session
            .as_mut()
            .ok_or(InventoryError::Unauthenticated)?;

        let updated_at = self
            .store
            .update_product(&session.user, id, &patch)
            .await?;
        if !session.ledger.patch_product(id, &patch, updated_at) {
            warn!(id = %id, "Updated product is not in the ledger");
        }
        Ok(())
    }

    /// Delete a product. Sales that reference it are left untouched.
    pub async fn delete_product(&mut self, id: &str) -> InventoryResult<()> {
        let session = self
            .session
            .as_mut()
            .ok_or(InventoryError::Unauthenticated)?;

        self.store.delete_product(&session.user, id).await?;
        if !session.ledger.remove_product(id) {
            warn!(id = %id, "Deleted product was not in the ledger");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStore;
    use bigdecimal::BigDecimal;

    async fn signed_in(store: &MemoryStore) -> InventoryManager<MemoryStore> {
        let mut manager = InventoryManager::new(store.clone());
        manager
            .on_auth_changed(Some(User::new("owner")))
            .await
            .unwrap();
        manager
    }

    fn drill() -> NewProduct {
        NewProduct::new(
            "DRL-01",
            "Cordless drill",
            BigDecimal::from(120),
            BigDecimal::from(80),
            10,
        )
    }

    #[tokio::test]
    async fn test_add_update_delete_product() {
        let store = MemoryStore::new();
        let mut manager = signed_in(&store).await;

        let product = manager.add_product(drill()).await.unwrap();
        assert_eq!(manager.products().unwrap().len(), 1);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let patch = ProductPatch {
            price: Some(BigDecimal::from(110)),
            stock: Some(4),
            ..ProductPatch::default()
        };
        manager.update_product(&product.id, patch).await.unwrap();

        let cached = manager.product_required(&product.id).unwrap();
        assert_eq!(cached.price, BigDecimal::from(110));
        assert_eq!(cached.stock, 4);
        assert!(cached.updated_at > product.updated_at);
        assert_eq!(cached.created_at, product.created_at);

        manager.delete_product(&product.id).await.unwrap();
        assert!(manager.products().unwrap().is_empty());
        assert!(matches!(
            manager.product_required(&product.id),
            Err(InventoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_reaches_store() {
        let store = MemoryStore::new();
        let mut manager = signed_in(&store).await;
        let product = manager.add_product(drill()).await.unwrap();

        manager
            .update_product(&product.id, ProductPatch::stock(2))
            .await
            .unwrap();
        manager.reload().await.unwrap();

        assert_eq!(manager.product_required(&product.id).unwrap().stock, 2);
    }

    #[tokio::test]
    async fn test_category_can_be_cleared() {
        let store = MemoryStore::new();
        let mut manager = signed_in(&store).await;
        let tools = manager
            .add_category(NewCategory::new("Power tools", "Corded and cordless"))
            .await
            .unwrap();
        let product = manager.add_product(drill().category(&tools.id)).await.unwrap();
        assert_eq!(product.category_id.as_deref(), Some(tools.id.as_str()));

        manager
            .update_product(&product.id, ProductPatch::category(None))
            .await
            .unwrap();
        assert_eq!(manager.product_required(&product.id).unwrap().category_id, None);

        manager.reload().await.unwrap();
        let reloaded = manager.product_required(&product.id).unwrap();
        assert_eq!(reloaded.category_id, None);
        assert_eq!(reloaded.name, product.name);
    }

    #[tokio::test]
    async fn test_invalid_product_is_rejected_before_store() {
        let store = MemoryStore::new();
        let mut manager = signed_in(&store).await;
        let calls = store.call_count();

        let mut nameless = drill();
        nameless.name = "  ".to_string();
        let result = manager.add_product(nameless).await;

        assert!(matches!(result, Err(InventoryError::Validation(_))));
        assert_eq!(store.call_count(), calls);
    }

    #[tokio::test]
    async fn test_store_failure_leaves_ledger_alone() {
        let store = MemoryStore::new();
        let mut manager = signed_in(&store).await;
        let product = manager.add_product(drill()).await.unwrap();

        store.fail_next(StoreFailureKind::Permission);
        let result = manager
            .update_product(&product.id, ProductPatch::stock(0))
            .await;

        assert_eq!(
            result.unwrap_err().store_kind(),
            Some(StoreFailureKind::Permission)
        );
        assert_eq!(manager.product_required(&product.id).unwrap().stock, 10);
    }
}
