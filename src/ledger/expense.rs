//! Expense management

use tracing::{debug, warn};

use crate::ledger::InventoryManager;
use crate::traits::*;
use crate::types::*;

impl<S: DocumentStore> InventoryManager<S> {
    /// Create an expense and put it at the front of the ledger
    pub async fn add_expense(&mut self, data: NewExpense) -> InventoryResult<Expense> {
        let session = self
            .session
            .as_mut()
            .ok_or(InventoryError::Unauthenticated)?;
        self.validator.validate_expense(&data)?;

        let expense = self.store.save_expense(&session.user, &data).await?;
        debug!(id = %expense.id, amount = %expense.amount, "Expense added");
        session.ledger.prepend_expense(expense.clone());
        Ok(expense)
    }

    /// Persist a partial update and merge it into the ledger
    pub async fn update_expense(&mut self, id: &str, patch: ExpensePatch) -> InventoryResult<()> {
        let session = self
            .session
            .as_mut()
            .ok_or(InventoryError::Unauthenticated)?;

        let updated_at = self
            .store
            .update_expense(&session.user, id, &patch)
            .await?;
        if !session.ledger.patch_expense(id, &patch, updated_at) {
            warn!(id = %id, "Updated expense is not in the ledger");
        }
        Ok(())
    }

    pub async fn delete_expense(&mut self, id: &str) -> InventoryResult<()> {
        let session = self
            .session
            .as_mut()
            .ok_or(InventoryError::Unauthenticated)?;

        self.store.delete_expense(&session.user, id).await?;
        if !session.ledger.remove_expense(id) {
            warn!(id = %id, "Deleted expense was not in the ledger");
        }
        Ok(())
    }
}
