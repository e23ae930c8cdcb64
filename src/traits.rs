//! Traits for storage, authentication and validation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::*;

/// Field map of a stored document
pub type Fields = Map<String, Value>;

/// A stored document: its store-assigned id plus its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Flatten into a single JSON object with the id as the `id` field
    pub fn into_value(self) -> Value {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id));
        Value::Object(fields)
    }
}

/// Sort direction for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// Ordering for a collection listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: &'static str,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

/// One write inside an atomic [`DocumentStore::commit`]
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Create {
        collection: Collection,
        fields: Fields,
    },
    Update {
        collection: Collection,
        id: String,
        patch: Fields,
    },
    Delete {
        collection: Collection,
        id: String,
    },
}

/// Storage abstraction for the per-user document service
///
/// Every call is scoped to `user`. Implementations assign document ids on
/// create and must fail with [`StoreFailureKind::NotFound`] when an update
/// targets a document that does not exist.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document and return it with its assigned id
    async fn create(
        &self,
        user: &User,
        collection: Collection,
        fields: Fields,
    ) -> InventoryResult<Document>;

    /// List every document in a collection in the given order
    async fn list(
        &self,
        user: &User,
        collection: Collection,
        order: OrderBy,
    ) -> InventoryResult<Vec<Document>>;

    /// Merge `patch` into an existing document
    async fn update(
        &self,
        user: &User,
        collection: Collection,
        id: &str,
        patch: Fields,
    ) -> InventoryResult<()>;

    /// Delete a document
    async fn delete(&self, user: &User, collection: Collection, id: &str) -> InventoryResult<()>;

    /// Apply all writes atomically: either every write lands or none does.
    ///
    /// Returns the assigned id for each `Create`, `None` for other writes,
    /// in the same order as `writes`.
    async fn commit(&self, user: &User, writes: Vec<WriteOp>)
        -> InventoryResult<Vec<Option<String>>>;
}

/// Authentication service
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Start a sign-in flow and return the signed-in user
    async fn sign_in(&self) -> InventoryResult<User>;

    /// End the current sign-in
    async fn sign_out(&self) -> InventoryResult<()>;
}

/// Trait for implementing custom record validation rules
pub trait RecordValidator: Send + Sync {
    /// Validate a product before saving
    fn validate_product(&self, product: &NewProduct) -> InventoryResult<()>;

    /// Validate a sale before saving
    fn validate_sale(&self, header: &SaleHeader, items: &[SaleItem]) -> InventoryResult<()>;

    /// Validate an expense before saving
    fn validate_expense(&self, expense: &NewExpense) -> InventoryResult<()>;
}

/// Default validator with the basic rules the counter UI relies on
pub struct DefaultRecordValidator;

impl RecordValidator for DefaultRecordValidator {
    fn validate_product(&self, product: &NewProduct) -> InventoryResult<()> {
        if product.name.trim().is_empty() {
            return Err(InventoryError::Validation(
                "Product name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_sale(&self, _header: &SaleHeader, items: &[SaleItem]) -> InventoryResult<()> {
        if items.is_empty() {
            return Err(InventoryError::Validation(
                "Sale must have at least one item".to_string(),
            ));
        }

        for item in items {
            if item.product_id.trim().is_empty() {
                return Err(InventoryError::Validation(
                    "Sale item must reference a product".to_string(),
                ));
            }
            if item.quantity <= 0 {
                return Err(InventoryError::Validation(format!(
                    "Quantity for product '{}' must be positive",
                    item.product_id
                )));
            }
        }

        Ok(())
    }

    fn validate_expense(&self, expense: &NewExpense) -> InventoryResult<()> {
        if expense.description.trim().is_empty() {
            return Err(InventoryError::Validation(
                "Expense description cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
