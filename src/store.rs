//! Typed, per-user access to the document store
//!
//! [`StoreAdapter`] turns domain records into documents, stamps
//! `createdAt`/`updatedAt` on every write and bounds each call with the
//! configured timeout. It holds no business logic.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::traits::*;
use crate::types::*;

const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

/// Store adapter wrapping a [`DocumentStore`]
pub struct StoreAdapter<S: DocumentStore> {
    store: S,
    timeout: Option<Duration>,
}

impl<S: DocumentStore> StoreAdapter<S> {
    pub fn new(store: S, timeout: Option<Duration>) -> Self {
        Self { store, timeout }
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.store
    }

    // Categories
    pub async fn save_category(
        &self,
        user: &User,
        category: &NewCategory,
    ) -> InventoryResult<Category> {
        self.create(user, Collection::Categories, category).await
    }

    pub async fn list_categories(&self, user: &User) -> InventoryResult<Vec<Category>> {
        self.list(user, Collection::Categories, OrderBy::asc("name")).await
    }

    // Products
    pub async fn save_product(
        &self,
        user: &User,
        product: &NewProduct,
    ) -> InventoryResult<Product> {
        self.create(user, Collection::Products, product).await
    }

    pub async fn list_products(&self, user: &User) -> InventoryResult<Vec<Product>> {
        self.list(user, Collection::Products, OrderBy::asc("name")).await
    }

    pub async fn update_product(
        &self,
        user: &User,
        id: &str,
        patch: &ProductPatch,
    ) -> InventoryResult<DateTime<Utc>> {
        self.update(user, Collection::Products, id, patch).await
    }

    pub async fn delete_product(&self, user: &User, id: &str) -> InventoryResult<()> {
        self.delete(user, Collection::Products, id).await
    }

    // Sales
    pub async fn list_sales(&self, user: &User) -> InventoryResult<Vec<Sale>> {
        self.list(user, Collection::Sales, OrderBy::desc("date")).await
    }

    /// Persist a sale together with the resulting stock levels in one
    /// atomic commit.
    ///
    /// Returns the stored sale and the timestamp stamped on the products.
    pub async fn commit_sale(
        &self,
        user: &User,
        sale: &NewSale,
        stock_levels: &[(String, i64)],
    ) -> InventoryResult<(Sale, DateTime<Utc>)> {
        ensure_scope(user)?;
        let now = Utc::now();
        let sale_fields = stamp_new(to_fields(sale)?, now)?;

        let mut writes = Vec::with_capacity(stock_levels.len() + 1);
        writes.push(WriteOp::Create {
            collection: Collection::Sales,
            fields: sale_fields.clone(),
        });
        for (product_id, stock) in stock_levels {
            let patch = stamp_update(to_fields(&ProductPatch::stock(*stock))?, now)?;
            writes.push(WriteOp::Update {
                collection: Collection::Products,
                id: product_id.clone(),
                patch,
            });
        }

        debug!(
            uid = %user.uid,
            invoice = %sale.invoice_number,
            stock_updates = stock_levels.len(),
            "Committing sale"
        );
        let ids = self.bounded(self.store.commit(user, writes)).await?;

        let sale_id = ids.into_iter().next().flatten().ok_or_else(|| {
            InventoryError::store(
                StoreFailureKind::Unknown,
                "commit did not return an id for the sale",
            )
        })?;
        let stored = from_document(Document {
            id: sale_id,
            fields: sale_fields,
        })?;
        Ok((stored, now))
    }

    // Expenses
    pub async fn save_expense(
        &self,
        user: &User,
        expense: &NewExpense,
    ) -> InventoryResult<Expense> {
        self.create(user, Collection::Expenses, expense).await
    }

    pub async fn list_expenses(&self, user: &User) -> InventoryResult<Vec<Expense>> {
        self.list(user, Collection::Expenses, OrderBy::desc("date")).await
    }

    pub async fn update_expense(
        &self,
        user: &User,
        id: &str,
        patch: &ExpensePatch,
    ) -> InventoryResult<DateTime<Utc>> {
        self.update(user, Collection::Expenses, id, patch).await
    }

    pub async fn delete_expense(&self, user: &User, id: &str) -> InventoryResult<()> {
        self.delete(user, Collection::Expenses, id).await
    }

    async fn create<T, R>(
        &self,
        user: &User,
        collection: Collection,
        record: &T,
    ) -> InventoryResult<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        ensure_scope(user)?;
        let fields = stamp_new(to_fields(record)?, Utc::now())?;

        debug!(uid = %user.uid, %collection, "Creating document");
        let document = self.bounded(self.store.create(user, collection, fields)).await?;
        debug!(uid = %user.uid, %collection, id = %document.id, "Created document");

        from_document(document)
    }

    async fn list<R: DeserializeOwned>(
        &self,
        user: &User,
        collection: Collection,
        order: OrderBy,
    ) -> InventoryResult<Vec<R>> {
        ensure_scope(user)?;

        let documents = self.bounded(self.store.list(user, collection, order)).await?;
        debug!(uid = %user.uid, %collection, count = documents.len(), "Listed documents");

        documents.into_iter().map(from_document).collect()
    }

    async fn update<T: Serialize>(
        &self,
        user: &User,
        collection: Collection,
        id: &str,
        patch: &T,
    ) -> InventoryResult<DateTime<Utc>> {
        ensure_scope(user)?;
        let now = Utc::now();
        let patch = stamp_update(to_fields(patch)?, now)?;

        debug!(uid = %user.uid, %collection, id = %id, "Updating document");
        self.bounded(self.store.update(user, collection, id, patch)).await?;
        Ok(now)
    }

    async fn delete(&self, user: &User, collection: Collection, id: &str) -> InventoryResult<()> {
        ensure_scope(user)?;

        debug!(uid = %user.uid, %collection, id = %id, "Deleting document");
        self.bounded(self.store.delete(user, collection, id)).await
    }

    async fn bounded<T, F>(&self, call: F) -> InventoryResult<T>
    where
        F: Future<Output = InventoryResult<T>>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                InventoryError::store(
                    StoreFailureKind::Timeout,
                    format!("store call exceeded {} ms", limit.as_millis()),
                )
            })?,
            None => call.await,
        }
    }
}

fn ensure_scope(user: &User) -> InventoryResult<()> {
    if user.uid.trim().is_empty() {
        return Err(InventoryError::Unauthenticated);
    }
    Ok(())
}

fn to_fields<T: Serialize>(record: &T) -> InventoryResult<Fields> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(InventoryError::Validation(format!(
            "record must serialize to an object, got {other}"
        ))),
    }
}

fn stamp_new(mut fields: Fields, now: DateTime<Utc>) -> InventoryResult<Fields> {
    let stamp = serde_json::to_value(now)?;
    fields.insert(CREATED_AT.to_string(), stamp.clone());
    fields.insert(UPDATED_AT.to_string(), stamp);
    Ok(fields)
}

fn stamp_update(mut fields: Fields, now: DateTime<Utc>) -> InventoryResult<Fields> {
    fields.insert(UPDATED_AT.to_string(), serde_json::to_value(now)?);
    Ok(fields)
}

fn from_document<R: DeserializeOwned>(document: Document) -> InventoryResult<R> {
    Ok(serde_json::from_value(document.into_value())?)
}
