//! Core types and data structures for the inventory system

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The signed-in user every record is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier assigned by the authentication service
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl User {
    /// Create a user with only an identifier
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
        }
    }

    /// Name to show in logs: display name, then email, then uid
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

/// Product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A stocked product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Weak reference to a [`Category`]; may dangle
    #[serde(default)]
    pub category_id: Option<String>,
    pub price: BigDecimal,
    pub cost: BigDecimal,
    /// Units on hand. Sales can drive this negative.
    pub stock: i64,
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default)]
    pub supplier: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Reorder threshold for this product.
    ///
    /// A missing or zero `min_stock` falls back to `default_min_stock`.
    pub fn effective_min_stock(&self, default_min_stock: i64) -> i64 {
        self.min_stock
            .filter(|min| *min != 0)
            .unwrap_or(default_min_stock)
    }

    /// Whether stock is at or below the reorder threshold
    pub fn is_low_stock(&self, default_min_stock: i64) -> bool {
        self.stock <= self.effective_min_stock(default_min_stock)
    }
}

/// Data needed to create a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category_id: Option<String>,
    pub price: BigDecimal,
    pub cost: BigDecimal,
    pub stock: i64,
    pub min_stock: Option<i64>,
    pub supplier: String,
}

impl NewProduct {
    /// Create a product draft with the required fields; the rest start empty
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        price: BigDecimal,
        cost: BigDecimal,
        stock: i64,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            description: String::new(),
            category_id: None,
            price,
            cost,
            stock,
            min_stock: None,
            supplier: String::new(),
        }
    }

    pub fn category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn min_stock(mut self, min_stock: i64) -> Self {
        self.min_stock = Some(min_stock);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = supplier.into();
        self
    }
}

/// Partial product update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `Some(None)` clears the category
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub category_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

impl ProductPatch {
    /// Patch that only sets the stock level
    pub fn stock(stock: i64) -> Self {
        Self {
            stock: Some(stock),
            ..Self::default()
        }
    }

    /// Patch that moves the product to `category_id`, or out of any
    /// category when `None`
    pub fn category(category_id: Option<String>) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }

    /// Merge this patch into `product`
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(sku) = &self.sku {
            product.sku = sku.clone();
        }
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(category_id) = &self.category_id {
            product.category_id = category_id.clone();
        }
        if let Some(price) = &self.price {
            product.price = price.clone();
        }
        if let Some(cost) = &self.cost {
            product.cost = cost.clone();
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(min_stock) = self.min_stock {
            product.min_stock = Some(min_stock);
        }
        if let Some(supplier) = &self.supplier {
            product.supplier = supplier.clone();
        }
    }
}

// A present `null` maps to `Some(None)` rather than `None`
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// One line of a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    /// Weak reference to a [`Product`]; may dangle after the product is deleted
    pub product_id: String,
    pub quantity: i64,
    /// Unit price at the time of sale
    pub price: BigDecimal,
}

impl SaleItem {
    pub fn new(product_id: impl Into<String>, quantity: i64, price: BigDecimal) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            price,
        }
    }

    /// quantity x unit price
    pub fn line_total(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }
}

/// Customer-facing header of a sale, as entered at the counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleHeader {
    pub invoice_number: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub notes: String,
}

impl SaleHeader {
    pub fn new(invoice_number: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            date,
            customer_name: String::new(),
            customer_phone: String::new(),
            notes: String::new(),
        }
    }
}

/// A recorded sale. `total` is frozen at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub invoice_number: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub notes: String,
    pub items: Vec<SaleItem>,
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sale document as written to the store, before an id is assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub invoice_number: String,
    pub date: NaiveDate,
    pub customer_name: String,
    pub customer_phone: String,
    pub notes: String,
    pub items: Vec<SaleItem>,
    pub total: BigDecimal,
}

impl NewSale {
    /// Combine a header and its items, computing the total
    pub fn from_parts(header: SaleHeader, items: Vec<SaleItem>) -> Self {
        let total = items.iter().map(SaleItem::line_total).sum();
        Self {
            invoice_number: header.invoice_number,
            date: header.date,
            customer_name: header.customer_name,
            customer_phone: header.customer_phone,
            notes: header.notes,
            items,
            total,
        }
    }
}

/// A business expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    /// Free-text label, not a [`Category`] reference
    #[serde(default)]
    pub category: String,
    pub description: String,
    pub amount: BigDecimal,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: String,
    pub description: String,
    pub amount: BigDecimal,
    pub notes: String,
}

impl NewExpense {
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: BigDecimal,
    ) -> Self {
        Self {
            date,
            category: category.into(),
            description: description.into(),
            amount,
            notes: String::new(),
        }
    }
}

/// Partial expense update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExpensePatch {
    /// Merge this patch into `expense`
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(category) = &self.category {
            expense.category = category.clone();
        }
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(amount) = &self.amount {
            expense.amount = amount.clone();
        }
        if let Some(notes) = &self.notes {
            expense.notes = notes.clone();
        }
    }
}

/// Per-user document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Categories,
    Products,
    Sales,
    Expenses,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Products => "products",
            Collection::Sales => "sales",
            Collection::Expenses => "expenses",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a store call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreFailureKind {
    /// The service could not be reached
    Network,
    /// The service rejected the caller
    Permission,
    /// The target document does not exist
    NotFound,
    /// The call did not complete within the configured timeout
    Timeout,
    Unknown,
}

impl fmt::Display for StoreFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreFailureKind::Network => "network",
            StoreFailureKind::Permission => "permission",
            StoreFailureKind::NotFound => "not found",
            StoreFailureKind::Timeout => "timeout",
            StoreFailureKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Errors that can occur in the inventory system
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("No authenticated user")]
    Unauthenticated,
    #[error("Store failure ({kind}): {message}")]
    Store {
        kind: StoreFailureKind,
        message: String,
    },
    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Authentication failure: {0}")]
    Auth(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InventoryError {
    /// Shorthand for a [`InventoryError::Store`] failure
    pub fn store(kind: StoreFailureKind, message: impl Into<String>) -> Self {
        InventoryError::Store {
            kind,
            message: message.into(),
        }
    }

    /// The store failure kind, if this is a store failure
    pub fn store_kind(&self) -> Option<StoreFailureKind> {
        match self {
            InventoryError::Store { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;
