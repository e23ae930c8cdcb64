//! In-memory ledger of the signed-in user's records

use chrono::{DateTime, Utc};

use crate::types::*;

/// A product joined with its resolved category
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView<'a> {
    pub product: &'a Product,
    /// `None` when the product has no category or the reference dangles
    pub category: Option<&'a Category>,
}

/// Cached categories, products, sales and expenses for one session
///
/// Loaded once at sign-in and then patched incrementally by the manager.
/// Sales and expenses are kept most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    categories: Vec<Category>,
    products: Vec<Product>,
    sales: Vec<Sale>,
    expenses: Vec<Expense>,
}

impl Ledger {
    /// Build a ledger from freshly loaded collections
    pub fn from_parts(
        categories: Vec<Category>,
        products: Vec<Product>,
        sales: Vec<Sale>,
        expenses: Vec<Expense>,
    ) -> Self {
        Self {
            categories,
            products,
            sales,
            expenses,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    pub fn expense(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Resolve a product's category reference
    pub fn category_of(&self, product: &Product) -> Option<&Category> {
        product
            .category_id
            .as_deref()
            .and_then(|id| self.category(id))
    }

    /// Every product with its category resolved
    pub fn products_with_category(&self) -> Vec<ProductView<'_>> {
        self.products
            .iter()
            .map(|product| ProductView {
                product,
                category: self.category_of(product),
            })
            .collect()
    }

    /// Products whose sku, name, description, supplier or category name
    /// contains `term`, ignoring case
    pub fn search_products(&self, term: &str) -> Vec<ProductView<'_>> {
        let needle = term.trim().to_lowercase();
        self.products_with_category()
            .into_iter()
            .filter(|view| {
                if needle.is_empty() {
                    return true;
                }
                let product = view.product;
                [
                    product.sku.as_str(),
                    product.name.as_str(),
                    product.description.as_str(),
                    product.supplier.as_str(),
                    view.category.map(|c| c.name.as_str()).unwrap_or(""),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Products at or below their reorder threshold
    pub fn low_stock_products(&self, default_min_stock: i64) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_low_stock(default_min_stock))
            .collect()
    }

    pub(crate) fn push_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub(crate) fn push_product(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Merge `patch` into the product with `id`. Returns false if absent.
    pub(crate) fn patch_product(
        &mut self,
        id: &str,
        patch: &ProductPatch,
        updated_at: DateTime<Utc>,
    ) -> bool {
        match self.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                patch.apply_to(product);
                product.updated_at = updated_at;
                true
            }
            None => false,
        }
    }

    /// Returns false if no product had `id`
    pub(crate) fn remove_product(&mut self, id: &str) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        self.products.len() != before
    }

    pub(crate) fn prepend_sale(&mut self, sale: Sale) {
        self.sales.insert(0, sale);
    }

    pub(crate) fn prepend_expense(&mut self, expense: Expense) {
        self.expenses.insert(0, expense);
    }

    pub(crate) fn patch_expense(
        &mut self,
        id: &str,
        patch: &ExpensePatch,
        updated_at: DateTime<Utc>,
    ) -> bool {
        match self.expenses.iter_mut().find(|e| e.id == id) {
            Some(expense) => {
                patch.apply_to(expense);
                expense.updated_at = updated_at;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_expense(&mut self, id: &str) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        self.expenses.len() != before
    }
}
