//! Sale recording and stock adjustment

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::ledger::{InventoryManager, Ledger};
use crate::traits::*;
use crate::types::*;

/// Builder for a sale header and its items
#[derive(Debug)]
pub struct SaleBuilder {
    header: SaleHeader,
    items: Vec<SaleItem>,
}

impl SaleBuilder {
    /// Start a sale with an invoice number and date
    pub fn new(invoice_number: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            header: SaleHeader::new(invoice_number, date),
            items: Vec::new(),
        }
    }

    pub fn customer(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.header.customer_name = name.into();
        self.header.customer_phone = phone.into();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.header.notes = notes.into();
        self
    }

    /// Add a line for `quantity` units of a product at `price` each
    pub fn item(mut self, product_id: impl Into<String>, quantity: i64, price: BigDecimal) -> Self {
        self.items.push(SaleItem::new(product_id, quantity, price));
        self
    }

    /// Running total of the lines added so far
    pub fn total(&self) -> BigDecimal {
        self.items.iter().map(SaleItem::line_total).sum()
    }

    /// Split into the header and items expected by
    /// [`InventoryManager::add_sale`]
    pub fn build(self) -> (SaleHeader, Vec<SaleItem>) {
        (self.header, self.items)
    }
}

/// New stock levels after selling `items`, one entry per product in order
/// of first appearance.
///
/// Products missing from the ledger are skipped. A product on several lines
/// is decremented once per line.
pub(crate) fn stock_after_sale(ledger: &Ledger, items: &[SaleItem]) -> Vec<(String, i64)> {
    let mut levels: Vec<(String, i64)> = Vec::new();

    for item in items {
        if let Some((_, stock)) = levels.iter_mut().find(|(id, _)| *id == item.product_id) {
            *stock -= item.quantity;
            continue;
        }
        match ledger.product(&item.product_id) {
            Some(product) => levels.push((product.id.clone(), product.stock - item.quantity)),
            None => warn!(product_id = %item.product_id, "Sold product is not in the ledger"),
        }
    }

    levels
}

impl<S: DocumentStore> InventoryManager<S> {
    /// Record a sale and decrement stock for every sold product.
    ///
    /// The sale and the stock updates are committed to the store
    /// atomically. On failure neither the store nor the ledger changes.
    pub async fn add_sale(
        &mut self,
        header: SaleHeader,
        items: Vec<SaleItem>,
    ) -> InventoryResult<Sale> {
        let session = self
            .session
            .as_mut()
            .ok_or(InventoryError::Unauthenticated)?;
        self.validator.validate_sale(&header, &items)?;

        let stock_levels = stock_after_sale(&session.ledger, &items);
        let new_sale = NewSale::from_parts(header, items);

        let (sale, updated_at) = self
            .store
            .commit_sale(&session.user, &new_sale, &stock_levels)
            .await?;

        for (product_id, stock) in &stock_levels {
            session
                .ledger
                .patch_product(product_id, &ProductPatch::stock(*stock), updated_at);
        }
        session.ledger.prepend_sale(sale.clone());

        info!(
            id = %sale.id,
            invoice = %sale.invoice_number,
            total = %sale.total,
            items = sale.items.len(),
            "Sale recorded"
        );
        Ok(sale)
    }

    /// Record a sale assembled with a [`SaleBuilder`]
    pub async fn add_sale_from(&mut self, builder: SaleBuilder) -> InventoryResult<Sale> {
        let (header, items) = builder.build();
        self.add_sale(header, items).await
    }
}
