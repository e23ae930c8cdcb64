//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that a money amount is not negative
pub fn validate_non_negative_amount(label: &str, amount: &BigDecimal) -> InventoryResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(InventoryError::Validation(format!(
            "{label} cannot be negative"
        )))
    } else {
        Ok(())
    }
}

/// Validate that a SKU is valid
pub fn validate_sku(sku: &str) -> InventoryResult<()> {
    if sku.trim().is_empty() {
        return Err(InventoryError::Validation("SKU cannot be empty".to_string()));
    }

    if sku.len() > 32 {
        return Err(InventoryError::Validation(
            "SKU cannot exceed 32 characters".to_string(),
        ));
    }

    // Alphanumeric, dashes, underscores
    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(InventoryError::Validation(
            "SKU can only contain alphanumeric characters, dashes, and underscores".to_string(),
        ));
    }

    Ok(())
}

/// Validate a free-text name field
pub fn validate_name(label: &str, name: &str) -> InventoryResult<()> {
    if name.trim().is_empty() {
        return Err(InventoryError::Validation(format!("{label} cannot be empty")));
    }

    if name.len() > 100 {
        return Err(InventoryError::Validation(format!(
            "{label} cannot exceed 100 characters"
        )));
    }

    Ok(())
}

/// Validator that adds price, SKU and invoice checks on top of the defaults
pub struct StrictRecordValidator;

impl RecordValidator for StrictRecordValidator {
    fn validate_product(&self, product: &NewProduct) -> InventoryResult<()> {
        DefaultRecordValidator.validate_product(product)?;

        validate_sku(&product.sku)?;
        validate_name("Product name", &product.name)?;
        validate_non_negative_amount("Price", &product.price)?;
        validate_non_negative_amount("Cost", &product.cost)?;

        if product.min_stock.is_some_and(|min| min < 0) {
            return Err(InventoryError::Validation(
                "Minimum stock cannot be negative".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_sale(&self, header: &SaleHeader, items: &[SaleItem]) -> InventoryResult<()> {
        DefaultRecordValidator.validate_sale(header, items)?;

        if header.invoice_number.trim().is_empty() {
            return Err(InventoryError::Validation(
                "Invoice number cannot be empty".to_string(),
            ));
        }

        for item in items {
            validate_non_negative_amount("Item price", &item.price)?;
        }

        Ok(())
    }

    fn validate_expense(&self, expense: &NewExpense) -> InventoryResult<()> {
        DefaultRecordValidator.validate_expense(expense)?;
        validate_non_negative_amount("Expense amount", &expense.amount)
    }
}
