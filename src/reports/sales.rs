//! Sales rollups: monthly chart, per-category revenue, best sellers

use bigdecimal::BigDecimal;
use chrono::{Datelike, Locale, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;
use crate::reports::dashboard::same_month;

/// Sales total for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    /// Localized label such as "Mar 2024"
    pub month: String,
    /// First day of the month
    pub period: NaiveDate,
    pub sales: BigDecimal,
}

/// Revenue attributed to one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
    pub name: String,
    pub value: BigDecimal,
}

/// Units sold of one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    pub quantity: i64,
}

/// Month label rendering settings
#[derive(Debug, Clone, Copy)]
pub struct MonthLabels<'a> {
    pub locale: Locale,
    pub format: &'a str,
}

/// Sales totals for the `months` calendar months ending with the month of
/// `today`, oldest first
pub fn sales_by_month(
    ledger: &Ledger,
    today: NaiveDate,
    months: u32,
    labels: MonthLabels<'_>,
) -> Vec<MonthlySales> {
    let Some(current) = today.with_day(1) else {
        return Vec::new();
    };

    (0..months)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .map(|period| {
            let sales = ledger
                .sales()
                .iter()
                .filter(|sale| same_month(sale.date, period))
                .map(|sale| &sale.total)
                .sum();
            MonthlySales {
                month: period
                    .format_localized(labels.format, labels.locale)
                    .to_string(),
                period,
                sales,
            }
        })
        .collect()
}

/// Revenue per category name, in order of first appearance.
///
/// Items whose product or category no longer resolves are skipped.
pub fn category_sales(ledger: &Ledger) -> Vec<CategorySales> {
    let mut totals: Vec<CategorySales> = Vec::new();

    for item in ledger.sales().iter().flat_map(|sale| sale.items.iter()) {
        let Some(category) = ledger
            .product(&item.product_id)
            .and_then(|product| ledger.category_of(product))
        else {
            continue;
        };

        let amount = item.line_total();
        match totals.iter_mut().find(|entry| entry.name == category.name) {
            Some(entry) => entry.value += amount,
            None => totals.push(CategorySales {
                name: category.name.clone(),
                value: amount,
            }),
        }
    }

    totals
}

/// Best-selling products by units, highest first.
///
/// Quantities are accumulated per product name. Ties keep the order in
/// which products were first encountered in the ledger's sales.
pub fn top_products(ledger: &Ledger, limit: usize) -> Vec<TopProduct> {
    let mut ranking: Vec<TopProduct> = Vec::new();

    for item in ledger.sales().iter().flat_map(|sale| sale.items.iter()) {
        let Some(product) = ledger.product(&item.product_id) else {
            continue;
        };

        match ranking.iter_mut().find(|entry| entry.name == product.name) {
            Some(entry) => entry.quantity += item.quantity,
            None => ranking.push(TopProduct {
                name: product.name.clone(),
                quantity: item.quantity,
            }),
        }
    }

    // sort_by is stable
    ranking.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranking.truncate(limit);
    ranking
}
