//! Month-to-date dashboard figures

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_products: usize,
    pub low_stock_products: usize,
    /// Number of sales dated in the current month
    pub monthly_sales: usize,
    /// Sum of totals of this month's sales
    pub total_sales: BigDecimal,
    /// Sum of this month's expenses
    pub total_expenses: BigDecimal,
    pub profit: BigDecimal,
}

/// Whether `date` falls in the same calendar month and year as `today`
pub fn same_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month()
}

/// Compute dashboard metrics for the month containing `today`.
///
/// Sales and expenses are bucketed by their own `date`, not by when they
/// were recorded.
pub fn dashboard_metrics(
    ledger: &Ledger,
    today: NaiveDate,
    default_min_stock: i64,
) -> DashboardMetrics {
    let monthly_sales: Vec<_> = ledger
        .sales()
        .iter()
        .filter(|sale| same_month(sale.date, today))
        .collect();

    let total_sales: BigDecimal = monthly_sales.iter().map(|sale| &sale.total).sum();
    let total_expenses: BigDecimal = ledger
        .expenses()
        .iter()
        .filter(|expense| same_month(expense.date, today))
        .map(|expense| &expense.amount)
        .sum();
    let profit = &total_sales - &total_expenses;

    DashboardMetrics {
        total_products: ledger.products().len(),
        low_stock_products: ledger.low_stock_products(default_min_stock).len(),
        monthly_sales: monthly_sales.len(),
        total_sales,
        total_expenses,
        profit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(id: &str, on: NaiveDate, total: i64) -> Sale {
        let now = Utc::now();
        Sale {
            id: id.to_string(),
            invoice_number: format!("INV-{id}"),
            date: on,
            customer_name: String::new(),
            customer_phone: String::new(),
            notes: String::new(),
            items: vec![SaleItem::new("p1", 1, BigDecimal::from(total))],
            total: BigDecimal::from(total),
            created_at: now,
            updated_at: now,
        }
    }

    fn expense(id: &str, on: NaiveDate, amount: i64) -> Expense {
        let now = Utc::now();
        Expense {
            id: id.to_string(),
            date: on,
            category: "Rent".to_string(),
            description: "Shop rent".to_string(),
            amount: BigDecimal::from(amount),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_metrics_only_count_current_month() {
        let ledger = Ledger::from_parts(
            Vec::new(),
            Vec::new(),
            vec![
                sale("s1", date(2024, 6, 3), 300),
                sale("s2", date(2024, 6, 28), 200),
                sale("s3", date(2024, 5, 31), 999),
                sale("s4", date(2023, 6, 15), 999),
            ],
            vec![
                expense("e1", date(2024, 6, 1), 120),
                expense("e2", date(2024, 7, 1), 999),
            ],
        );

        let metrics = dashboard_metrics(&ledger, date(2024, 6, 15), 5);
        assert_eq!(metrics.monthly_sales, 2);
        assert_eq!(metrics.total_sales, BigDecimal::from(500));
        assert_eq!(metrics.total_expenses, BigDecimal::from(120));
        assert_eq!(metrics.profit, BigDecimal::from(380));
    }

    #[test]
    fn test_profit_can_be_negative() {
        let ledger = Ledger::from_parts(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![expense("e1", date(2024, 2, 10), 75)],
        );

        let metrics = dashboard_metrics(&ledger, date(2024, 2, 29), 5);
        assert_eq!(metrics.total_sales, BigDecimal::from(0));
        assert_eq!(metrics.profit, BigDecimal::from(-75));
        assert_eq!(metrics.profit, &metrics.total_sales - &metrics.total_expenses);
    }
}
