//! Basic inventory usage example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use inventory_core::utils::{MemoryAuth, MemoryStore};
use inventory_core::{
    InventoryConfig, InventoryManager, NewExpense, NewProduct, SaleBuilder, User,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("inventory_core=info")),
        )
        .init();

    println!("Inventory Core - Basic Example\n");

    let config = InventoryConfig::from_env()?;
    let mut manager = InventoryManager::with_config(MemoryStore::new(), config);
    let auth = MemoryAuth::new(User {
        uid: "demo-owner".to_string(),
        display_name: Some("Demo Owner".to_string()),
        email: None,
    });

    // 1. Sign in; default categories are created on first login
    manager.sign_in(&auth).await?;
    println!("Categories:");
    for category in manager.categories()? {
        println!("  - {} ({})", category.name, category.description);
    }

    // 2. Stock the shelves
    let tools_id = manager
        .categories()?
        .iter()
        .find(|c| c.name == "Tools")
        .map(|c| c.id.clone());
    let mut drill = NewProduct::new(
        "DRL-18V",
        "Cordless drill 18V",
        BigDecimal::from(129),
        BigDecimal::from(85),
        6,
    )
    .supplier("Makita");
    drill.category_id = tools_id;
    let drill = manager.add_product(drill).await?;

    let screws = manager
        .add_product(
            NewProduct::new(
                "SCR-4x40",
                "Wood screws 4x40 (100)",
                BigDecimal::from(7),
                BigDecimal::from(3),
                40,
            )
            .min_stock(10),
        )
        .await?;
    println!("\nAdded {} products", manager.products()?.len());

    // 3. Ring up a sale
    let today = NaiveDate::from_ymd_opt(2024, 5, 18).ok_or("invalid date")?;
    let sale = manager
        .add_sale_from(
            SaleBuilder::new("INV-000123", today)
                .customer("Ana Torres", "555-0142")
                .item(&drill.id, 2, drill.price.clone())
                .item(&screws.id, 31, screws.price.clone()),
        )
        .await?;
    println!("Recorded sale {} for {}", sale.invoice_number, sale.total);

    // 4. Pay the rent
    manager
        .add_expense(NewExpense::new(today, "Rent", "May rent", BigDecimal::from(450)))
        .await?;

    // 5. Reports
    let metrics = manager.dashboard_metrics_at(today)?;
    println!("\nDashboard for May 2024:");
    println!("  Products:      {}", metrics.total_products);
    println!("  Low stock:     {}", metrics.low_stock_products);
    println!("  Sales:         {} totalling {}", metrics.monthly_sales, metrics.total_sales);
    println!("  Expenses:      {}", metrics.total_expenses);
    println!("  Profit:        {}", metrics.profit);

    println!("\nLow stock:");
    for product in manager.low_stock_products()? {
        println!("  - {} ({} left)", product.name, product.stock);
    }

    println!("\nSales by month:");
    for month in manager.sales_data_at(today, 3)? {
        println!("  {:>10}: {}", month.month, month.sales);
    }

    println!("\nTop products:");
    for (rank, product) in manager.top_products_default()?.iter().enumerate() {
        println!("  {}. {} - {} sold", rank + 1, product.name, product.quantity);
    }

    manager.sign_out(&auth).await?;
    println!("\nSigned out");
    Ok(())
}
