//! # Inventory Core
//!
//! Inventory, sales and expense tracking for a small hardware store, backed
//! by a hosted document store and authentication service.
//!
//! ## Features
//!
//! - **Session-scoped ledger**: the signed-in user's categories, products,
//!   sales and expenses cached in memory after sign-in
//! - **Stock control**: sales decrement stock atomically with the sale
//!   itself; low-stock detection against per-product thresholds
//! - **Reports**: month-to-date dashboard, monthly sales chart, revenue per
//!   category, best sellers
//! - **Storage abstraction**: any per-user document service through the
//!   [`DocumentStore`] trait, with per-call timeouts
//!
//! ## Quick Start
//!
//! ```rust
//! use inventory_core::utils::{MemoryAuth, MemoryStore};
//! use inventory_core::{InventoryManager, NewProduct, SaleBuilder, User};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! # tokio_test_block();
//! # fn tokio_test_block() {
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! # rt.block_on(async {
//! let mut manager = InventoryManager::new(MemoryStore::new());
//! manager.sign_in(&MemoryAuth::new(User::new("owner"))).await.unwrap();
//!
//! let saw = manager
//!     .add_product(NewProduct::new(
//!         "SAW-1",
//!         "Hand saw",
//!         BigDecimal::from(30),
//!         BigDecimal::from(18),
//!         4,
//!     ))
//!     .await
//!     .unwrap();
//!
//! let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
//! manager
//!     .add_sale_from(SaleBuilder::new("INV-0001", date).item(&saw.id, 1, BigDecimal::from(30)))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(manager.product_required(&saw.id).unwrap().stock, 3);
//! # });
//! # }
//! ```

pub mod config;
pub mod ledger;
pub mod reports;
pub mod store;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::InventoryConfig;
pub use ledger::{InventoryManager, Ledger, ProductView, SaleBuilder, Session, DEFAULT_CATEGORIES};
pub use reports::{CategorySales, DashboardMetrics, MonthlySales, TopProduct};
pub use store::StoreAdapter;
pub use traits::*;
pub use types::*;
