//! Ledger module containing the in-memory cache and the inventory manager

pub mod cache;
pub mod core;
pub mod expense;
pub mod product;
pub mod sale;

pub use cache::*;
pub use self::core::*;
pub use sale::SaleBuilder;
