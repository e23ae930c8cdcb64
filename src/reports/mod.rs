//! Read-only reports computed from the in-memory ledger

pub mod dashboard;
pub mod sales;

pub use dashboard::*;
pub use sales::*;
