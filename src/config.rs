//! Runtime configuration for the inventory manager

use chrono::Locale;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::types::*;

/// Tunables for reports, seeding and store calls
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Reorder threshold for products without a positive `min_stock`
    pub default_min_stock: i64,
    /// Default length of the top products ranking
    pub top_products_limit: usize,
    /// Default number of monthly buckets in the sales chart
    pub sales_chart_months: u32,
    /// Upper bound on each store call; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    /// Create the default categories when a user has none
    pub seed_default_categories: bool,
    /// Locale used to render month labels
    pub month_label_locale: Locale,
    /// strftime pattern for month labels
    pub month_label_format: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            default_min_stock: 5,
            top_products_limit: 10,
            sales_chart_months: 6,
            request_timeout: None,
            seed_default_categories: true,
            month_label_locale: Locale::en_US,
            month_label_format: "%b %Y".to_string(),
        }
    }
}

impl InventoryConfig {
    /// Build a configuration from `INVENTORY_*` environment variables,
    /// falling back to defaults for anything unset
    pub fn from_env() -> InventoryResult<Self> {
        let mut config = Self::default();

        if let Some(min_stock) = parse_var::<i64>("INVENTORY_DEFAULT_MIN_STOCK")? {
            config.default_min_stock = min_stock;
        }
        if let Some(limit) = parse_var::<usize>("INVENTORY_TOP_PRODUCTS_LIMIT")? {
            config.top_products_limit = limit;
        }
        if let Some(months) = parse_var::<u32>("INVENTORY_SALES_CHART_MONTHS")? {
            config.sales_chart_months = months;
        }
        if let Some(millis) = parse_var::<u64>("INVENTORY_REQUEST_TIMEOUT_MS")? {
            config.request_timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }
        if let Some(seed) = parse_var::<bool>("INVENTORY_SEED_DEFAULT_CATEGORIES")? {
            config.seed_default_categories = seed;
        }
        if let Ok(format) = env::var("INVENTORY_MONTH_LABEL_FORMAT") {
            config.month_label_format = format;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_month_labels(mut self, locale: Locale, format: impl Into<String>) -> Self {
        self.month_label_locale = locale;
        self.month_label_format = format.into();
        self
    }

    pub fn without_category_seeding(mut self) -> Self {
        self.seed_default_categories = false;
        self
    }

    /// Reject values the reports cannot work with
    pub fn validate(&self) -> InventoryResult<()> {
        if self.default_min_stock < 0 {
            return Err(InventoryError::Config(format!(
                "default_min_stock must not be negative, got {}",
                self.default_min_stock
            )));
        }
        if self.month_label_format.trim().is_empty() {
            return Err(InventoryError::Config(
                "month_label_format cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str) -> InventoryResult<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| InventoryError::Config(format!("{name} has invalid value '{raw}'"))),
        Err(_) => Ok(None),
    }
}
