//! Inventory manager: session lifecycle, reads and reports

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::config::InventoryConfig;
use crate::ledger::{Ledger, ProductView};
use crate::reports::{self, CategorySales, DashboardMetrics, MonthLabels, MonthlySales, TopProduct};
use crate::store::StoreAdapter;
use crate::traits::*;
use crate::types::*;

/// Categories created for a user who has none yet
pub const DEFAULT_CATEGORIES: [(&str, &str); 5] = [
    ("Tools", "Hand and power tools"),
    ("Construction", "Building materials"),
    ("Plumbing", "Pipes and plumbing fittings"),
    ("Electrical", "Cables and electrical components"),
    ("Paint", "Paints and painting tools"),
];

/// One signed-in user's state. Dropped on sign-out.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) user: User,
    pub(crate) ledger: Ledger,
}

impl Session {
    fn new(user: User) -> Self {
        Self {
            user,
            ledger: Ledger::default(),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

/// Main entry point: business rules over the ledger, persisted through the
/// store
pub struct InventoryManager<S: DocumentStore> {
    pub(crate) store: StoreAdapter<S>,
    pub(crate) session: Option<Session>,
    pub(crate) config: InventoryConfig,
    pub(crate) validator: Box<dyn RecordValidator>,
}

impl<S: DocumentStore> InventoryManager<S> {
    /// Create a manager with default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, InventoryConfig::default())
    }

    /// Create a manager with the given configuration
    pub fn with_config(store: S, config: InventoryConfig) -> Self {
        Self::with_validator(store, config, Box::new(DefaultRecordValidator))
    }

    /// Create a manager with a custom validator
    pub fn with_validator(
        store: S,
        config: InventoryConfig,
        validator: Box<dyn RecordValidator>,
    ) -> Self {
        Self {
            store: StoreAdapter::new(store, config.request_timeout),
            session: None,
            config,
            validator,
        }
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// The active session, if someone is signed in
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(Session::user)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    // Session lifecycle
    /// Sign in through `auth` and open a session for the returned user
    pub async fn sign_in<A: AuthProvider>(&mut self, auth: &A) -> InventoryResult<User> {
        let user = auth.sign_in().await?;
        self.on_auth_changed(Some(user.clone())).await?;
        Ok(user)
    }

    /// Sign out through `auth` and discard the session
    pub async fn sign_out<A: AuthProvider>(&mut self, auth: &A) -> InventoryResult<()> {
        auth.sign_out().await?;
        self.on_auth_changed(None).await
    }

    /// React to an authentication transition.
    ///
    /// `Some(user)` replaces any existing session with a freshly loaded one;
    /// `None` drops it. If loading fails the new session stays open with
    /// whatever was loaded, and the error is returned.
    pub async fn on_auth_changed(&mut self, user: Option<User>) -> InventoryResult<()> {
        match user {
            Some(user) => {
                info!(user = %user.label(), "Opening session");
                self.session = Some(Session::new(user));
                self.reload().await
            }
            None => {
                if let Some(session) = self.session.take() {
                    info!(user = %session.user.label(), "Session closed");
                }
                Ok(())
            }
        }
    }

    /// Re-fetch every collection for the current user
    pub async fn reload(&mut self) -> InventoryResult<()> {
        let session = self
            .session
            .as_mut()
            .ok_or(InventoryError::Unauthenticated)?;
        let user = &session.user;

        let mut categories = self.store.list_categories(user).await?;
        if categories.is_empty() && self.config.seed_default_categories {
            warn!(user = %user.label(), "No categories found, seeding defaults");
            for (name, description) in DEFAULT_CATEGORIES {
                self.store
                    .save_category(user, &NewCategory::new(name, description))
                    .await?;
            }
            categories = self.store.list_categories(user).await?;
        }

        let products = self.store.list_products(user).await?;
        let sales = self.store.list_sales(user).await?;
        let expenses = self.store.list_expenses(user).await?;
        session.ledger = Ledger::from_parts(categories, products, sales, expenses);

        info!(
            user = %session.user.label(),
            categories = session.ledger.categories().len(),
            products = session.ledger.products().len(),
            sales = session.ledger.sales().len(),
            expenses = session.ledger.expenses().len(),
            "Ledger loaded"
        );
        Ok(())
    }

    // Reads
    /// The current session's ledger
    pub fn ledger(&self) -> InventoryResult<&Ledger> {
        self.session
            .as_ref()
            .map(Session::ledger)
            .ok_or(InventoryError::Unauthenticated)
    }

    pub fn categories(&self) -> InventoryResult<&[Category]> {
        Ok(self.ledger()?.categories())
    }

    pub fn products(&self) -> InventoryResult<&[Product]> {
        Ok(self.ledger()?.products())
    }

    /// Sales, most recent first
    pub fn sales(&self) -> InventoryResult<&[Sale]> {
        Ok(self.ledger()?.sales())
    }

    /// Expenses, most recent first
    pub fn expenses(&self) -> InventoryResult<&[Expense]> {
        Ok(self.ledger()?.expenses())
    }

    pub fn products_with_category(&self) -> InventoryResult<Vec<ProductView<'_>>> {
        Ok(self.ledger()?.products_with_category())
    }

    pub fn search_products(&self, term: &str) -> InventoryResult<Vec<ProductView<'_>>> {
        Ok(self.ledger()?.search_products(term))
    }

    /// Look up a product that must exist in the ledger
    pub fn product_required(&self, id: &str) -> InventoryResult<&Product> {
        self.ledger()?
            .product(id)
            .ok_or_else(|| InventoryError::NotFound {
                collection: Collection::Products,
                id: id.to_string(),
            })
    }

    /// Look up a sale that must exist in the ledger
    pub fn sale_required(&self, id: &str) -> InventoryResult<&Sale> {
        self.ledger()?
            .sale(id)
            .ok_or_else(|| InventoryError::NotFound {
                collection: Collection::Sales,
                id: id.to_string(),
            })
    }

    // Categories
    /// Create a category
    pub async fn add_category(&mut self, data: NewCategory) -> InventoryResult<Category> {
        let session = self
            .session
            .as_mut()
            .ok_or(InventoryError::Unauthenticated)?;
        if data.name.trim().is_empty() {
            return Err(InventoryError::Validation(
                "Category name cannot be empty".to_string(),
            ));
        }

        let category = self.store.save_category(&session.user, &data).await?;
        session.ledger.push_category(category.clone());
        Ok(category)
    }

    // Reports
    /// Products at or below their reorder threshold
    pub fn low_stock_products(&self) -> InventoryResult<Vec<&Product>> {
        Ok(self
            .ledger()?
            .low_stock_products(self.config.default_min_stock))
    }

    /// Dashboard figures for the current month
    pub fn dashboard_metrics(&self) -> InventoryResult<DashboardMetrics> {
        self.dashboard_metrics_at(today())
    }

    pub fn dashboard_metrics_at(&self, today: NaiveDate) -> InventoryResult<DashboardMetrics> {
        Ok(reports::dashboard_metrics(
            self.ledger()?,
            today,
            self.config.default_min_stock,
        ))
    }

    /// Monthly sales for the configured number of months
    pub fn sales_chart(&self) -> InventoryResult<Vec<MonthlySales>> {
        self.sales_data(self.config.sales_chart_months)
    }

    /// Monthly sales for the `months` months ending this month, oldest first
    pub fn sales_data(&self, months: u32) -> InventoryResult<Vec<MonthlySales>> {
        self.sales_data_at(today(), months)
    }

    pub fn sales_data_at(
        &self,
        today: NaiveDate,
        months: u32,
    ) -> InventoryResult<Vec<MonthlySales>> {
        let labels = MonthLabels {
            locale: self.config.month_label_locale,
            format: &self.config.month_label_format,
        };
        Ok(reports::sales_by_month(self.ledger()?, today, months, labels))
    }

    /// Revenue per category name
    pub fn category_sales_data(&self) -> InventoryResult<Vec<CategorySales>> {
        Ok(reports::category_sales(self.ledger()?))
    }

    /// The `limit` best-selling products by units
    pub fn top_products(&self, limit: usize) -> InventoryResult<Vec<TopProduct>> {
        Ok(reports::top_products(self.ledger()?, limit))
    }

    /// Best sellers using the configured ranking length
    pub fn top_products_default(&self) -> InventoryResult<Vec<TopProduct>> {
        self.top_products(self.config.top_products_limit)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
