use chrono::{DateTime, Utc};

use crate::domain::{
    debt_exposure, settle_payment, validate_items, Cents, Customer, CustomerId, DebtExposure,
    PaymentMethod, Sale, SaleId, SaleItem, DEFAULT_DUE_TERM_DAYS,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, API, TUI, etc.) and the
/// only path through which customer debt and the sale history are mutated.
pub struct LedgerService {
    repo: Repository,
    due_term_days: i64,
}

/// Result of registering a sale.
pub struct SaleResult {
    pub sale: Sale,
    /// Customer snapshot after the debt increment.
    pub customer: Customer,
    /// Advisory flag: the sale went through even if this is true.
    pub is_over_limit: bool,
}

/// Detailed customer information for display.
pub struct CustomerInfo {
    pub customer: Customer,
    pub exposure: DebtExposure,
    pub sale_count: i64,
    pub last_sale: Option<DateTime<Utc>>,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            due_term_days: DEFAULT_DUE_TERM_DAYS,
        }
    }

    /// Override the payment term applied to new sales.
    pub fn with_due_term(mut self, days: i64) -> Self {
        self.due_term_days = days;
        self
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Customer operations
    // ========================

    /// Add a customer to the roster.
    pub async fn create_customer(
        &self,
        name: String,
        phone: String,
        credit_limit_cents: Cents,
        initial_debt_cents: Option<Cents>,
    ) -> Result<Customer, AppError> {
        if credit_limit_cents < 0 {
            return Err(AppError::InvalidAmount(
                "Credit limit must be non-negative".to_string(),
            ));
        }
        if self.repo.get_customer_by_name(&name).await?.is_some() {
            return Err(AppError::CustomerAlreadyExists(name));
        }

        let mut customer = Customer::new(name, phone, credit_limit_cents);
        if let Some(debt) = initial_debt_cents {
            if debt < 0 {
                return Err(AppError::InvalidAmount(
                    "Initial debt must be non-negative".to_string(),
                ));
            }
            customer = customer.with_initial_debt(debt);
        }

        self.repo.save_customer(&customer).await?;
        Ok(customer)
    }

    /// Get a customer by name.
    pub async fn get_customer(&self, name: &str) -> Result<Customer, AppError> {
        self.repo
            .get_customer_by_name(name)
            .await?
            .ok_or_else(|| AppError::CustomerNotFound(name.to_string()))
    }

    /// Get a customer by ID.
    pub async fn get_customer_by_id(&self, id: CustomerId) -> Result<Customer, AppError> {
        self.repo
            .get_customer(id)
            .await?
            .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))
    }

    /// Get detailed customer information for display.
    pub async fn get_customer_info(&self, name: &str) -> Result<CustomerInfo, AppError> {
        let customer = self.get_customer(name).await?;
        let sale_count = self.repo.count_sales_for_customer(customer.id).await?;
        let last_sale = self.repo.last_sale_date(customer.id).await?;
        let exposure = debt_exposure(&customer);

        Ok(CustomerInfo {
            customer,
            exposure,
            sale_count,
            last_sale,
        })
    }

    /// List all customers.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.repo.list_customers().await?)
    }

    // ========================
    // Ledger operations
    // ========================

    /// Register a fiado sale against a customer.
    ///
    /// Validates the items (the presentation layer is never trusted), appends
    /// the sale to the history, and adds its total to the customer's debt in
    /// one atomic step. Exceeding the credit limit does not block the sale;
    /// it only raises the `is_over_limit` advisory on the result.
    pub async fn register_sale(
        &self,
        customer_id: CustomerId,
        items: Vec<SaleItem>,
        payment_method: PaymentMethod,
    ) -> Result<SaleResult, AppError> {
        validate_items(&items)?;

        let customer = self.get_customer_by_id(customer_id).await?;

        let mut sale = Sale::new(
            customer.id,
            items,
            payment_method,
            Utc::now(),
            self.due_term_days,
        );
        self.repo.save_sale(&mut sale).await?;

        // Snapshot after the increment; over-limit is evaluated on the new debt.
        let customer = self.get_customer_by_id(customer_id).await?;
        let is_over_limit = customer.is_over_limit();

        Ok(SaleResult {
            sale,
            customer,
            is_over_limit,
        })
    }

    /// Receive a debt payment from a customer.
    ///
    /// The payment reduces only the aggregate balance; sale records are never
    /// touched. Paying more than is owed clamps the debt to zero.
    pub async fn apply_payment(
        &self,
        customer_id: CustomerId,
        amount_cents: Cents,
    ) -> Result<Customer, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Payment amount must be positive".to_string(),
            ));
        }

        let customer = self.get_customer_by_id(customer_id).await?;
        let new_debt = settle_payment(customer.current_debt_cents, amount_cents);
        self.repo.update_customer_debt(customer.id, new_debt).await?;

        self.get_customer_by_id(customer_id).await
    }

    /// Compute a customer's credit-limit exposure. Read-only.
    pub async fn debt_exposure(&self, customer_id: CustomerId) -> Result<DebtExposure, AppError> {
        let customer = self.get_customer_by_id(customer_id).await?;
        Ok(debt_exposure(&customer))
    }

    /// List a customer's sales in registration order (oldest first).
    /// Newest-first presentation is the caller's concern.
    pub async fn sales_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Sale>, AppError> {
        // Distinguish "no sales" from "no such customer"
        self.get_customer_by_id(customer_id).await?;
        Ok(self.repo.list_sales_for_customer(customer_id).await?)
    }

    /// Get a sale together with its customer, for receipt reprints.
    pub async fn get_sale(&self, id: SaleId) -> Result<(Sale, Customer), AppError> {
        let sale = self
            .repo
            .get_sale(id)
            .await?
            .ok_or_else(|| AppError::SaleNotFound(id.to_string()))?;
        let customer = self.get_customer_by_id(sale.customer_id).await?;
        Ok((sale, customer))
    }

    /// List all sales in registration order.
    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        Ok(self.repo.list_sales().await?)
    }
}
