use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{sale_total, Cents, CustomerId};

pub type SaleId = Uuid;

/// Default payment term: the customer is expected to settle within 30 days.
pub const DEFAULT_DUE_TERM_DAYS: i64 = 30;

/// How the customer intends to settle the debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    /// Instant bank transfer (Pix and the like)
    Transfer,
    Card,
    Check,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Card => "card",
            PaymentMethod::Check => "check",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "transfer" | "pix" => Some(PaymentMethod::Transfer),
            "card" => Some(PaymentMethod::Card),
            "check" => Some(PaymentMethod::Check),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of a sale: what was taken and for how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub product: String,
    pub value_cents: Cents,
}

impl SaleItem {
    pub fn new(product: impl Into<String>, value_cents: Cents) -> Self {
        Self {
            product: product.into(),
            value_cents,
        }
    }
}

/// A fiado sale. Sales are immutable once registered - debt is settled
/// through payments against the customer's aggregate balance, never by
/// editing or deleting a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    /// Monotonically increasing registration order, assigned by the repository
    pub sequence: i64,
    pub customer_id: CustomerId,
    /// Line items in entry order. Never empty.
    pub items: Vec<SaleItem>,
    /// Always equals the sum of item values; computed at construction.
    pub total_cents: Cents,
    pub payment_method: PaymentMethod,
    pub date: DateTime<Utc>,
    /// Deadline for settling: date + due term.
    pub due_date: DateTime<Utc>,
    /// Whether the printed receipt was countersigned by the customer.
    /// Owned by the paper workflow; nothing in the ledger flips it.
    pub signed: bool,
}

impl Sale {
    /// Build a sale for the given items. Sequence number must be assigned
    /// by the repository. Callers must have validated the items first.
    pub fn new(
        customer_id: CustomerId,
        items: Vec<SaleItem>,
        payment_method: PaymentMethod,
        date: DateTime<Utc>,
        due_term_days: i64,
    ) -> Self {
        assert!(!items.is_empty(), "Sale must have at least one item");
        let total_cents = sale_total(&items);
        Self {
            id: Uuid::new_v4(),
            sequence: 0, // Will be set by repository
            customer_id,
            items,
            total_cents,
            payment_method,
            date,
            due_date: date + Duration::days(due_term_days),
            signed: false,
        }
    }
}
