use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type CustomerId = Uuid;

/// A customer in the shop's fiado roster.
/// `current_debt_cents` is mutated only through the ledger's sale-registration
/// and payment operations; it never goes below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    /// Advisory ceiling. Sales past the limit are flagged, never blocked.
    pub credit_limit_cents: Cents,
    pub current_debt_cents: Cents,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: String, phone: String, credit_limit_cents: Cents) -> Self {
        assert!(
            credit_limit_cents >= 0,
            "Credit limit must be non-negative"
        );
        Self {
            id: Uuid::new_v4(),
            name,
            phone,
            credit_limit_cents,
            current_debt_cents: 0,
            created_at: Utc::now(),
        }
    }

    /// Seed an opening debt, for customers who already owed something
    /// when the roster was set up.
    pub fn with_initial_debt(mut self, debt_cents: Cents) -> Self {
        assert!(debt_cents >= 0, "Initial debt must be non-negative");
        self.current_debt_cents = debt_cents;
        self
    }

    pub fn available_credit(&self) -> Cents {
        (self.credit_limit_cents - self.current_debt_cents).max(0)
    }

    pub fn is_over_limit(&self) -> bool {
        self.current_debt_cents > self.credit_limit_cents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer_starts_debt_free() {
        let customer = Customer::new("Maria".into(), "11 99999-0000".into(), 10000);
        assert_eq!(customer.current_debt_cents, 0);
        assert!(!customer.is_over_limit());
        assert_eq!(customer.available_credit(), 10000);
    }

    #[test]
    fn test_initial_debt_seed() {
        let customer =
            Customer::new("Joao".into(), "11 98888-0000".into(), 10000).with_initial_debt(8000);
        assert_eq!(customer.current_debt_cents, 8000);
        assert_eq!(customer.available_credit(), 2000);
    }

    #[test]
    fn test_available_credit_floors_at_zero() {
        let customer =
            Customer::new("Ana".into(), "11 97777-0000".into(), 10000).with_initial_debt(11000);
        assert_eq!(customer.available_credit(), 0);
        assert!(customer.is_over_limit());
    }

    #[test]
    fn test_debt_equal_to_limit_is_not_over() {
        let customer =
            Customer::new("Ana".into(), "11 97777-0000".into(), 10000).with_initial_debt(10000);
        assert!(!customer.is_over_limit());
    }

    #[test]
    #[should_panic(expected = "Credit limit must be non-negative")]
    fn test_negative_limit_panics() {
        Customer::new("X".into(), "".into(), -1);
    }
}
