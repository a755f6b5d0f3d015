use super::{Cents, Customer, SaleItem};

/// Compute the total value of a sale from its line items.
pub fn sale_total(items: &[SaleItem]) -> Cents {
    items.iter().map(|item| item.value_cents).sum()
}

/// Validate the line items of a sale before it is admitted.
/// The presentation layer is expected to pre-filter empty rows, but the
/// ledger re-validates - it never trusts its callers.
pub fn validate_items(items: &[SaleItem]) -> Result<(), ItemValidationError> {
    if items.is_empty() {
        return Err(ItemValidationError::EmptySale);
    }
    for (index, item) in items.iter().enumerate() {
        if item.product.trim().is_empty() {
            return Err(ItemValidationError::BlankProduct { index });
        }
        if item.value_cents <= 0 {
            return Err(ItemValidationError::NonPositiveValue {
                index,
                value: item.value_cents,
            });
        }
    }
    Ok(())
}

/// Apply a payment against a debt balance.
/// Overpayment clamps to zero: the shop never owes the customer.
pub fn settle_payment(debt_cents: Cents, amount_cents: Cents) -> Cents {
    (debt_cents - amount_cents).max(0)
}

/// A customer's credit-limit exposure, computed from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtExposure {
    pub debt_cents: Cents,
    pub limit_cents: Cents,
    /// How much more the customer can take before hitting the limit.
    pub available_cents: Cents,
    pub usage_percent: f64,
    pub over_limit: bool,
}

/// Pure exposure computation; no side effects.
/// With a zero limit, any debt counts as full usage.
pub fn debt_exposure(customer: &Customer) -> DebtExposure {
    let debt = customer.current_debt_cents;
    let limit = customer.credit_limit_cents;

    let usage_percent = if limit == 0 {
        if debt > 0 { 100.0 } else { 0.0 }
    } else {
        debt as f64 / limit as f64 * 100.0
    };

    DebtExposure {
        debt_cents: debt,
        limit_cents: limit,
        available_cents: (limit - debt).max(0),
        usage_percent,
        over_limit: debt > limit,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptySale,
    BlankProduct { index: usize },
    NonPositiveValue { index: usize, value: Cents },
}

impl std::fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemValidationError::EmptySale => write!(f, "sale has no items"),
            ItemValidationError::BlankProduct { index } => {
                write!(f, "item {} has a blank product label", index + 1)
            }
            ItemValidationError::NonPositiveValue { index, value } => {
                write!(
                    f,
                    "item {} has a non-positive value ({} cents)",
                    index + 1,
                    value
                )
            }
        }
    }
}

impl std::error::Error for ItemValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer_with(limit: Cents, debt: Cents) -> Customer {
        Customer::new("Maria".into(), "11 99999-0000".into(), limit).with_initial_debt(debt)
    }

    #[test]
    fn test_sale_total_empty() {
        assert_eq!(sale_total(&[]), 0);
    }

    #[test]
    fn test_sale_total_sums_exactly() {
        let items = vec![
            SaleItem::new("Arroz 5kg", 3000),
            SaleItem::new("Oleo", 799),
            SaleItem::new("Sabao", 201),
        ];
        assert_eq!(sale_total(&items), 4000);
    }

    #[test]
    fn test_validate_rejects_empty_sale() {
        assert_eq!(validate_items(&[]), Err(ItemValidationError::EmptySale));
    }

    #[test]
    fn test_validate_rejects_blank_product() {
        let items = vec![SaleItem::new("Arroz", 1000), SaleItem::new("   ", 500)];
        assert_eq!(
            validate_items(&items),
            Err(ItemValidationError::BlankProduct { index: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_value() {
        let items = vec![SaleItem::new("Arroz", 0)];
        assert_eq!(
            validate_items(&items),
            Err(ItemValidationError::NonPositiveValue { index: 0, value: 0 })
        );

        let items = vec![SaleItem::new("Arroz", -100)];
        assert!(validate_items(&items).is_err());
    }

    #[test]
    fn test_validate_accepts_good_items() {
        let items = vec![SaleItem::new("Arroz", 3000), SaleItem::new("Feijao", 1200)];
        assert!(validate_items(&items).is_ok());
    }

    #[test]
    fn test_settle_payment_reduces_debt() {
        assert_eq!(settle_payment(8000, 3000), 5000);
    }

    #[test]
    fn test_settle_payment_clamps_overpayment() {
        assert_eq!(settle_payment(8000, 15000), 0);
        assert_eq!(settle_payment(0, 100), 0);
    }

    #[test]
    fn test_settle_payment_exact() {
        assert_eq!(settle_payment(5000, 5000), 0);
    }

    #[test]
    fn test_exposure_under_limit() {
        let exposure = debt_exposure(&customer_with(10000, 8000));
        assert_eq!(exposure.debt_cents, 8000);
        assert_eq!(exposure.limit_cents, 10000);
        assert_eq!(exposure.available_cents, 2000);
        assert!((exposure.usage_percent - 80.0).abs() < f64::EPSILON);
        assert!(!exposure.over_limit);
    }

    #[test]
    fn test_exposure_over_limit() {
        let exposure = debt_exposure(&customer_with(10000, 11000));
        assert_eq!(exposure.available_cents, 0);
        assert!(exposure.over_limit);
        assert!(exposure.usage_percent > 100.0);
    }

    #[test]
    fn test_exposure_at_limit_is_not_over() {
        let exposure = debt_exposure(&customer_with(10000, 10000));
        assert!(!exposure.over_limit);
        assert_eq!(exposure.available_cents, 0);
    }

    #[test]
    fn test_exposure_zero_limit_with_debt() {
        let exposure = debt_exposure(&customer_with(0, 500));
        assert!((exposure.usage_percent - 100.0).abs() < f64::EPSILON);
        assert!(exposure.over_limit);
    }

    #[test]
    fn test_exposure_zero_limit_zero_debt() {
        let exposure = debt_exposure(&customer_with(0, 0));
        assert_eq!(exposure.usage_percent, 0.0);
        assert!(!exposure.over_limit);
    }

    #[test]
    fn test_exposure_is_idempotent() {
        let customer = customer_with(10000, 4200);
        assert_eq!(debt_exposure(&customer), debt_exposure(&customer));
    }
}
