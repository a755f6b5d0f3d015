// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use fiado::application::LedgerService;
use fiado::domain::{Cents, Customer, SaleItem};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Shorthand for a sale line item
pub fn item(product: &str, value_cents: Cents) -> SaleItem {
    SaleItem::new(product, value_cents)
}

/// Test fixture: standard customer roster
pub struct Roster;

impl Roster {
    /// Maria: limit 100.00, already owing 80.00 (the near-limit regular)
    pub async fn maria(service: &LedgerService) -> Result<Customer> {
        Ok(service
            .create_customer(
                "Maria".into(),
                "11 99999-0001".into(),
                10000,
                Some(8000),
            )
            .await?)
    }

    /// Joao: limit 200.00, debt free
    pub async fn joao(service: &LedgerService) -> Result<Customer> {
        Ok(service
            .create_customer("Joao".into(), "11 99999-0002".into(), 20000, None)
            .await?)
    }
}
