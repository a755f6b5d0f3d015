use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Customer, Sale};

/// Database snapshot for full JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub customers: Vec<Customer>,
    pub sales: Vec<Sale>,
}

/// Exporter for converting ledger data to flat formats.
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export the sale history to CSV. One row per sale; items are joined
    /// with ';' into a single column.
    pub async fn export_sales_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let sales = self.service.list_sales().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "sequence",
            "date",
            "due_date",
            "customer",
            "items",
            "total_cents",
            "payment_method",
            "signed",
        ])?;

        let mut count = 0;
        for sale in &sales {
            let customer = self.service.get_customer_by_id(sale.customer_id).await?;
            let items = sale
                .items
                .iter()
                .map(|item| format!("{}={}", item.product, item.value_cents))
                .collect::<Vec<_>>()
                .join(";");

            csv_writer.write_record([
                sale.id.to_string(),
                sale.sequence.to_string(),
                sale.date.to_rfc3339(),
                sale.due_date.to_rfc3339(),
                customer.name,
                items,
                sale.total_cents.to_string(),
                sale.payment_method.as_str().to_string(),
                sale.signed.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the customer roster with debt balances to CSV.
    pub async fn export_customers_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let customers = self.service.list_customers().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "name",
            "phone",
            "credit_limit_cents",
            "current_debt_cents",
            "created_at",
        ])?;

        let mut count = 0;
        for customer in &customers {
            csv_writer.write_record([
                customer.name.clone(),
                customer.phone.clone(),
                customer.credit_limit_cents.to_string(),
                customer.current_debt_cents.to_string(),
                customer.created_at.to_rfc3339(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export everything as a JSON snapshot.
    pub async fn export_snapshot_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            customers: self.service.list_customers().await?,
            sales: self.service.list_sales().await?,
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(snapshot)
    }
}
