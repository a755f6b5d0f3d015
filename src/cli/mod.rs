use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::{AppError, LedgerService};
use crate::domain::{format_cents, parse_cents, PaymentMethod, SaleItem, DEFAULT_DUE_TERM_DAYS};
use crate::io::{render_receipt, Exporter, DEFAULT_MARKET_NAME};

/// Fiado - Store Credit Ledger
#[derive(Parser)]
#[command(name = "fiado")]
#[command(about = "A store-credit (fiado) ledger for small shops")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "fiado.db")]
    pub database: String,

    /// Shop name printed on receipts
    #[arg(long, global = true, default_value = DEFAULT_MARKET_NAME)]
    pub market: String,

    /// Payment term in days for new sales
    #[arg(long, global = true, default_value_t = DEFAULT_DUE_TERM_DAYS)]
    pub due_days: i64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Customer roster commands
    #[command(subcommand)]
    Customer(CustomerCommands),

    /// Register a fiado sale and print its receipt
    Sale {
        /// Customer name
        customer: String,

        /// Line item as 'PRODUCT=VALUE' (e.g. 'Arroz 5kg=30.00'); repeatable
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Payment method: cash, transfer, card, check
        #[arg(short, long, default_value = "cash")]
        method: String,

        /// Skip printing the receipt
        #[arg(long)]
        no_receipt: bool,
    },

    /// Receive a debt payment from a customer
    Pay {
        /// Customer name
        customer: String,

        /// Amount received (e.g. '50.00' or '50')
        amount: String,
    },

    /// List registered sales
    Sales {
        /// Filter by customer name
        #[arg(long)]
        customer: Option<String>,
    },

    /// Reprint the receipt for a sale
    Receipt {
        /// Sale ID
        id: String,
    },

    /// Export data: sales, customers, snapshot
    Export {
        /// What to export: sales, customers, snapshot
        export_type: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CustomerCommands {
    /// Add a customer to the roster
    Add {
        /// Customer name
        name: String,

        /// Phone number
        #[arg(short, long, default_value = "")]
        phone: String,

        /// Credit limit (e.g. '100.00')
        #[arg(short, long)]
        limit: String,

        /// Opening debt, for customers who already owe something
        #[arg(long)]
        debt: Option<String>,
    },

    /// List all customers with their balances
    List,

    /// Show a customer's exposure and purchase history
    Show {
        /// Customer name
        name: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Customer(customer_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_customer_command(&service, customer_cmd).await?;
            }

            Commands::Sale {
                customer,
                items,
                method,
                no_receipt,
            } => {
                let service = LedgerService::connect(&self.database)
                    .await?
                    .with_due_term(self.due_days);

                let payment_method = PaymentMethod::from_str(&method)
                    .ok_or_else(|| AppError::UnknownPaymentMethod(method.clone()))?;

                let items = items
                    .iter()
                    .map(|spec| parse_item(spec))
                    .collect::<Result<Vec<_>>>()?;

                let customer = service.get_customer(&customer).await?;
                let result = service
                    .register_sale(customer.id, items, payment_method)
                    .await?;

                println!(
                    "Registered sale: {} for {} ({})",
                    format_cents(result.sale.total_cents),
                    result.customer.name,
                    result.sale.id
                );
                println!(
                    "Debt: {} / limit {}",
                    format_cents(result.customer.current_debt_cents),
                    format_cents(result.customer.credit_limit_cents)
                );
                if result.is_over_limit {
                    eprintln!(
                        "WARNING: {} is over the credit limit by {}",
                        result.customer.name,
                        format_cents(
                            result.customer.current_debt_cents
                                - result.customer.credit_limit_cents
                        )
                    );
                }

                if !no_receipt {
                    println!();
                    println!(
                        "{}",
                        render_receipt(&result.sale, &result.customer, &self.market)
                    );
                }
            }

            Commands::Pay { customer, amount } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;

                let before = service.get_customer(&customer).await?;
                let updated = service.apply_payment(before.id, amount_cents).await?;

                println!(
                    "Received {} from {}",
                    format_cents(amount_cents),
                    updated.name
                );
                if updated.current_debt_cents == 0 {
                    println!("Debt fully settled.");
                } else {
                    println!(
                        "Remaining debt: {}",
                        format_cents(updated.current_debt_cents)
                    );
                }
            }

            Commands::Sales { customer } => {
                let service = LedgerService::connect(&self.database).await?;
                run_sales_command(&service, customer.as_deref()).await?;
            }

            Commands::Receipt { id } => {
                let service = LedgerService::connect(&self.database).await?;
                let sale_id =
                    Uuid::parse_str(&id).context("Invalid sale ID format (expected UUID)")?;

                let (sale, customer) = service.get_sale(sale_id).await?;
                println!("{}", render_receipt(&sale, &customer, &self.market));
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

/// Parse a 'PRODUCT=VALUE' line-item spec.
fn parse_item(spec: &str) -> Result<SaleItem> {
    let (product, value) = spec
        .rsplit_once('=')
        .with_context(|| format!("Invalid item '{}'. Use 'PRODUCT=VALUE'", spec))?;
    let value_cents = parse_cents(value)
        .with_context(|| format!("Invalid value in item '{}'. Use '30.00' or '30'", spec))?;
    Ok(SaleItem::new(product.trim(), value_cents))
}

async fn run_customer_command(service: &LedgerService, cmd: CustomerCommands) -> Result<()> {
    match cmd {
        CustomerCommands::Add {
            name,
            phone,
            limit,
            debt,
        } => {
            let limit_cents =
                parse_cents(&limit).context("Invalid limit format. Use '100.00' or '100'")?;
            let debt_cents = debt
                .map(|d| parse_cents(&d))
                .transpose()
                .context("Invalid debt format. Use '50.00' or '50'")?;

            let customer = service
                .create_customer(name, phone, limit_cents, debt_cents)
                .await?;
            println!(
                "Added customer: {} (limit {})",
                customer.name,
                format_cents(customer.credit_limit_cents)
            );
        }

        CustomerCommands::List => {
            let customers = service.list_customers().await?;
            if customers.is_empty() {
                println!("No customers found.");
            } else {
                println!(
                    "{:<20} {:<16} {:>10} {:>10}",
                    "NAME", "PHONE", "DEBT", "LIMIT"
                );
                println!("{}", "-".repeat(60));
                for customer in customers {
                    let marker = if customer.is_over_limit() { " !" } else { "" };
                    println!(
                        "{:<20} {:<16} {:>10} {:>10}{}",
                        customer.name,
                        customer.phone,
                        format_cents(customer.current_debt_cents),
                        format_cents(customer.credit_limit_cents),
                        marker
                    );
                }
            }
        }

        CustomerCommands::Show { name } => {
            let info = service.get_customer_info(&name).await?;
            let customer = &info.customer;

            println!("Customer: {}", customer.name);
            println!("  ID:         {}", customer.id);
            if !customer.phone.is_empty() {
                println!("  Phone:      {}", customer.phone);
            }
            println!(
                "  Since:      {}",
                customer.created_at.format("%Y-%m-%d")
            );
            println!();
            println!(
                "  Debt:       {}",
                format_cents(info.exposure.debt_cents)
            );
            println!(
                "  Limit:      {}",
                format_cents(info.exposure.limit_cents)
            );
            println!(
                "  Available:  {}",
                format_cents(info.exposure.available_cents)
            );
            println!("  Usage:      {:.0}%", info.exposure.usage_percent);
            if info.exposure.over_limit {
                println!("  Status:     OVER LIMIT");
            }
            println!();
            println!("  Purchases:  {}", info.sale_count);
            if let Some(last) = info.last_sale {
                println!("  Last:       {}", last.format("%Y-%m-%d %H:%M"));
            }

            // History is stored oldest-first; show newest first.
            let sales = service.sales_for_customer(customer.id).await?;
            if !sales.is_empty() {
                println!();
                println!("  Recent purchases:");
                for sale in sales.iter().rev().take(10) {
                    let products = sale
                        .items
                        .iter()
                        .map(|item| item.product.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!(
                        "    {}  {:>10}  {}{}",
                        sale.date.format("%Y-%m-%d"),
                        format_cents(sale.total_cents),
                        products,
                        if sale.signed { "  [signed]" } else { "" }
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_sales_command(service: &LedgerService, customer_name: Option<&str>) -> Result<()> {
    let sales = match customer_name {
        Some(name) => {
            let customer = service.get_customer(name).await?;
            service.sales_for_customer(customer.id).await?
        }
        None => service.list_sales().await?,
    };

    if sales.is_empty() {
        println!("No sales found.");
        return Ok(());
    }

    println!(
        "{:<5} {:<17} {:>10} {:<10} SALE ID",
        "#", "DATE", "TOTAL", "METHOD"
    );
    println!("{}", "-".repeat(82));
    for sale in sales {
        println!(
            "{:<5} {:<17} {:>10} {:<10} {}",
            sale.sequence,
            sale.date.format("%Y-%m-%d %H:%M"),
            format_cents(sale.total_cents),
            sale.payment_method,
            sale.id
        );
    }
    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "sales" => {
            let count = exporter.export_sales_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} sales", count);
            }
        }
        "customers" => {
            let count = exporter.export_customers_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} customers", count);
            }
        }
        "snapshot" => {
            let snapshot = exporter.export_snapshot_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported {} customers and {} sales",
                    snapshot.customers.len(),
                    snapshot.sales.len()
                );
            }
        }
        other => {
            anyhow::bail!(
                "Unknown export type '{}'. Valid types: sales, customers, snapshot",
                other
            );
        }
    }
    Ok(())
}
