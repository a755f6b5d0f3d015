use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Customer, CustomerId, PaymentMethod, Sale, SaleId, SaleItem};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying the customer roster and sale history.
/// The sale history is append-only: there is no update or delete for sales.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Customer operations
    // ========================

    /// Save a new customer to the roster.
    pub async fn save_customer(&self, customer: &Customer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, credit_limit_cents, current_debt_cents, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(customer.id.to_string())
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(customer.credit_limit_cents)
        .bind(customer.current_debt_cents)
        .bind(customer.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save customer")?;
        Ok(())
    }

    /// Get a customer by ID.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, credit_limit_cents, current_debt_cents, created_at
            FROM customers
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch customer")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_customer(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a customer by name.
    pub async fn get_customer_by_name(&self, name: &str) -> Result<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, credit_limit_cents, current_debt_cents, created_at
            FROM customers
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch customer by name")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_customer(&row)?)),
            None => Ok(None),
        }
    }

    /// List all customers, ordered by name.
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, phone, credit_limit_cents, current_debt_cents, created_at
            FROM customers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list customers")?;

        rows.iter().map(Self::row_to_customer).collect()
    }

    /// Overwrite a customer's debt balance. Only the payment path uses this;
    /// sale registration adjusts debt inside its own transaction.
    pub async fn update_customer_debt(
        &self,
        id: CustomerId,
        new_debt_cents: i64,
    ) -> Result<()> {
        sqlx::query("UPDATE customers SET current_debt_cents = ? WHERE id = ?")
            .bind(new_debt_cents)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to update customer debt")?;
        Ok(())
    }

    fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<Customer> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(Customer {
            id: Uuid::parse_str(&id_str).context("Invalid customer ID")?,
            name: row.get("name"),
            phone: row.get("phone"),
            credit_limit_cents: row.get("credit_limit_cents"),
            current_debt_cents: row.get("current_debt_cents"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Sale operations
    // ========================

    /// Append a sale to the history and add its total to the customer's debt,
    /// in a single transaction. Assigns the next sequence number.
    /// Either everything lands or nothing does.
    pub async fn save_sale(&self, sale: &mut Sale) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let row = sqlx::query(
            r#"
            UPDATE sequence_counter
            SET value = value + 1
            WHERE name = 'sale_sequence'
            RETURNING value
            "#,
        )
        .fetch_one(&mut *tx)
        .await
        .context("Failed to get next sequence number")?;
        sale.sequence = row.get("value");

        sqlx::query(
            r#"
            INSERT INTO sales (id, sequence, customer_id, total_cents, payment_method, date, due_date, signed)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(sale.id.to_string())
        .bind(sale.sequence)
        .bind(sale.customer_id.to_string())
        .bind(sale.total_cents)
        .bind(sale.payment_method.as_str())
        .bind(sale.date.to_rfc3339())
        .bind(sale.due_date.to_rfc3339())
        .bind(sale.signed)
        .execute(&mut *tx)
        .await
        .context("Failed to save sale")?;

        for (position, item) in sale.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, position, product, value_cents)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(sale.id.to_string())
            .bind(position as i64)
            .bind(&item.product)
            .bind(item.value_cents)
            .execute(&mut *tx)
            .await
            .context("Failed to save sale item")?;
        }

        sqlx::query(
            "UPDATE customers SET current_debt_cents = current_debt_cents + ? WHERE id = ?",
        )
        .bind(sale.total_cents)
        .bind(sale.customer_id.to_string())
        .execute(&mut *tx)
        .await
        .context("Failed to add sale total to customer debt")?;

        tx.commit().await.context("Failed to commit sale")?;
        Ok(())
    }

    /// Get a sale by ID, with its items.
    pub async fn get_sale(&self, id: SaleId) -> Result<Option<Sale>> {
        let row = sqlx::query(
            r#"
            SELECT id, sequence, customer_id, total_cents, payment_method, date, due_date, signed
            FROM sales
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch sale")?;

        match row {
            Some(row) => {
                let items = self.load_items(id).await?;
                Ok(Some(Self::row_to_sale(&row, items)?))
            }
            None => Ok(None),
        }
    }

    /// List all sales in registration order.
    pub async fn list_sales(&self) -> Result<Vec<Sale>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sequence, customer_id, total_cents, payment_method, date, due_date, signed
            FROM sales
            ORDER BY sequence
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list sales")?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in &rows {
            let id_str: String = row.get("id");
            let sale_id = Uuid::parse_str(&id_str).context("Invalid sale ID")?;
            let items = self.load_items(sale_id).await?;
            sales.push(Self::row_to_sale(row, items)?);
        }
        Ok(sales)
    }

    /// List a customer's sales in registration order.
    pub async fn list_sales_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Sale>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sequence, customer_id, total_cents, payment_method, date, due_date, signed
            FROM sales
            WHERE customer_id = ?
            ORDER BY sequence
            "#,
        )
        .bind(customer_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list sales for customer")?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in &rows {
            let id_str: String = row.get("id");
            let sale_id = Uuid::parse_str(&id_str).context("Invalid sale ID")?;
            let items = self.load_items(sale_id).await?;
            sales.push(Self::row_to_sale(row, items)?);
        }
        Ok(sales)
    }

    /// Count a customer's sales.
    pub async fn count_sales_for_customer(&self, customer_id: CustomerId) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM sales WHERE customer_id = ?")
            .bind(customer_id.to_string())
            .fetch_one(&self.pool)
            .await
            .context("Failed to count sales")?;
        Ok(row.get("count"))
    }

    /// Date of the customer's most recent sale, if any.
    pub async fn last_sale_date(&self, customer_id: CustomerId) -> Result<Option<DateTime<Utc>>> {
        let row = sqlx::query("SELECT MAX(date) as last_date FROM sales WHERE customer_id = ?")
            .bind(customer_id.to_string())
            .fetch_one(&self.pool)
            .await
            .context("Failed to fetch last sale date")?;

        let last_date: Option<String> = row.get("last_date");
        last_date
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .context("Invalid sale date")
                    .map(|dt| dt.with_timezone(&Utc))
            })
            .transpose()
    }

    async fn load_items(&self, sale_id: SaleId) -> Result<Vec<SaleItem>> {
        let rows = sqlx::query(
            r#"
            SELECT product, value_cents
            FROM sale_items
            WHERE sale_id = ?
            ORDER BY position
            "#,
        )
        .bind(sale_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to load sale items")?;

        Ok(rows
            .iter()
            .map(|row| SaleItem {
                product: row.get("product"),
                value_cents: row.get("value_cents"),
            })
            .collect())
    }

    fn row_to_sale(row: &sqlx::sqlite::SqliteRow, items: Vec<SaleItem>) -> Result<Sale> {
        let id_str: String = row.get("id");
        let customer_id_str: String = row.get("customer_id");
        let method_str: String = row.get("payment_method");
        let date_str: String = row.get("date");
        let due_date_str: String = row.get("due_date");

        Ok(Sale {
            id: Uuid::parse_str(&id_str).context("Invalid sale ID")?,
            sequence: row.get("sequence"),
            customer_id: Uuid::parse_str(&customer_id_str).context("Invalid customer ID")?,
            items,
            total_cents: row.get("total_cents"),
            payment_method: PaymentMethod::from_str(&method_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid payment method: {}", method_str))?,
            date: DateTime::parse_from_rfc3339(&date_str)
                .context("Invalid sale date")?
                .with_timezone(&Utc),
            due_date: DateTime::parse_from_rfc3339(&due_date_str)
                .context("Invalid due date")?
                .with_timezone(&Utc),
            signed: row.get::<i32, _>("signed") != 0,
        })
    }
}
