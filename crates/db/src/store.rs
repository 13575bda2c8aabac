//! Connection to the document store.

use std::time::Duration;

use hornero_shared::AppResult;
use hornero_shared::config::DatabaseConfig;
use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::info;

use crate::documents::{
    DebtDocument, EmployeeDocument, ExpenseDocument, IncomeDocument, InvoiceDocument, RateDocument,
};
use crate::error::MongoResultExt;

/// Collection names.
pub mod collections {
    /// Daily exchange rates.
    pub const RATES: &str = "exchangerates";
    /// Employees.
    pub const EMPLOYEES: &str = "employees";
    /// Employee debts.
    pub const DEBTS: &str = "employeedebts";
    /// Expenses.
    pub const EXPENSES: &str = "expenses";
    /// Daily incomes.
    pub const INCOMES: &str = "incomes";
    /// Supplier invoices.
    pub const INVOICES: &str = "invoices";
}

/// Handle to the Hornero database.
#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connects using `config`.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(database = %config.name, "Connecting to MongoDB");
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .or_db("parse connection string")?;
        options.max_pool_size = Some(config.max_pool_size);
        options.connect_timeout = Some(Duration::from_secs(10));
        options.app_name = Some("hornero".to_string());

        let client = Client::with_options(options).or_db("create client")?;
        let db = client.database(&config.name);
        info!(database = %config.name, "Connected to MongoDB");
        Ok(Self { client, db })
    }

    /// Creates the indexes the repositories rely on. Idempotent.
    pub async fn initialize_indexes(&self) -> AppResult<()> {
        Self::create_index(&self.debts(), doc! { "employee_id": 1, "created_at": -1 }, "employee_debts", false)
            .await?;
        Self::create_index(&self.debts(), doc! { "status": 1, "created_at": -1 }, "debt_status", false)
            .await?;
        Self::create_index(&self.employees(), doc! { "name": 1 }, "employee_name", false).await?;
        Self::create_index(&self.expenses(), doc! { "date": -1, "paid": 1 }, "expense_date", false)
            .await?;
        Self::create_index(&self.incomes(), doc! { "date": 1 }, "income_day", true).await?;
        Self::create_index(&self.invoices(), doc! { "numero_factura": 1 }, "invoice_numero", true)
            .await?;
        Self::create_index(&self.invoices(), doc! { "paid": 1, "due_date": 1 }, "invoice_due", false)
            .await?;
        info!("MongoDB indexes ready");
        Ok(())
    }

    /// Pings the server.
    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .or_db("ping")?;
        Ok(())
    }

    async fn create_index<T>(
        collection: &Collection<T>,
        keys: Document,
        name: &str,
        unique: bool,
    ) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(keys)
            .options(
                IndexOptions::builder()
                    .name(name.to_string())
                    .unique(unique)
                    .build(),
            )
            .build();
        collection
            .create_index(model, None)
            .await
            .or_db("create index")?;
        info!(collection = collection.name(), index = name, "Created index");
        Ok(())
    }

    /// Exchange rates, keyed by day.
    pub fn rates(&self) -> Collection<RateDocument> {
        self.db.collection(collections::RATES)
    }

    /// Employees.
    pub fn employees(&self) -> Collection<EmployeeDocument> {
        self.db.collection(collections::EMPLOYEES)
    }

    /// Employee debts.
    pub fn debts(&self) -> Collection<DebtDocument> {
        self.db.collection(collections::DEBTS)
    }

    /// Expenses.
    pub fn expenses(&self) -> Collection<ExpenseDocument> {
        self.db.collection(collections::EXPENSES)
    }

    /// Daily incomes.
    pub fn incomes(&self) -> Collection<IncomeDocument> {
        self.db.collection(collections::INCOMES)
    }

    /// Supplier invoices.
    pub fn invoices(&self) -> Collection<InvoiceDocument> {
        self.db.collection(collections::INVOICES)
    }

    /// Underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}
