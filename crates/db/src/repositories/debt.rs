//! Employee debts and the employee directory.

use async_trait::async_trait;
use futures::TryStreamExt;
use hornero_core::debt::{Debt, DebtFilter, DebtRepository, Employee, EmployeeDirectory};
use hornero_shared::types::{DebtId, EmployeeId, PageRequest};
use hornero_shared::{AppError, AppResult};
use mongodb::Collection;
use mongodb::bson::{Document, doc};
use mongodb::options::{Collation, CollationStrength, FindOneOptions, FindOptions};
use tracing::debug;

use super::filters::{debt_filter, id_filter};
use crate::documents::{DebtDocument, EmployeeDocument};
use crate::error::MongoResultExt;
use crate::store::MongoStore;

/// [`DebtRepository`] over the `employeedebts` collection.
#[derive(Clone, Debug)]
pub struct MongoDebtRepository {
    debts: Collection<DebtDocument>,
}

impl MongoDebtRepository {
    /// Creates a repository on `store`.
    #[must_use]
    pub fn new(store: &MongoStore) -> Self {
        Self {
            debts: store.debts(),
        }
    }

    async fn find_many(&self, filter: Document, options: FindOptions) -> AppResult<Vec<Debt>> {
        let docs: Vec<DebtDocument> = self
            .debts
            .find(filter, options)
            .await
            .or_db("find debts")?
            .try_collect()
            .await
            .or_db("read debts")?;
        docs.into_iter().map(Debt::try_from).collect()
    }
}

fn newest_first() -> FindOptions {
    FindOptions::builder().sort(doc! { "created_at": -1 }).build()
}

#[async_trait]
impl DebtRepository for MongoDebtRepository {
    async fn insert(&self, debt: &Debt) -> AppResult<()> {
        self.debts
            .insert_one(DebtDocument::from(debt), None)
            .await
            .or_db("insert debt")?;
        debug!(debt_id = %debt.id, "Inserted debt");
        Ok(())
    }

    async fn find_by_id(&self, id: DebtId) -> AppResult<Option<Debt>> {
        self.debts
            .find_one(id_filter(id), None)
            .await
            .or_db("find debt")?
            .map(Debt::try_from)
            .transpose()
    }

    async fn replace(&self, debt: &Debt) -> AppResult<()> {
        let result = self
            .debts
            .replace_one(id_filter(debt.id), DebtDocument::from(debt), None)
            .await
            .or_db("replace debt")?;
        if result.matched_count == 0 {
            return Err(AppError::not_found("debt", debt.id));
        }
        Ok(())
    }

    async fn delete(&self, id: DebtId) -> AppResult<bool> {
        let result = self
            .debts
            .delete_one(id_filter(id), None)
            .await
            .or_db("delete debt")?;
        Ok(result.deleted_count > 0)
    }

    async fn list_by_employee(&self, employee_id: EmployeeId) -> AppResult<Vec<Debt>> {
        self.find_many(doc! { "employee_id": employee_id.to_string() }, newest_first())
            .await
    }

    async fn list(&self, filter: &DebtFilter, page: PageRequest) -> AppResult<(Vec<Debt>, u64)> {
        let query = debt_filter(filter);
        let total = self
            .debts
            .count_documents(query.clone(), None)
            .await
            .or_db("count debts")?;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(page.offset())
            .limit(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .build();
        let debts = self.find_many(query, options).await?;
        Ok((debts, total))
    }

    async fn list_all(&self) -> AppResult<Vec<Debt>> {
        self.find_many(Document::new(), newest_first()).await
    }
}

/// [`EmployeeDirectory`] over the `employees` collection.
#[derive(Clone, Debug)]
pub struct MongoEmployeeDirectory {
    employees: Collection<EmployeeDocument>,
}

impl MongoEmployeeDirectory {
    /// Creates a directory on `store`.
    #[must_use]
    pub fn new(store: &MongoStore) -> Self {
        Self {
            employees: store.employees(),
        }
    }
}

#[async_trait]
impl EmployeeDirectory for MongoEmployeeDirectory {
    async fn find_by_id(&self, id: EmployeeId) -> AppResult<Option<Employee>> {
        self.employees
            .find_one(id_filter(id), None)
            .await
            .or_db("find employee")?
            .map(Employee::try_from)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Employee>> {
        // Secondary strength compares case-insensitively but keeps accents distinct.
        let collation = Collation::builder()
            .locale("es".to_string())
            .strength(CollationStrength::Secondary)
            .build();
        let options = FindOneOptions::builder().collation(collation).build();
        self.employees
            .find_one(doc! { "name": name.trim() }, options)
            .await
            .or_db("find employee by name")?
            .map(Employee::try_from)
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<Employee>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let docs: Vec<EmployeeDocument> = self
            .employees
            .find(Document::new(), options)
            .await
            .or_db("list employees")?
            .try_collect()
            .await
            .or_db("read employees")?;
        docs.into_iter().map(Employee::try_from).collect()
    }
}
