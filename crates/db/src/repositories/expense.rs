//! Expenses.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use hornero_core::records::{Expense, ExpenseRepository};
use hornero_shared::types::ExpenseId;
use hornero_shared::{AppError, AppResult};
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::options::FindOptions;

use super::filters::{date_range, id_filter};
use crate::documents::ExpenseDocument;
use crate::error::MongoResultExt;
use crate::store::MongoStore;

/// [`ExpenseRepository`] over the `expenses` collection.
#[derive(Clone, Debug)]
pub struct MongoExpenseRepository {
    expenses: Collection<ExpenseDocument>,
}

impl MongoExpenseRepository {
    /// Creates a repository on `store`.
    #[must_use]
    pub fn new(store: &MongoStore) -> Self {
        Self {
            expenses: store.expenses(),
        }
    }
}

#[async_trait]
impl ExpenseRepository for MongoExpenseRepository {
    async fn insert(&self, expense: &Expense) -> AppResult<()> {
        self.expenses
            .insert_one(ExpenseDocument::from(expense), None)
            .await
            .or_db("insert expense")?;
        Ok(())
    }

    async fn find_by_id(&self, id: ExpenseId) -> AppResult<Option<Expense>> {
        self.expenses
            .find_one(id_filter(id), None)
            .await
            .or_db("find expense")?
            .map(Expense::try_from)
            .transpose()
    }

    async fn replace(&self, expense: &Expense) -> AppResult<()> {
        let result = self
            .expenses
            .replace_one(id_filter(expense.id), ExpenseDocument::from(expense), None)
            .await
            .or_db("replace expense")?;
        if result.matched_count == 0 {
            return Err(AppError::not_found("expense", expense.id));
        }
        Ok(())
    }

    async fn delete(&self, id: ExpenseId) -> AppResult<bool> {
        let result = self
            .expenses
            .delete_one(id_filter(id), None)
            .await
            .or_db("delete expense")?;
        Ok(result.deleted_count > 0)
    }

    async fn list_paid_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Expense>> {
        let mut filter = date_range("date", from, to);
        filter.insert("paid", true);
        let options = FindOptions::builder().sort(doc! { "date": -1 }).build();

        let docs: Vec<ExpenseDocument> = self
            .expenses
            .find(filter, options)
            .await
            .or_db("list expenses")?
            .try_collect()
            .await
            .or_db("read expenses")?;
        docs.into_iter().map(Expense::try_from).collect()
    }
}
