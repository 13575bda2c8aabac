//! Daily incomes, one per business day.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use hornero_core::records::{Income, IncomeRepository};
use hornero_shared::types::IncomeId;
use hornero_shared::{AppError, AppResult};
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::options::FindOptions;

use super::filters::{date_range, id_filter};
use crate::documents::IncomeDocument;
use crate::error::{MongoResultExt, is_duplicate_key};
use crate::store::MongoStore;

/// [`IncomeRepository`] over the `incomes` collection.
#[derive(Clone, Debug)]
pub struct MongoIncomeRepository {
    incomes: Collection<IncomeDocument>,
}

impl MongoIncomeRepository {
    /// Creates a repository on `store`.
    #[must_use]
    pub fn new(store: &MongoStore) -> Self {
        Self {
            incomes: store.incomes(),
        }
    }
}

#[async_trait]
impl IncomeRepository for MongoIncomeRepository {
    async fn insert(&self, income: &Income) -> AppResult<()> {
        match self.incomes.insert_one(IncomeDocument::from(income), None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Validation(format!(
                "an income for {} already exists",
                income.date
            ))),
            Err(e) => Err(e).or_db("insert income"),
        }
    }

    async fn find_by_id(&self, id: IncomeId) -> AppResult<Option<Income>> {
        self.incomes
            .find_one(id_filter(id), None)
            .await
            .or_db("find income")?
            .map(Income::try_from)
            .transpose()
    }

    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Option<Income>> {
        self.incomes
            .find_one(doc! { "date": date.to_string() }, None)
            .await
            .or_db("find income by date")?
            .map(Income::try_from)
            .transpose()
    }

    async fn replace(&self, income: &Income) -> AppResult<()> {
        let result = self
            .incomes
            .replace_one(id_filter(income.id), IncomeDocument::from(income), None)
            .await
            .or_db("replace income")?;
        if result.matched_count == 0 {
            return Err(AppError::not_found("income", income.id));
        }
        Ok(())
    }

    async fn list_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Income>> {
        let options = FindOptions::builder().sort(doc! { "date": -1 }).build();
        let docs: Vec<IncomeDocument> = self
            .incomes
            .find(date_range("date", from, to), options)
            .await
            .or_db("list incomes")?
            .try_collect()
            .await
            .or_db("read incomes")?;
        docs.into_iter().map(Income::try_from).collect()
    }
}
