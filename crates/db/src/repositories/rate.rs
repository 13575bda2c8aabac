//! Daily exchange rates keyed by day.

use async_trait::async_trait;
use chrono::NaiveDate;
use hornero_core::exchange::{ExchangeRate, RateRepository};
use hornero_shared::{AppError, AppResult};
use mongodb::Collection;
use mongodb::bson::{self, doc};
use mongodb::options::{FindOneAndUpdateOptions, FindOneOptions, ReturnDocument};
use tracing::{debug, info};

use crate::documents::RateDocument;
use crate::error::{MongoResultExt, corrupt, is_duplicate_key};
use crate::store::MongoStore;

/// [`RateRepository`] over the `exchangerates` collection.
#[derive(Clone, Debug)]
pub struct MongoRateRepository {
    rates: Collection<RateDocument>,
}

impl MongoRateRepository {
    /// Creates a repository on `store`.
    #[must_use]
    pub fn new(store: &MongoStore) -> Self {
        Self {
            rates: store.rates(),
        }
    }
}

#[async_trait]
impl RateRepository for MongoRateRepository {
    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Option<ExchangeRate>> {
        let found = self
            .rates
            .find_one(doc! { "_id": date.to_string() }, None)
            .await
            .or_db("find rate")?;
        Ok(found.map(ExchangeRate::from))
    }

    async fn find_latest_on_or_before(&self, date: NaiveDate) -> AppResult<Option<ExchangeRate>> {
        let options = FindOneOptions::builder().sort(doc! { "_id": -1 }).build();
        let found = self
            .rates
            .find_one(doc! { "_id": { "$lte": date.to_string() } }, options)
            .await
            .or_db("find latest rate")?;
        Ok(found.map(ExchangeRate::from))
    }

    async fn insert(&self, rate: &ExchangeRate) -> AppResult<()> {
        match self.rates.insert_one(RateDocument::from(rate), None).await {
            Ok(_) => {
                info!(date = %rate.date, rate = %rate.rate, "Stored exchange rate");
                Ok(())
            }
            Err(e) if is_duplicate_key(&e) => Err(AppError::Validation(format!(
                "a rate for {} already exists",
                rate.date
            ))),
            Err(e) => Err(e).or_db("insert rate"),
        }
    }

    async fn insert_if_absent(&self, rate: &ExchangeRate) -> AppResult<ExchangeRate> {
        let mut fields = bson::to_document(&RateDocument::from(rate))
            .map_err(|e| corrupt("rate", &rate.date.to_string(), e))?;
        fields.remove("_id");

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let stored = self
            .rates
            .find_one_and_update(
                doc! { "_id": rate.date.to_string() },
                doc! { "$setOnInsert": fields },
                options,
            )
            .await
            .or_db("upsert rate")?
            .ok_or_else(|| AppError::Database(format!("upsert of rate {} returned nothing", rate.date)))?;

        debug!(date = %stored.date, rate = %stored.rate, "Rate available");
        Ok(stored.into())
    }
}
