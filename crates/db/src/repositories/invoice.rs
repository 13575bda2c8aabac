//! Supplier invoices.

use async_trait::async_trait;
use futures::TryStreamExt;
use hornero_core::records::{Invoice, InvoiceRepository};
use hornero_shared::types::InvoiceId;
use hornero_shared::{AppError, AppResult};
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::options::FindOptions;

use super::filters::id_filter;
use crate::documents::InvoiceDocument;
use crate::error::{MongoResultExt, is_duplicate_key};
use crate::store::MongoStore;

/// [`InvoiceRepository`] over the `invoices` collection.
#[derive(Clone, Debug)]
pub struct MongoInvoiceRepository {
    invoices: Collection<InvoiceDocument>,
}

impl MongoInvoiceRepository {
    /// Creates a repository on `store`.
    #[must_use]
    pub fn new(store: &MongoStore) -> Self {
        Self {
            invoices: store.invoices(),
        }
    }
}

#[async_trait]
impl InvoiceRepository for MongoInvoiceRepository {
    async fn insert(&self, invoice: &Invoice) -> AppResult<()> {
        match self.invoices.insert_one(InvoiceDocument::from(invoice), None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Validation(format!(
                "invoice number {} is already registered",
                invoice.numero_factura
            ))),
            Err(e) => Err(e).or_db("insert invoice"),
        }
    }

    async fn find_by_id(&self, id: InvoiceId) -> AppResult<Option<Invoice>> {
        self.invoices
            .find_one(id_filter(id), None)
            .await
            .or_db("find invoice")?
            .map(Invoice::try_from)
            .transpose()
    }

    async fn find_by_numero(&self, numero_factura: &str) -> AppResult<Option<Invoice>> {
        self.invoices
            .find_one(doc! { "numero_factura": numero_factura.trim() }, None)
            .await
            .or_db("find invoice by number")?
            .map(Invoice::try_from)
            .transpose()
    }

    async fn replace(&self, invoice: &Invoice) -> AppResult<()> {
        let result = self
            .invoices
            .replace_one(id_filter(invoice.id), InvoiceDocument::from(invoice), None)
            .await
            .or_db("replace invoice")?;
        if result.matched_count == 0 {
            return Err(AppError::not_found("invoice", invoice.id));
        }
        Ok(())
    }

    async fn delete(&self, id: InvoiceId) -> AppResult<bool> {
        let result = self
            .invoices
            .delete_one(id_filter(id), None)
            .await
            .or_db("delete invoice")?;
        Ok(result.deleted_count > 0)
    }

    async fn list_unpaid(&self) -> AppResult<Vec<Invoice>> {
        let options = FindOptions::builder().sort(doc! { "due_date": 1 }).build();
        let docs: Vec<InvoiceDocument> = self
            .invoices
            .find(doc! { "paid": false }, options)
            .await
            .or_db("list unpaid invoices")?
            .try_collect()
            .await
            .or_db("read invoices")?;
        docs.into_iter().map(Invoice::try_from).collect()
    }
}
