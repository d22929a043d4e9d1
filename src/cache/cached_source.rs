use std::future::Future;
use std::sync::Arc;

use crate::cache::{EntityKind, QueryCache};
use crate::db::source::{RecordQuery, RecordSource};
use crate::error::ReportResult;
use crate::models::{
    Customer, InventoryChangeRecord, InvoiceItem, InvoiceSummary, PaymentAccount, Product,
    ReceiptSummary, ReturnOrder, Salesperson, Warehouse,
};

/// 带缓存的记录来源, 相同查询只访问一次后端, 直到对应类别被失效
pub struct CachedSource<S> {
    inner: S,
    cache: Arc<QueryCache>,
    enabled: bool,
}

impl<S: RecordSource> CachedSource<S> {
    pub fn new(inner: S, cache: Arc<QueryCache>, enabled: bool) -> Self {
        Self {
            inner,
            cache,
            enabled,
        }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn cached<T, F, Fut>(&self, kind: EntityKind, fingerprint: String, fetch: F) -> ReportResult<Vec<T>>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ReportResult<Vec<T>>>,
    {
        if !self.enabled {
            return fetch().await;
        }
        let snapshot = self.cache.get_or_fetch(kind, fingerprint, fetch).await?;
        Ok(snapshot.as_ref().clone())
    }
}

const ALL: &str = "all";

impl<S: RecordSource> RecordSource for CachedSource<S> {
    async fn invoice_summaries(&self, query: &RecordQuery) -> ReportResult<Vec<InvoiceSummary>> {
        self.cached(EntityKind::Invoice, query.fingerprint(), || self.inner.invoice_summaries(query))
            .await
    }

    async fn invoice_items(&self, query: &RecordQuery) -> ReportResult<Vec<InvoiceItem>> {
        self.cached(EntityKind::InvoiceItem, query.fingerprint(), || self.inner.invoice_items(query))
            .await
    }

    async fn returns(&self, query: &RecordQuery) -> ReportResult<Vec<ReturnOrder>> {
        self.cached(EntityKind::Return, query.fingerprint(), || self.inner.returns(query))
            .await
    }

    async fn receipts(&self, query: &RecordQuery) -> ReportResult<Vec<ReceiptSummary>> {
        self.cached(EntityKind::Receipt, query.fingerprint(), || self.inner.receipts(query))
            .await
    }

    async fn inventory_changes(&self, query: &RecordQuery) -> ReportResult<Vec<InventoryChangeRecord>> {
        self.cached(EntityKind::InventoryChange, query.fingerprint(), || {
            self.inner.inventory_changes(query)
        })
        .await
    }

    async fn customers(&self) -> ReportResult<Vec<Customer>> {
        self.cached(EntityKind::Customer, ALL.to_string(), || self.inner.customers())
            .await
    }

    async fn salespersons(&self) -> ReportResult<Vec<Salesperson>> {
        self.cached(EntityKind::Salesperson, ALL.to_string(), || self.inner.salespersons())
            .await
    }

    async fn warehouses(&self) -> ReportResult<Vec<Warehouse>> {
        self.cached(EntityKind::Warehouse, ALL.to_string(), || self.inner.warehouses())
            .await
    }

    async fn products(&self) -> ReportResult<Vec<Product>> {
        self.cached(EntityKind::Product, ALL.to_string(), || self.inner.products())
            .await
    }

    async fn payment_accounts(&self) -> ReportResult<Vec<PaymentAccount>> {
        self.cached(EntityKind::PaymentAccount, ALL.to_string(), || {
            self.inner.payment_accounts()
        })
        .await
    }
}
