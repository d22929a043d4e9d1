mod common;

use std::sync::Arc;

use chrono::NaiveDate;

use beverage_reports::cache::{CachedSource, EntityKind, QueryCache};
use beverage_reports::config::ReportsConfig;
use beverage_reports::ReportService;

use common::{may_fixture, MemorySource};

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

fn cached_service(enabled: bool) -> (ReportService<CachedSource<MemorySource>>, Arc<QueryCache>) {
    let cache = Arc::new(QueryCache::new());
    let source = CachedSource::new(may_fixture(), cache.clone(), enabled);
    (ReportService::new(source, ReportsConfig::default()), cache)
}

#[tokio::test]
async fn repeated_report_reads_backend_once() {
    let (reports, cache) = cached_service(true);

    let first = reports.dashboard(reference()).await.unwrap();
    let second = reports.dashboard(reference()).await.unwrap();

    assert_eq!(first.overview.month_revenue, second.overview.month_revenue);
    assert_eq!(reports.source().inner().invoice_calls(), 1);
    assert_eq!(reports.source().inner().customer_calls(), 1);
    // 销售单, 客户, 业务员
    assert_eq!(cache.len(), 3);
}

#[tokio::test]
async fn customer_change_refetches_invoices() {
    let (reports, cache) = cached_service(true);
    reports.dashboard(reference()).await.unwrap();

    let invalidated = cache.invalidate(EntityKind::Customer);
    assert!(invalidated.contains(&EntityKind::Invoice));

    reports.dashboard(reference()).await.unwrap();
    assert_eq!(reports.source().inner().invoice_calls(), 2);
    assert_eq!(reports.source().inner().customer_calls(), 2);
}

#[tokio::test]
async fn product_change_keeps_invoice_summaries() {
    let (reports, cache) = cached_service(true);
    reports.dashboard(reference()).await.unwrap();

    cache.invalidate(EntityKind::Product);

    reports.dashboard(reference()).await.unwrap();
    assert_eq!(reports.source().inner().invoice_calls(), 1);
}

#[tokio::test]
async fn disabled_cache_passes_through() {
    let (reports, cache) = cached_service(false);
    reports.dashboard(reference()).await.unwrap();
    reports.dashboard(reference()).await.unwrap();

    assert_eq!(reports.source().inner().invoice_calls(), 2);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn failed_read_is_retried_next_time() {
    let cache = Arc::new(QueryCache::new());
    let mut source = may_fixture();
    source.fail_invoices = true;
    let reports = ReportService::new(
        CachedSource::new(source, cache.clone(), true),
        ReportsConfig::default(),
    );

    assert!(reports.dashboard(reference()).await.is_err());
    assert!(reports.dashboard(reference()).await.is_err());
    assert_eq!(reports.source().inner().invoice_calls(), 2);
}
