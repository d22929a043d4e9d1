use std::future::Future;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ReportResult;
use crate::models::{
    Customer, InventoryChangeRecord, InvoiceItem, InvoiceSummary, PaymentAccount, Product,
    ReceiptSummary, ReturnOrder, Salesperson, Warehouse,
};

/// 查询时间区间 [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// 按自然日: [first 00:00, last+1 00:00)
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: (last + Duration::days(1)).and_time(NaiveTime::MIN),
        }
    }

    /// 截至 `today` (含) 的最近 `days` 个自然日
    pub fn trailing_days(today: NaiveDate, days: i64) -> Self {
        Self::days(today - Duration::days(days - 1), today)
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at < self.end
    }
}

/// 通用查询条件, 未设置的字段不参与过滤
///
/// 结算方式不在此处过滤, 由服务层在汇总层面按销售单ID取交集.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordQuery {
    pub range: Option<DateRange>,
    pub customer_id: Option<String>,
    pub salesperson_id: Option<String>,
}

impl RecordQuery {
    pub fn in_range(range: DateRange) -> Self {
        Self {
            range: Some(range),
            ..Default::default()
        }
    }

    pub fn customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn salesperson(mut self, salesperson_id: impl Into<String>) -> Self {
        self.salesperson_id = Some(salesperson_id.into());
        self
    }

    /// 查询指纹, 用作缓存键
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// 记录来源 (后端数据), 聚合层只依赖此接口
///
/// 实现方负责把空值统一成 `None`, 聚合层拿到的都是完整类型.
pub trait RecordSource: Send + Sync {
    fn invoice_summaries(
        &self,
        query: &RecordQuery,
    ) -> impl Future<Output = ReportResult<Vec<InvoiceSummary>>> + Send;

    fn invoice_items(
        &self,
        query: &RecordQuery,
    ) -> impl Future<Output = ReportResult<Vec<InvoiceItem>>> + Send;

    fn returns(&self, query: &RecordQuery) -> impl Future<Output = ReportResult<Vec<ReturnOrder>>> + Send;

    fn receipts(
        &self,
        query: &RecordQuery,
    ) -> impl Future<Output = ReportResult<Vec<ReceiptSummary>>> + Send;

    fn inventory_changes(
        &self,
        query: &RecordQuery,
    ) -> impl Future<Output = ReportResult<Vec<InventoryChangeRecord>>> + Send;

    fn customers(&self) -> impl Future<Output = ReportResult<Vec<Customer>>> + Send;

    fn salespersons(&self) -> impl Future<Output = ReportResult<Vec<Salesperson>>> + Send;

    fn warehouses(&self) -> impl Future<Output = ReportResult<Vec<Warehouse>>> + Send;

    fn products(&self) -> impl Future<Output = ReportResult<Vec<Product>>> + Send;

    fn payment_accounts(&self) -> impl Future<Output = ReportResult<Vec<PaymentAccount>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_days_covers_whole_calendar_days() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        let range = DateRange::trailing_days(today, 3);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_time(NaiveTime::MIN));
        assert!(range.contains(today.and_hms_opt(23, 59, 59).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 5, 4).unwrap().and_time(NaiveTime::MIN)));
    }

    #[test]
    fn fingerprint_differs_per_filter() {
        let range = DateRange::trailing_days(NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(), 7);
        let a = RecordQuery::in_range(range).customer("c1");
        let b = RecordQuery::in_range(range).customer("c2");
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), RecordQuery::in_range(range).customer("c1").fingerprint());
    }
}
