use bigdecimal::{BigDecimal, Zero};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use futures::future::try_join_all;

use crate::config::ReportsConfig;
use crate::db::source::{DateRange, RecordQuery, RecordSource};
use crate::error::{ReportError, ReportResult};
use crate::models::{
    DashboardReport, EntitySummaryRow, InactiveCustomerRow, InventoryMovementRow,
    InvoiceBalanceRow, PaidSalesSplit, ProductSalesRow, ReferenceEntity, SettlementType,
};
use crate::service::{dashboard, inactivity, inventory, products, reconciliation, summary};

/// 商品销售报表过滤条件
#[derive(Debug, Clone)]
pub struct SalesFilter {
    pub range: DateRange,
    pub customer_id: Option<String>,
    pub salesperson_id: Option<String>,
    pub settlement_type: Option<SettlementType>,
}

/// 报表服务: 并发读取所需数据, 全部成功后再做聚合
pub struct ReportService<S> {
    source: S,
    settings: ReportsConfig,
}

impl<S: RecordSource> ReportService<S> {
    pub fn new(source: S, settings: ReportsConfig) -> Self {
        Self { source, settings }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 首页看板 (本月 1 日至参考日)
    pub async fn dashboard(&self, reference: NaiveDate) -> ReportResult<DashboardReport> {
        let month_start = reference
            .with_day(1)
            .ok_or_else(|| ReportError::InvalidArgument(format!("bad reference date {}", reference)))?;
        let query = RecordQuery::in_range(DateRange::days(month_start, reference));

        let (summaries, customers, salespersons) = tokio::try_join!(
            self.source.invoice_summaries(&query),
            self.source.customers(),
            self.source.salespersons(),
        )?;

        tracing::info!(
            "[Dashboard] {}: {} 张销售单, {} 个客户, {} 个业务员",
            reference,
            summaries.len(),
            customers.len(),
            salespersons.len()
        );

        Ok(DashboardReport {
            reference_date: reference,
            overview: dashboard::revenue_overview(&summaries, reference),
            customer_revenue: dashboard::rank_by_revenue(&summaries, &customers, reference),
            customer_orders: dashboard::rank_by_orders(&summaries, &customers, reference),
            salesperson_revenue: dashboard::rank_by_revenue(&summaries, &salespersons, reference),
            salesperson_orders: dashboard::rank_by_orders(&summaries, &salespersons, reference),
        })
    }

    /// 商品销售表: 全部销售 / 已结清销售
    pub async fn product_sales(&self, filter: &SalesFilter) -> ReportResult<PaidSalesSplit> {
        let mut query = RecordQuery::in_range(filter.range);
        query.customer_id = filter.customer_id.clone();
        query.salesperson_id = filter.salesperson_id.clone();

        let (summaries, items, product_list) = tokio::try_join!(
            self.source.invoice_summaries(&query),
            self.source.invoice_items(&query),
            self.source.products(),
        )?;

        let split = match filter.settlement_type {
            Some(settlement) => {
                let (summaries, items) =
                    reconciliation::filter_by_settlement(&summaries, &items, settlement);
                reconciliation::split_paid_sales(&summaries, &items, &product_list)
            }
            None => reconciliation::split_paid_sales(&summaries, &items, &product_list),
        };

        tracing::info!(
            "[ProductSales] {} 条明细 -> {} 行, 已结清 {} 张 / 未结清 {} 张",
            items.len(),
            split.all_sales.len(),
            split.paid_invoice_count,
            split.unpaid_invoice_count
        );
        Ok(split)
    }

    /// 退货商品表
    pub async fn product_returns(
        &self,
        range: DateRange,
        customer_id: Option<String>,
    ) -> ReportResult<Vec<ProductSalesRow>> {
        let mut query = RecordQuery::in_range(range);
        query.customer_id = customer_id;

        let (returns, product_list) =
            tokio::try_join!(self.source.returns(&query), self.source.products())?;
        Ok(products::aggregate_return_items(&returns, &product_list))
    }

    /// 近 `days` 天未下单客户; `days` 缺省取配置
    pub async fn inactive_customers(
        &self,
        now: NaiveDateTime,
        days: Option<i64>,
    ) -> ReportResult<Vec<InactiveCustomerRow>> {
        let days = days.unwrap_or(self.settings.inactivity_days);
        if days <= 0 {
            return Err(ReportError::InvalidArgument(format!("days must be positive, got {}", days)));
        }

        let today = now.date();
        let short_query = RecordQuery::in_range(DateRange::trailing_days(today, days));
        let long_query =
            RecordQuery::in_range(DateRange::trailing_days(today, self.settings.lookback_days));

        let (customers, short_window, long_window) = tokio::try_join!(
            self.source.customers(),
            self.source.invoice_summaries(&short_query),
            self.source.invoice_summaries(&long_query),
        )?;

        let rows = inactivity::inactive_customers(&customers, &short_window, &long_window, now);
        tracing::info!(
            "[Inactivity] {} 天内未下单客户 {}/{}",
            days,
            rows.len(),
            customers.len()
        );
        Ok(rows)
    }

    /// 应收余额: 区间内销售单 + 区间开始至参考日的收款
    pub async fn receivables(
        &self,
        range: DateRange,
        reference: NaiveDate,
    ) -> ReportResult<Vec<InvoiceBalanceRow>> {
        let reference_end = (reference + Duration::days(1)).and_time(chrono::NaiveTime::MIN);
        let receipt_range = DateRange::new(range.start, reference_end.max(range.end));

        let invoice_query = RecordQuery::in_range(range);
        let receipt_query = RecordQuery::in_range(receipt_range);

        let (summaries, receipts, customers) = tokio::try_join!(
            self.source.invoice_summaries(&invoice_query),
            self.source.receipts(&receipt_query),
            self.source.customers(),
        )?;

        reconciliation::invoice_balances(&summaries, &receipts, &customers, reference)
    }

    pub async fn customer_summaries(&self, range: DateRange) -> ReportResult<Vec<EntitySummaryRow>> {
        let customers = self.source.customers().await?;
        self.summarize_entities(&customers, range, |query, id| query.customer(id))
            .await
    }

    pub async fn salesperson_summaries(&self, range: DateRange) -> ReportResult<Vec<EntitySummaryRow>> {
        let salespersons = self.source.salespersons().await?;
        self.summarize_entities(&salespersons, range, |query, id| query.salesperson(id))
            .await
    }

    /// 每个实体一组并发查询 (销售单/收款/退货), 任一失败则整体失败
    async fn summarize_entities<E, Q>(
        &self,
        entities: &[E],
        range: DateRange,
        scope: Q,
    ) -> ReportResult<Vec<EntitySummaryRow>>
    where
        E: ReferenceEntity + Sync,
        Q: Fn(RecordQuery, &str) -> RecordQuery,
    {
        let scoped: Vec<(&E, RecordQuery)> = entities
            .iter()
            .map(|entity| (entity, scope(RecordQuery::in_range(range), entity.id())))
            .collect();

        let mut rows = try_join_all(
            scoped
                .iter()
                .map(|(entity, query)| self.summarize_one(*entity, query)),
        )
        .await?;
        rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));

        let mut total = BigDecimal::zero();
        for row in &rows {
            total += &row.revenue;
        }
        tracing::info!("[Summary] {} 个实体, 合计营业额 {}", rows.len(), total);
        Ok(rows)
    }

    async fn summarize_one<E: ReferenceEntity>(
        &self,
        entity: &E,
        query: &RecordQuery,
    ) -> ReportResult<EntitySummaryRow> {
        let (invoices, receipts, returns) = tokio::try_join!(
            self.source.invoice_summaries(query),
            self.source.receipts(query),
            self.source.returns(query),
        )?;
        Ok(summary::entity_summary(entity, &invoices, &receipts, &returns))
    }

    pub async fn inventory_movements(&self, range: DateRange) -> ReportResult<Vec<InventoryMovementRow>> {
        let query = RecordQuery::in_range(range);
        let (records, product_list) = tokio::try_join!(
            self.source.inventory_changes(&query),
            self.source.products(),
        )?;
        Ok(inventory::inventory_movements(&records, &product_list))
    }
}
