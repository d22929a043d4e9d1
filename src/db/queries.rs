use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::rows::{
    assemble_inventory_changes, assemble_returns, InventoryChangeItemRow, InventoryChangeRow,
    InvoiceItemRow, InvoiceSummaryRow, NamedRow, ProductRow, ReceiptRow, ReturnItemRow,
    ReturnOrderRow,
};
use crate::db::source::{RecordQuery, RecordSource};
use crate::error::ReportResult;
use crate::models::{
    Customer, InventoryChangeRecord, InvoiceItem, InvoiceSummary, PaymentAccount, Product,
    ReceiptSummary, ReturnOrder, Salesperson, Warehouse,
};

/// 基于 Postgres 的记录来源
#[derive(Clone)]
pub struct PgRecordSource {
    pool: PgPool,
}

impl PgRecordSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 追加通用过滤条件; `alias` 为带日期/客户/业务员字段的表别名
fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    query: &RecordQuery,
    alias: &str,
    date_column: &str,
) {
    if let Some(range) = &query.range {
        builder
            .push(format!(" AND {}.{} >= ", alias, date_column))
            .push_bind(range.start)
            .push(format!(" AND {}.{} < ", alias, date_column))
            .push_bind(range.end);
    }
    if let Some(customer_id) = &query.customer_id {
        builder
            .push(format!(" AND {}.customer_id = ", alias))
            .push_bind(customer_id.clone());
    }
    if let Some(salesperson_id) = &query.salesperson_id {
        builder
            .push(format!(" AND {}.salesperson_id = ", alias))
            .push_bind(salesperson_id.clone());
    }
}

impl RecordSource for PgRecordSource {
    /// 查询销售单汇总
    async fn invoice_summaries(&self, query: &RecordQuery) -> ReportResult<Vec<InvoiceSummary>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT i.invoice_id, i.customer_id, i.salesperson_id, i.warehouse_name,
                   i.create_datetime, i.due_date, i.total_amount,
                   i.overriden_total_amount, i.paid_amount, i.settlement_type
            FROM invoice i
            WHERE 1 = 1"#,
        );
        push_filters(&mut builder, query, "i", "create_datetime");
        builder.push(" ORDER BY i.create_datetime, i.invoice_id");

        let rows = builder
            .build_query_as::<InvoiceSummaryRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(InvoiceSummary::from).collect())
    }

    /// 查询销售明细, 通过明细ID前缀关联销售单做过滤
    async fn invoice_items(&self, query: &RecordQuery) -> ReportResult<Vec<InvoiceItem>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT ii.invoice_item_id, ii.product_id, ii.quantity, ii.price, ii.amount
            FROM invoice_item ii
            INNER JOIN invoice i ON i.invoice_id = split_part(ii.invoice_item_id, '_', 1)
            WHERE 1 = 1"#,
        );
        push_filters(&mut builder, query, "i", "create_datetime");
        builder.push(" ORDER BY i.create_datetime, ii.invoice_item_id");

        let items = builder
            .build_query_as::<InvoiceItemRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items.into_iter().map(InvoiceItem::from).collect())
    }

    /// 查询退货单及其明细
    async fn returns(&self, query: &RecordQuery) -> ReportResult<Vec<ReturnOrder>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT r.return_id, r.customer_id, r.salesperson_id, r.invoice_id,
                   r.create_datetime, r.overriden_total_amount
            FROM return_order r
            WHERE 1 = 1"#,
        );
        push_filters(&mut builder, query, "r", "create_datetime");
        builder.push(" ORDER BY r.create_datetime, r.return_id");

        let headers = builder
            .build_query_as::<ReturnOrderRow>()
            .fetch_all(&self.pool)
            .await?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = headers.iter().map(|h| h.return_id.clone()).collect();
        let items = sqlx::query_as::<_, ReturnItemRow>(
            r#"
            SELECT return_id, product_id, quantity, price, warehouse_name
            FROM return_item
            WHERE return_id = ANY($1)
            ORDER BY return_id, item_seq
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble_returns(headers, items))
    }

    /// 查询收款单
    async fn receipts(&self, query: &RecordQuery) -> ReportResult<Vec<ReceiptSummary>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT rc.receipt_id, rc.invoice_id, rc.total_amount, rc.deduct_amount,
                   rc.payment_account_id, rc.customer_id, rc.salesperson_id, rc.create_datetime
            FROM receipt rc
            WHERE 1 = 1"#,
        );
        push_filters(&mut builder, query, "rc", "create_datetime");
        builder.push(" ORDER BY rc.create_datetime, rc.receipt_id");

        let rows = builder
            .build_query_as::<ReceiptRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ReceiptSummary::from).collect())
    }

    /// 查询库存变动记录 (仅按时间过滤)
    async fn inventory_changes(&self, query: &RecordQuery) -> ReportResult<Vec<InventoryChangeRecord>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT c.record_id, c.change_type, c.from_warehouse, c.to_warehouse, c.created_datetime
            FROM inventory_change_record c
            WHERE 1 = 1"#,
        );
        if let Some(range) = &query.range {
            builder
                .push(" AND c.created_datetime >= ")
                .push_bind(range.start)
                .push(" AND c.created_datetime < ")
                .push_bind(range.end);
        }
        builder.push(" ORDER BY c.created_datetime, c.record_id");

        let headers = builder
            .build_query_as::<InventoryChangeRow>()
            .fetch_all(&self.pool)
            .await?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = headers.iter().map(|h| h.record_id.clone()).collect();
        let items = sqlx::query_as::<_, InventoryChangeItemRow>(
            r#"
            SELECT record_id, product_id, current_quantity, previous_quantity, transfered_quantity
            FROM inventory_change_item
            WHERE record_id = ANY($1)
            ORDER BY record_id, item_seq
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble_inventory_changes(headers, items))
    }

    async fn customers(&self) -> ReportResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, NamedRow>(
            "SELECT customer_id AS id, name FROM customer ORDER BY customer_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| Customer { customer_id: r.id, name: r.name })
            .collect())
    }

    async fn salespersons(&self) -> ReportResult<Vec<Salesperson>> {
        let rows = sqlx::query_as::<_, NamedRow>(
            "SELECT salesperson_id AS id, name FROM salesperson ORDER BY salesperson_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| Salesperson { salesperson_id: r.id, name: r.name })
            .collect())
    }

    async fn warehouses(&self) -> ReportResult<Vec<Warehouse>> {
        let rows = sqlx::query_as::<_, NamedRow>(
            "SELECT warehouse_id AS id, name FROM warehouse ORDER BY warehouse_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| Warehouse { warehouse_id: r.id, name: r.name })
            .collect())
    }

    async fn products(&self) -> ReportResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT product_id, product_name, specification, variant, unit, brand,
                   type AS product_type, price, cost
            FROM product
            ORDER BY product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn payment_accounts(&self) -> ReportResult<Vec<PaymentAccount>> {
        let rows = sqlx::query_as::<_, NamedRow>(
            "SELECT payment_account_id AS id, name FROM payment_account ORDER BY payment_account_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| PaymentAccount { payment_account_id: r.id, name: r.name })
            .collect())
    }
}
