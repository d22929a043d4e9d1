#![allow(dead_code)]

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

use beverage_reports::db::{RecordQuery, RecordSource};
use beverage_reports::models::{
    Customer, InventoryChangeRecord, InvoiceItem, InvoiceSummary, PaymentAccount, Product,
    ReceiptSummary, ReturnOrder, Salesperson, SettlementType, Warehouse,
};
use beverage_reports::{ReportError, ReportResult};

pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

pub fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn customer(id: &str, name: &str) -> Customer {
    Customer {
        customer_id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn salesperson(id: &str, name: &str) -> Salesperson {
    Salesperson {
        salesperson_id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn product(id: &str, name: &str) -> Product {
    Product {
        product_id: id.to_string(),
        product_name: name.to_string(),
        specification: None,
        variant: None,
        unit: None,
        brand: None,
        product_type: None,
        price: dec("0"),
        cost: dec("0"),
    }
}

pub fn invoice(id: &str, customer_id: &str, salesperson_id: &str, at: &str, total: &str) -> InvoiceSummary {
    InvoiceSummary {
        invoice_id: id.to_string(),
        customer_id: customer_id.to_string(),
        salesperson_id: salesperson_id.to_string(),
        warehouse_name: "North".to_string(),
        create_datetime: dt(at),
        due_date: None,
        total_amount: dec(total),
        overriden_total_amount: None,
        paid_amount: dec("0"),
        settlement_type: Some(SettlementType::Immediate),
    }
}

pub fn item(item_id: &str, product_id: &str, quantity: i64, price: &str) -> InvoiceItem {
    InvoiceItem {
        invoice_item_id: item_id.to_string(),
        product_id: product_id.to_string(),
        quantity,
        price: dec(price),
        amount: None,
    }
}

pub fn receipt(id: &str, invoice: &InvoiceSummary, at: &str, total: &str, deduct: Option<&str>) -> ReceiptSummary {
    ReceiptSummary {
        receipt_id: id.to_string(),
        invoice_id: invoice.invoice_id.clone(),
        total_amount: dec(total),
        deduct_amount: deduct.map(dec),
        payment_account_id: "cash".to_string(),
        customer_id: invoice.customer_id.clone(),
        salesperson_id: invoice.salesperson_id.clone(),
        create_datetime: dt(at),
    }
}

/// 内存记录来源: 按查询条件过滤, 并统计每个方法的调用次数
#[derive(Default)]
pub struct MemorySource {
    pub invoices: Vec<InvoiceSummary>,
    pub items: Vec<InvoiceItem>,
    pub returns: Vec<ReturnOrder>,
    pub receipts: Vec<ReceiptSummary>,
    pub inventory: Vec<InventoryChangeRecord>,
    pub customers: Vec<Customer>,
    pub salespersons: Vec<Salesperson>,
    pub products: Vec<Product>,
    /// 为 true 时销售单查询返回数据库错误
    pub fail_invoices: bool,
    pub invoice_calls: AtomicUsize,
    pub customer_calls: AtomicUsize,
    pub receipt_calls: AtomicUsize,
}

impl MemorySource {
    pub fn invoice_calls(&self) -> usize {
        self.invoice_calls.load(Ordering::SeqCst)
    }

    pub fn customer_calls(&self) -> usize {
        self.customer_calls.load(Ordering::SeqCst)
    }

    pub fn receipt_calls(&self) -> usize {
        self.receipt_calls.load(Ordering::SeqCst)
    }

    fn matching_invoices(&self, query: &RecordQuery) -> Vec<InvoiceSummary> {
        self.invoices
            .iter()
            .filter(|s| query.range.map_or(true, |r| r.contains(s.create_datetime)))
            .filter(|s| query.customer_id.as_ref().map_or(true, |id| *id == s.customer_id))
            .filter(|s| query.salesperson_id.as_ref().map_or(true, |id| *id == s.salesperson_id))
            .cloned()
            .collect()
    }
}

impl RecordSource for MemorySource {
    async fn invoice_summaries(&self, query: &RecordQuery) -> ReportResult<Vec<InvoiceSummary>> {
        self.invoice_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_invoices {
            return Err(ReportError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.matching_invoices(query))
    }

    async fn invoice_items(&self, query: &RecordQuery) -> ReportResult<Vec<InvoiceItem>> {
        let invoices = self.matching_invoices(query);
        let ids: HashSet<&str> = invoices.iter().map(|s| s.invoice_id.as_str()).collect();
        Ok(self
            .items
            .iter()
            .filter(|item| ids.contains(item.invoice_id()))
            .cloned()
            .collect())
    }

    async fn returns(&self, query: &RecordQuery) -> ReportResult<Vec<ReturnOrder>> {
        Ok(self
            .returns
            .iter()
            .filter(|r| query.range.map_or(true, |range| range.contains(r.create_datetime)))
            .filter(|r| query.customer_id.as_ref().map_or(true, |id| *id == r.customer_id))
            .filter(|r| {
                query
                    .salesperson_id
                    .as_ref()
                    .map_or(true, |id| r.salesperson_id.as_ref() == Some(id))
            })
            .cloned()
            .collect())
    }

    async fn receipts(&self, query: &RecordQuery) -> ReportResult<Vec<ReceiptSummary>> {
        self.receipt_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .receipts
            .iter()
            .filter(|r| query.range.map_or(true, |range| range.contains(r.create_datetime)))
            .filter(|r| query.customer_id.as_ref().map_or(true, |id| *id == r.customer_id))
            .filter(|r| query.salesperson_id.as_ref().map_or(true, |id| *id == r.salesperson_id))
            .cloned()
            .collect())
    }

    async fn inventory_changes(&self, query: &RecordQuery) -> ReportResult<Vec<InventoryChangeRecord>> {
        Ok(self
            .inventory
            .iter()
            .filter(|r| query.range.map_or(true, |range| range.contains(r.created_datetime)))
            .cloned()
            .collect())
    }

    async fn customers(&self) -> ReportResult<Vec<Customer>> {
        self.customer_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.customers.clone())
    }

    async fn salespersons(&self) -> ReportResult<Vec<Salesperson>> {
        Ok(self.salespersons.clone())
    }

    async fn warehouses(&self) -> ReportResult<Vec<Warehouse>> {
        Ok(Vec::new())
    }

    async fn products(&self) -> ReportResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn payment_accounts(&self) -> ReportResult<Vec<PaymentAccount>> {
        Ok(Vec::new())
    }
}

/// 五月份的一组基础数据: 3 个客户, 2 个业务员, 2 种商品
pub fn may_fixture() -> MemorySource {
    let mut paid = invoice("2024-05-01-1", "c1", "s1", "2024-05-01 09:00:00", "100");
    paid.paid_amount = dec("100");
    paid.settlement_type = Some(SettlementType::Monthly);

    let mut discounted = invoice("2024-05-17-1", "c2", "s1", "2024-05-17 10:30:00", "200");
    discounted.overriden_total_amount = Some(dec("150"));
    discounted.due_date = Some(chrono::NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());

    let mut monthly_unpaid = invoice("2024-05-17-2", "c1", "s2", "2024-05-17 15:00:00", "50");
    monthly_unpaid.settlement_type = Some(SettlementType::Monthly);

    let april = invoice("2024-04-30-9", "c1", "s1", "2024-04-30 18:00:00", "999");

    let receipts = vec![receipt("r1", &discounted, "2024-05-17 11:00:00", "40", Some("10"))];

    MemorySource {
        items: vec![
            item("2024-05-01-1_1", "p1", 2, "10"),
            item("2024-05-17-1_1", "p1", 1, "10"),
            item("2024-05-17-1_2", "p2", 4, "2.5"),
            item("2024-05-17-2_1", "p1", 3, "10"),
            item("2024-05-17-2_2", "p2", 1, "5"),
            item("2024-04-30-9_1", "p1", 99, "10"),
        ],
        invoices: vec![paid, discounted, monthly_unpaid, april],
        receipts,
        customers: vec![
            customer("c1", "Alpha Mart"),
            customer("c2", "Bravo Foods"),
            customer("c3", "Charlie Deli"),
        ],
        salespersons: vec![salesperson("s1", "Wang"), salesperson("s2", "Li")],
        products: vec![product("p1", "Cola"), product("p2", "Lemon Tea")],
        ..Default::default()
    }
}
