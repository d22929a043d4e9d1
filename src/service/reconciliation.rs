//! 销售单与收款对账: 已结清/未结清拆分、结算方式过滤、应收余额

use std::collections::{HashMap, HashSet};

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;

use crate::error::ReportResult;
use crate::models::{
    Customer, InvoiceBalanceRow, InvoiceItem, InvoiceSummary, PaidSalesSplit, Product,
    ReceiptSummary, SettlementType,
};
use crate::service::labels::{format_document_id, UNKNOWN_CUSTOMER_LABEL};
use crate::service::products::aggregate_invoice_items;

/// 已结清销售单ID集合 (paid_amount >= total_amount)
pub fn fully_paid_invoice_ids(summaries: &[InvoiceSummary]) -> HashSet<&str> {
    summaries
        .iter()
        .filter(|s| s.is_fully_paid())
        .map(|s| s.invoice_id.as_str())
        .collect()
}

/// 基于已取回的销售单与明细, 生成 全部销售 / 已结清销售 两张商品表
pub fn split_paid_sales(
    summaries: &[InvoiceSummary],
    items: &[InvoiceItem],
    products: &[Product],
) -> PaidSalesSplit {
    let paid_ids = fully_paid_invoice_ids(summaries);

    let all_sales = aggregate_invoice_items(items, products);
    let paid_sales = aggregate_invoice_items(
        items.iter().filter(|item| paid_ids.contains(item.invoice_id())),
        products,
    );

    PaidSalesSplit {
        all_sales,
        paid_sales,
        paid_invoice_count: paid_ids.len(),
        unpaid_invoice_count: summaries.len() - paid_ids.len(),
    }
}

/// 按结算方式过滤: 先在汇总层得到命中的销售单ID, 再用明细ID前缀取交集
pub fn filter_by_settlement(
    summaries: &[InvoiceSummary],
    items: &[InvoiceItem],
    settlement: SettlementType,
) -> (Vec<InvoiceSummary>, Vec<InvoiceItem>) {
    let matched: Vec<InvoiceSummary> = summaries
        .iter()
        .filter(|s| s.settlement_type == Some(settlement))
        .cloned()
        .collect();

    let ids: HashSet<&str> = matched.iter().map(|s| s.invoice_id.as_str()).collect();
    let matched_items = items
        .iter()
        .filter(|item| ids.contains(item.invoice_id()))
        .cloned()
        .collect();

    (matched, matched_items)
}

/// 每张销售单的已收金额 (实收 + 抵扣)
pub fn received_by_invoice(receipts: &[ReceiptSummary]) -> HashMap<&str, BigDecimal> {
    let mut received: HashMap<&str, BigDecimal> = HashMap::new();
    for receipt in receipts {
        *received
            .entry(receipt.invoice_id.as_str())
            .or_insert_with(BigDecimal::zero) += receipt.received_amount();
    }
    received
}

/// 未结清销售单列表, 按逾期天数降序
///
/// 已结清 (`is_fully_paid`) 的销售单不列出; 已收金额取 区间内收款合计 与 `paid_amount` 的较大者.
pub fn invoice_balances(
    summaries: &[InvoiceSummary],
    receipts: &[ReceiptSummary],
    customers: &[Customer],
    reference: NaiveDate,
) -> ReportResult<Vec<InvoiceBalanceRow>> {
    let received = received_by_invoice(receipts);
    let customer_names: HashMap<&str, &str> = customers
        .iter()
        .map(|c| (c.customer_id.as_str(), c.name.as_str()))
        .collect();

    let mut rows = Vec::new();
    for summary in summaries {
        if summary.is_fully_paid() {
            continue;
        }
        // 收款可能落在查询区间之外, 以后端记录的已收金额兜底
        let from_receipts = received
            .get(summary.invoice_id.as_str())
            .cloned()
            .unwrap_or_else(BigDecimal::zero);
        let received_amount = from_receipts.max(summary.paid_amount.clone());
        let effective_amount = summary.effective_amount().clone();
        let outstanding_amount = &effective_amount - &received_amount;
        if outstanding_amount <= BigDecimal::zero() {
            continue;
        }

        let overdue_days = summary
            .due_date
            .map(|due| (reference - due).num_days().max(0))
            .unwrap_or(0);

        rows.push(InvoiceBalanceRow {
            display_id: format_document_id(&summary.invoice_id)?,
            invoice_id: summary.invoice_id.clone(),
            customer_id: summary.customer_id.clone(),
            customer_name: customer_names
                .get(summary.customer_id.as_str())
                .copied()
                .unwrap_or(UNKNOWN_CUSTOMER_LABEL)
                .to_string(),
            effective_amount,
            received_amount,
            outstanding_amount,
            due_date: summary.due_date,
            overdue_days,
        });
    }

    rows.sort_by(|a, b| b.overdue_days.cmp(&a.overdue_days));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use chrono::NaiveDateTime;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn summary(id: &str, total: &str, overriden: Option<&str>, paid: &str) -> InvoiceSummary {
        InvoiceSummary {
            invoice_id: id.to_string(),
            customer_id: "c1".to_string(),
            salesperson_id: "s1".to_string(),
            warehouse_name: "Main".to_string(),
            create_datetime: NaiveDateTime::parse_from_str("2024-05-01 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
            due_date: None,
            total_amount: dec(total),
            overriden_total_amount: overriden.map(dec),
            paid_amount: dec(paid),
            settlement_type: None,
        }
    }

    fn item(id: &str, product: &str, quantity: i64) -> InvoiceItem {
        InvoiceItem {
            invoice_item_id: id.to_string(),
            product_id: product.to_string(),
            quantity,
            price: dec("10"),
            amount: None,
        }
    }

    fn receipt(invoice: &str, total: &str, deduct: Option<&str>) -> ReceiptSummary {
        ReceiptSummary {
            receipt_id: format!("R-{}", invoice),
            invoice_id: invoice.to_string(),
            total_amount: dec(total),
            deduct_amount: deduct.map(dec),
            payment_account_id: "cash".to_string(),
            customer_id: "c1".to_string(),
            salesperson_id: "s1".to_string(),
            create_datetime: NaiveDateTime::parse_from_str("2024-05-02 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
        }
    }

    #[test]
    fn paid_in_full_against_raw_total() {
        assert!(summary("A", "100", None, "100").is_fully_paid());
    }

    #[test]
    fn fully_paid_uses_raw_total_not_override() {
        // 改价为 80, 已收 90: 仍按原始总额 100 判定为未结清
        assert!(!summary("A", "100", Some("80"), "90").is_fully_paid());
    }

    #[test]
    fn paid_table_only_contains_fully_paid_invoice_items() {
        let summaries = vec![
            summary("2024-05-01-1", "100", None, "100"),
            summary("2024-05-01-2", "100", None, "40"),
        ];
        let items = vec![
            item("2024-05-01-1_1", "pA", 10),
            item("2024-05-01-2_1", "pB", 10),
        ];

        let split = split_paid_sales(&summaries, &items, &[]);
        assert_eq!(split.all_sales.len(), 2);
        assert_eq!(split.paid_sales.len(), 1);
        assert_eq!(split.paid_sales[0].product_id, "pA");
        assert_eq!(split.paid_invoice_count, 1);
        assert_eq!(split.unpaid_invoice_count, 1);
    }

    #[test]
    fn settlement_filter_intersects_items_by_invoice_prefix() {
        let mut monthly = summary("2024-05-01-1", "100", None, "0");
        monthly.settlement_type = Some(SettlementType::Monthly);
        let mut immediate = summary("2024-05-01-2", "100", None, "0");
        immediate.settlement_type = Some(SettlementType::Immediate);
        let untyped = summary("2024-05-01-3", "100", None, "0");
        let summaries = vec![monthly, immediate, untyped];
        let items = vec![
            item("2024-05-01-1_1", "pA", 1),
            item("2024-05-01-1_2", "pB", 1),
            item("2024-05-01-2_1", "pC", 1),
            item("2024-05-01-3_1", "pD", 1),
        ];

        let (matched, matched_items) = filter_by_settlement(&summaries, &items, SettlementType::Monthly);
        assert_eq!(matched.len(), 1);
        let products: Vec<&str> = matched_items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(products, vec!["pA", "pB"]);
    }

    #[test]
    fn balances_count_deductions_and_skip_settled_invoices() {
        let mut open = summary("2024-05-01-7", "100", Some("90"), "0");
        open.due_date = Some(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        let settled = summary("2024-05-01-8", "50", None, "50");
        let receipts = vec![
            receipt("2024-05-01-7", "30", Some("5")),
            receipt("2024-05-01-8", "50", None),
        ];
        let customers = vec![Customer { customer_id: "c1".to_string(), name: "Alpha Mart".to_string() }];

        let rows = invoice_balances(
            &[open, settled],
            &receipts,
            &customers,
            NaiveDate::from_ymd_opt(2024, 5, 13).unwrap(),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display_id, "20240501007");
        assert_eq!(rows[0].customer_name, "Alpha Mart");
        assert_eq!(rows[0].received_amount, dec("35"));
        assert_eq!(rows[0].outstanding_amount, dec("55"));
        assert_eq!(rows[0].overdue_days, 3);
    }

    #[test]
    fn balances_fall_back_to_recorded_paid_amount() {
        // 已结清但收款不在区间内
        let settled = summary("2024-05-01-1", "100", None, "100");
        // 部分收款, 收款同样不在区间内
        let partial = summary("2024-05-01-2", "100", None, "60");
        let customers = vec![Customer { customer_id: "c1".to_string(), name: "Alpha Mart".to_string() }];

        let rows = invoice_balances(
            &[settled, partial],
            &[],
            &customers,
            NaiveDate::from_ymd_opt(2024, 5, 13).unwrap(),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].invoice_id, "2024-05-01-2");
        assert_eq!(rows[0].received_amount, dec("60"));
        assert_eq!(rows[0].outstanding_amount, dec("40"));
    }

    #[test]
    fn balances_reject_malformed_invoice_id() {
        let result = invoice_balances(
            &[summary("BROKEN", "10", None, "0")],
            &[],
            &[],
            NaiveDate::from_ymd_opt(2024, 5, 13).unwrap(),
        );
        assert!(matches!(result, Err(ReportError::InvalidIdFormat(_))));
    }
}
