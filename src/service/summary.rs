use bigdecimal::{BigDecimal, Zero};

use crate::models::{EntitySummaryRow, InvoiceSummary, ReceiptSummary, ReferenceEntity, ReturnOrder};

/// 单个客户/业务员 在区间内的汇总 (数据已按该实体查询好)
pub fn entity_summary<E: ReferenceEntity>(
    entity: &E,
    invoices: &[InvoiceSummary],
    receipts: &[ReceiptSummary],
    returns: &[ReturnOrder],
) -> EntitySummaryRow {
    let mut revenue = BigDecimal::zero();
    for invoice in invoices {
        revenue += invoice.effective_amount();
    }

    let mut received = BigDecimal::zero();
    for receipt in receipts {
        received += receipt.received_amount();
    }

    let mut returned = BigDecimal::zero();
    for ret in returns {
        returned += ret.amount();
    }

    EntitySummaryRow {
        id: entity.id().to_string(),
        name: entity.name().to_string(),
        invoice_count: invoices.len(),
        net_sales: &revenue - &returned,
        outstanding: &revenue - &received,
        revenue,
        received,
        returned,
    }
}
