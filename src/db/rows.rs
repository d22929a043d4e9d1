//! 数据库行结构, 以及到领域模型的转换 (空值在这里统一成 None)

use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use sqlx::FromRow;

use crate::models::{
    ChangeType, InventoryChangeItem, InventoryChangeRecord, InvoiceItem, InvoiceSummary, Product,
    ReceiptSummary, ReturnItem, ReturnOrder, SettlementType,
};

/// 基础资料通用行 (id, name)
#[derive(Debug, Clone, FromRow)]
pub struct NamedRow {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct InvoiceSummaryRow {
    pub invoice_id: String,
    pub customer_id: String,
    pub salesperson_id: String,
    pub warehouse_name: String,
    pub create_datetime: NaiveDateTime,
    pub due_date: Option<NaiveDate>,
    pub total_amount: BigDecimal,
    pub overriden_total_amount: Option<BigDecimal>,
    pub paid_amount: Option<BigDecimal>,
    pub settlement_type: Option<i16>,
}

impl From<InvoiceSummaryRow> for InvoiceSummary {
    fn from(row: InvoiceSummaryRow) -> Self {
        let settlement_type = row.settlement_type.and_then(|code| {
            let parsed = SettlementType::from_code(code);
            if parsed.is_none() {
                tracing::warn!("Invoice {} has unknown settlement type {}", row.invoice_id, code);
            }
            parsed
        });

        InvoiceSummary {
            invoice_id: row.invoice_id,
            customer_id: row.customer_id,
            salesperson_id: row.salesperson_id,
            warehouse_name: row.warehouse_name,
            create_datetime: row.create_datetime,
            due_date: row.due_date,
            total_amount: row.total_amount,
            overriden_total_amount: row.overriden_total_amount,
            paid_amount: row.paid_amount.unwrap_or_else(BigDecimal::zero),
            settlement_type,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct InvoiceItemRow {
    pub invoice_item_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub price: BigDecimal,
    pub amount: Option<BigDecimal>,
}

impl From<InvoiceItemRow> for InvoiceItem {
    fn from(row: InvoiceItemRow) -> Self {
        InvoiceItem {
            invoice_item_id: row.invoice_item_id,
            product_id: row.product_id,
            quantity: row.quantity,
            price: row.price,
            amount: row.amount,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ReceiptRow {
    pub receipt_id: String,
    pub invoice_id: String,
    pub total_amount: BigDecimal,
    pub deduct_amount: Option<BigDecimal>,
    pub payment_account_id: String,
    pub customer_id: String,
    pub salesperson_id: String,
    pub create_datetime: NaiveDateTime,
}

impl From<ReceiptRow> for ReceiptSummary {
    fn from(row: ReceiptRow) -> Self {
        ReceiptSummary {
            receipt_id: row.receipt_id,
            invoice_id: row.invoice_id,
            total_amount: row.total_amount,
            deduct_amount: row.deduct_amount,
            payment_account_id: row.payment_account_id,
            customer_id: row.customer_id,
            salesperson_id: row.salesperson_id,
            create_datetime: row.create_datetime,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub product_id: String,
    pub product_name: String,
    pub specification: Option<String>,
    pub variant: Option<String>,
    pub unit: Option<String>,
    pub brand: Option<String>,
    pub product_type: Option<String>,
    pub price: Option<BigDecimal>,
    pub cost: Option<BigDecimal>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            product_id: row.product_id,
            product_name: row.product_name,
            specification: row.specification,
            variant: row.variant,
            unit: row.unit,
            brand: row.brand,
            product_type: row.product_type,
            price: row.price.unwrap_or_else(BigDecimal::zero),
            cost: row.cost.unwrap_or_else(BigDecimal::zero),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ReturnOrderRow {
    pub return_id: String,
    pub customer_id: String,
    pub salesperson_id: Option<String>,
    pub invoice_id: Option<String>,
    pub create_datetime: NaiveDateTime,
    pub overriden_total_amount: Option<BigDecimal>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReturnItemRow {
    pub return_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub price: BigDecimal,
    pub warehouse_name: String,
}

/// 退货单头 + 明细 组装, 保持单头的查询顺序
pub fn assemble_returns(headers: Vec<ReturnOrderRow>, items: Vec<ReturnItemRow>) -> Vec<ReturnOrder> {
    let mut orders: IndexMap<String, ReturnOrder> = headers
        .into_iter()
        .map(|h| {
            let order = ReturnOrder {
                return_id: h.return_id.clone(),
                customer_id: h.customer_id,
                salesperson_id: h.salesperson_id,
                invoice_id: h.invoice_id,
                create_datetime: h.create_datetime,
                items: Vec::new(),
                overriden_total_amount: h.overriden_total_amount,
            };
            (h.return_id, order)
        })
        .collect();

    for item in items {
        match orders.get_mut(&item.return_id) {
            Some(order) => order.items.push(ReturnItem {
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
                warehouse_name: item.warehouse_name,
            }),
            None => tracing::warn!("Return item references unknown return {}", item.return_id),
        }
    }

    orders.into_values().collect()
}

#[derive(Debug, Clone, FromRow)]
pub struct InventoryChangeRow {
    pub record_id: String,
    pub change_type: i16,
    pub from_warehouse: Option<String>,
    pub to_warehouse: Option<String>,
    pub created_datetime: NaiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct InventoryChangeItemRow {
    pub record_id: String,
    pub product_id: String,
    pub current_quantity: Option<i64>,
    pub previous_quantity: Option<i64>,
    pub transfered_quantity: Option<i64>,
}

/// 库存变动记录组装, 未知变动类型的记录跳过
pub fn assemble_inventory_changes(
    headers: Vec<InventoryChangeRow>,
    items: Vec<InventoryChangeItemRow>,
) -> Vec<InventoryChangeRecord> {
    let mut records: IndexMap<String, InventoryChangeRecord> = IndexMap::new();
    for h in headers {
        let Some(change_type) = ChangeType::from_code(h.change_type) else {
            tracing::warn!("Inventory record {} has unknown type {}, skipping", h.record_id, h.change_type);
            continue;
        };
        records.insert(
            h.record_id.clone(),
            InventoryChangeRecord {
                record_id: h.record_id,
                change_type,
                from_warehouse: h.from_warehouse,
                to_warehouse: h.to_warehouse,
                items: Vec::new(),
                created_datetime: h.created_datetime,
            },
        );
    }

    for item in items {
        if let Some(record) = records.get_mut(&item.record_id) {
            record.items.push(InventoryChangeItem {
                product_id: item.product_id,
                current_quantity: item.current_quantity,
                previous_quantity: item.previous_quantity,
                transfered_quantity: item.transfered_quantity,
            });
        }
    }

    records.into_values().collect()
}
