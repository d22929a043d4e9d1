use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 结算方式 (0 = 现结, 1 = 月结)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementType {
    Immediate,
    Monthly,
}

impl SettlementType {
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Immediate),
            1 => Some(Self::Monthly),
            _ => None,
        }
    }
}

/// 销售单汇总 (InvoiceSummary)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub invoice_id: String,
    pub customer_id: String,
    pub salesperson_id: String,
    pub warehouse_name: String,
    pub create_datetime: NaiveDateTime,
    pub due_date: Option<NaiveDate>,
    pub total_amount: BigDecimal,
    pub overriden_total_amount: Option<BigDecimal>,
    pub paid_amount: BigDecimal,
    pub settlement_type: Option<SettlementType>,
}

impl InvoiceSummary {
    /// 应收金额: 有改价时取改价金额, 否则取原始总额
    pub fn effective_amount(&self) -> &BigDecimal {
        self.overriden_total_amount
            .as_ref()
            .unwrap_or(&self.total_amount)
    }

    /// 是否已结清: 已收金额 >= 原始总额 (不看改价金额)
    pub fn is_fully_paid(&self) -> bool {
        self.paid_amount >= self.total_amount
    }

    pub fn created_on(&self) -> NaiveDate {
        self.create_datetime.date()
    }
}

/// 销售单明细 (InvoiceItem)
///
/// `invoice_item_id` 的格式为 `<invoiceId>_<序号>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub invoice_item_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub price: BigDecimal,
    pub amount: Option<BigDecimal>,
}

impl InvoiceItem {
    /// 从明细ID还原所属销售单ID (取第一个 `_` 之前的部分)
    pub fn invoice_id(&self) -> &str {
        invoice_id_of(&self.invoice_item_id)
    }
}

pub fn invoice_id_of(invoice_item_id: &str) -> &str {
    invoice_item_id
        .split('_')
        .next()
        .unwrap_or(invoice_item_id)
}
