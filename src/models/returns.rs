use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 退货明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnItem {
    pub product_id: String,
    pub quantity: i64,
    pub price: BigDecimal,
    pub warehouse_name: String,
}

impl ReturnItem {
    pub fn amount(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }
}

/// 退货单及其明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnOrder {
    pub return_id: String,
    pub customer_id: String,
    pub salesperson_id: Option<String>,
    pub invoice_id: Option<String>,
    pub create_datetime: NaiveDateTime,
    pub items: Vec<ReturnItem>,
    pub overriden_total_amount: Option<BigDecimal>,
}

impl ReturnOrder {
    /// 退货金额: 有改价取改价, 否则按明细 数量*单价 合计
    pub fn amount(&self) -> BigDecimal {
        if let Some(overriden) = &self.overriden_total_amount {
            return overriden.clone();
        }

        let mut total = BigDecimal::zero();
        for item in &self.items {
            total += item.amount();
        }
        total
    }
}
