use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 收款单 (ReceiptSummary)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub receipt_id: String,
    pub invoice_id: String,
    pub total_amount: BigDecimal,
    pub deduct_amount: Option<BigDecimal>,
    pub payment_account_id: String,
    pub customer_id: String,
    pub salesperson_id: String,
    pub create_datetime: NaiveDateTime,
}

impl ReceiptSummary {
    /// 本次收款计入的金额 = 实收 + 抵扣
    pub fn received_amount(&self) -> BigDecimal {
        match &self.deduct_amount {
            Some(deduct) => &self.total_amount + deduct,
            None => self.total_amount.clone(),
        }
    }
}
