use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::invoice::InvoiceSummary;

/// 商品
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub specification: Option<String>,
    pub variant: Option<String>,
    pub unit: Option<String>,
    pub brand: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub price: BigDecimal,
    pub cost: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salesperson {
    pub salesperson_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub warehouse_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAccount {
    pub payment_account_id: String,
    pub name: String,
}

/// 可被销售单引用、参与排名和汇总的基础资料 (客户 / 业务员)
pub trait ReferenceEntity {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    /// 销售单上指向该类实体的外键
    fn key_of(summary: &InvoiceSummary) -> &str;
}

impl ReferenceEntity for Customer {
    fn id(&self) -> &str {
        &self.customer_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn key_of(summary: &InvoiceSummary) -> &str {
        &summary.customer_id
    }
}

impl ReferenceEntity for Salesperson {
    fn id(&self) -> &str {
        &self.salesperson_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn key_of(summary: &InvoiceSummary) -> &str {
        &summary.salesperson_id
    }
}
