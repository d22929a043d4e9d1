use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 库存变动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Inbound,
    Outbound,
    ManualUpdate,
    Transfer,
}

impl ChangeType {
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Inbound),
            1 => Some(Self::Outbound),
            2 => Some(Self::ManualUpdate),
            3 => Some(Self::Transfer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryChangeItem {
    pub product_id: String,
    pub current_quantity: Option<i64>,
    pub previous_quantity: Option<i64>,
    pub transfered_quantity: Option<i64>,
}

impl InventoryChangeItem {
    /// 变动前后差值 (current - previous), 任一缺失则为 None
    pub fn quantity_delta(&self) -> Option<i64> {
        match (self.current_quantity, self.previous_quantity) {
            (Some(current), Some(previous)) => Some(current - previous),
            _ => None,
        }
    }

    /// 本条明细移动的数量: 优先取调拨数量, 其次取前后差值的绝对值
    pub fn moved_quantity(&self) -> i64 {
        self.transfered_quantity
            .or_else(|| self.quantity_delta().map(i64::abs))
            .unwrap_or(0)
    }
}

/// 库存变动记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryChangeRecord {
    pub record_id: String,
    pub change_type: ChangeType,
    pub from_warehouse: Option<String>,
    pub to_warehouse: Option<String>,
    pub items: Vec<InventoryChangeItem>,
    pub created_datetime: NaiveDateTime,
}
