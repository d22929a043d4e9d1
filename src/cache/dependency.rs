//! 实体依赖关系: 某类实体变更后, 哪些缓存结果需要一起失效

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Customer,
    Salesperson,
    Warehouse,
    Product,
    PaymentAccount,
    Receipt,
    Return,
    Invoice,
    InvoiceItem,
    InventoryChange,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Customer,
        EntityKind::Salesperson,
        EntityKind::Warehouse,
        EntityKind::Product,
        EntityKind::PaymentAccount,
        EntityKind::Receipt,
        EntityKind::Return,
        EntityKind::Invoice,
        EntityKind::InvoiceItem,
        EntityKind::InventoryChange,
    ];

    /// 直接依赖本类实体的缓存类别 (有向无环)
    ///
    /// 收款会改写销售单的已收金额, 所以 Receipt -> Invoice; 退货和出库单会带动库存记录.
    pub fn dependents(self) -> &'static [EntityKind] {
        use EntityKind::*;
        match self {
            Customer => &[Invoice, Receipt, Return],
            Salesperson => &[Invoice, Receipt],
            Warehouse => &[Invoice, InventoryChange],
            Product => &[InvoiceItem, Return, InventoryChange],
            PaymentAccount => &[Receipt],
            Receipt => &[Invoice],
            Return => &[InventoryChange],
            Invoice => &[InvoiceItem, InventoryChange],
            InvoiceItem => &[],
            InventoryChange => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Customer => "customer",
            EntityKind::Salesperson => "salesperson",
            EntityKind::Warehouse => "warehouse",
            EntityKind::Product => "product",
            EntityKind::PaymentAccount => "payment_account",
            EntityKind::Receipt => "receipt",
            EntityKind::Return => "return",
            EntityKind::Invoice => "invoice",
            EntityKind::InvoiceItem => "invoice_item",
            EntityKind::InventoryChange => "inventory_change",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown entity kind: {}", s))
    }
}

/// `changed` 及其所有下游类别, 按拓扑序排列 (上游总在下游之前)
pub fn invalidation_order(changed: EntityKind) -> Vec<EntityKind> {
    // 可达子图
    let mut reachable: IndexSet<EntityKind> = IndexSet::new();
    reachable.insert(changed);
    let mut cursor = 0;
    while let Some(&kind) = reachable.get_index(cursor) {
        for &dependent in kind.dependents() {
            reachable.insert(dependent);
        }
        cursor += 1;
    }

    // Kahn 算法, 入度只统计子图内的边
    let mut in_degree: HashMap<EntityKind, usize> = reachable.iter().map(|&k| (k, 0)).collect();
    for kind in &reachable {
        for dependent in kind.dependents() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree += 1;
            }
        }
    }

    let mut order = Vec::with_capacity(reachable.len());
    let mut ready: Vec<EntityKind> = reachable
        .iter()
        .copied()
        .filter(|k| in_degree[k] == 0)
        .collect();
    while let Some(kind) = ready.pop() {
        order.push(kind);
        for dependent in kind.dependents() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(*dependent);
                }
            }
        }
    }

    debug_assert_eq!(order.len(), reachable.len(), "entity dependency graph has a cycle");
    order
}
