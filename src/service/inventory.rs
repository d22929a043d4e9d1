use std::collections::HashMap;

use indexmap::IndexMap;

use crate::models::{ChangeType, InventoryChangeRecord, InventoryMovementRow, Product};
use crate::service::labels::display_name;
use crate::service::products::product_index;

type MovementRows = IndexMap<(String, String), InventoryMovementRow>;

fn row_for<'a>(
    rows: &'a mut MovementRows,
    index: &HashMap<&str, &Product>,
    product_id: &str,
    warehouse: &str,
) -> &'a mut InventoryMovementRow {
    rows.entry((product_id.to_string(), warehouse.to_string()))
        .or_insert_with(|| InventoryMovementRow {
            product_id: product_id.to_string(),
            product_name: display_name(index.get(product_id).copied()),
            warehouse_name: warehouse.to_string(),
            ..Default::default()
        })
}

/// 按 (商品, 仓库) 汇总库存变动
///
/// 入库记到目标仓, 出库记到来源仓, 手工盘点调整目标仓(缺省来源仓), 调拨在两仓之间一出一入.
pub fn inventory_movements(
    records: &[InventoryChangeRecord],
    products: &[Product],
) -> Vec<InventoryMovementRow> {
    let mut rows: MovementRows = IndexMap::new();
    let index = product_index(products);

    for record in records {
        let from = record.from_warehouse.as_deref();
        let to = record.to_warehouse.as_deref();

        for item in &record.items {
            let product_id = item.product_id.as_str();
            match (record.change_type, from, to) {
                (ChangeType::Inbound, _, Some(to)) => {
                    row_for(&mut rows, &index, product_id, to).inbound += item.moved_quantity();
                }
                (ChangeType::Outbound, Some(from), _) => {
                    row_for(&mut rows, &index, product_id, from).outbound += item.moved_quantity();
                }
                (ChangeType::ManualUpdate, _, Some(warehouse))
                | (ChangeType::ManualUpdate, Some(warehouse), None) => {
                    row_for(&mut rows, &index, product_id, warehouse).adjusted += item.quantity_delta().unwrap_or(0);
                }
                (ChangeType::Transfer, Some(from), Some(to)) => {
                    let quantity = item.moved_quantity();
                    row_for(&mut rows, &index, product_id, from).transferred_out += quantity;
                    row_for(&mut rows, &index, product_id, to).transferred_in += quantity;
                }
                _ => {
                    tracing::warn!(
                        "Inventory record {} ({:?}) missing warehouse, skipping product {}",
                        record.record_id,
                        record.change_type,
                        product_id
                    );
                }
            }
        }
    }

    let mut rows: Vec<InventoryMovementRow> = rows
        .into_values()
        .map(|mut row| {
            row.net = row.inbound - row.outbound + row.adjusted + row.transferred_in
                - row.transferred_out;
            row
        })
        .collect();
    rows.sort_by(|a, b| {
        a.product_name
            .cmp(&b.product_name)
            .then_with(|| a.warehouse_name.cmp(&b.warehouse_name))
    });
    rows
}
