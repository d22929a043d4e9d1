//! 商品销售/退货汇总: 按 (商品, 单价) 合并明细

use std::collections::HashMap;
use std::io::Write;

use bigdecimal::BigDecimal;
use indexmap::IndexMap;

use crate::error::{ReportError, ReportResult};
use crate::models::{InvoiceItem, Product, ProductSalesRow, ReturnOrder};
use crate::service::labels::display_name;

/// 分组键: 商品ID + 单价 (单价按数值精确相等, 不做舍入)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProductPriceKey {
    product_id: String,
    price: BigDecimal,
}

/// 商品ID -> 商品, 供显示名查找
pub fn product_index(products: &[Product]) -> HashMap<&str, &Product> {
    products
        .iter()
        .map(|p| (p.product_id.as_str(), p))
        .collect()
}

/// 通用聚合: 输入 (商品ID, 单价, 数量) 序列, 按首次出现顺序输出汇总行
fn aggregate_lines<'a, I>(lines: I, products: &[Product]) -> Vec<ProductSalesRow>
where
    I: IntoIterator<Item = (&'a str, &'a BigDecimal, i64)>,
{
    let mut quantities: IndexMap<ProductPriceKey, i64> = IndexMap::new();
    for (product_id, price, quantity) in lines {
        // 去掉尾随零, 行ID与输入顺序和小数位数无关
        let key = ProductPriceKey {
            product_id: product_id.to_string(),
            price: price.normalized(),
        };
        *quantities.entry(key).or_insert(0) += quantity;
    }

    let index = product_index(products);
    quantities
        .into_iter()
        .map(|(key, quantity)| {
            let product_name = display_name(index.get(key.product_id.as_str()).copied());
            let amount = &key.price * BigDecimal::from(quantity);
            ProductSalesRow {
                id: format!("{}#{}", key.product_id, key.price),
                product_id: key.product_id,
                product_name,
                price: key.price,
                quantity,
                amount,
            }
        })
        .collect()
}

/// 销售明细汇总 (已购商品表)
pub fn aggregate_invoice_items<'a, I>(items: I, products: &[Product]) -> Vec<ProductSalesRow>
where
    I: IntoIterator<Item = &'a InvoiceItem>,
{
    aggregate_lines(
        items
            .into_iter()
            .map(|item| (item.product_id.as_str(), &item.price, item.quantity)),
        products,
    )
}

/// 退货明细汇总 (退货商品表), 展开所有退货单的明细后按同一规则分组
pub fn aggregate_return_items(returns: &[ReturnOrder], products: &[Product]) -> Vec<ProductSalesRow> {
    aggregate_lines(
        returns
            .iter()
            .flat_map(|r| r.items.iter())
            .map(|item| (item.product_id.as_str(), &item.price, item.quantity)),
        products,
    )
}

/// 导出商品汇总表为 CSV
pub fn write_product_rows_csv<W: Write>(rows: &[ProductSalesRow], writer: W) -> ReportResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["id", "product_name", "price", "quantity", "amount"])?;

    for row in rows {
        writer.write_record(&[
            row.id.clone(),
            row.product_name.clone(),
            row.price.to_string(),
            row.quantity.to_string(),
            row.amount.to_string(),
        ])?;
    }

    writer
        .flush()
        .map_err(|e| ReportError::Export(e.to_string()))?;
    Ok(())
}
