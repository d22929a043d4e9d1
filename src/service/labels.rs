use crate::error::{ReportError, ReportResult};
use crate::models::Product;

pub const UNKNOWN_PRODUCT_LABEL: &str = "Unknown Product";
pub const UNKNOWN_CUSTOMER_LABEL: &str = "Unknown Customer";

/// 商品显示名: 名称 (规格) (口味), 商品缺失时返回固定占位名
pub fn product_display_name(
    product: Option<&Product>,
    include_specification: bool,
    include_variant: bool,
) -> String {
    let Some(product) = product else {
        return UNKNOWN_PRODUCT_LABEL.to_string();
    };

    let mut label = product.product_name.trim().to_string();

    if include_specification {
        if let Some(spec) = non_blank(product.specification.as_deref()) {
            label.push_str(&format!(" ({})", spec));
        }
    }
    if include_variant {
        if let Some(variant) = non_blank(product.variant.as_deref()) {
            label.push_str(&format!(" ({})", variant));
        }
    }

    label.trim().to_string()
}

pub fn display_name(product: Option<&Product>) -> String {
    product_display_name(product, true, true)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 单据编号 `YYYY-MM-DD-<序号>` -> `YYYYMMDD` + 至少3位序号
///
/// 例: `2024-03-07-5` -> `20240307005`. 不足4段视为后端数据异常.
pub fn format_document_id(id: &str) -> ReportResult<String> {
    let segments: Vec<&str> = id.split('-').collect();
    if segments.len() < 4 {
        return Err(ReportError::InvalidIdFormat(id.to_string()));
    }

    Ok(format!(
        "{}{}{}{:0>3}",
        segments[0], segments[1], segments[2], segments[3]
    ))
}
