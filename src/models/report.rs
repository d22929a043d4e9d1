use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 营业额/订单数概览 (今日、本月、本月逐日序列)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueOverview {
    pub today_revenue: BigDecimal,
    pub month_revenue: BigDecimal,
    /// 下标 0 对应本月 1 日, 长度 = 参考日期的日
    pub daily_revenue: Vec<BigDecimal>,
    pub daily_orders: Vec<usize>,
}

/// 排名行 (客户/业务员 -> 本月营业额或订单数)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow<V> {
    pub name: String,
    pub value: V,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub reference_date: NaiveDate,
    pub overview: RevenueOverview,
    pub customer_revenue: Vec<RankedRow<BigDecimal>>,
    pub customer_orders: Vec<RankedRow<usize>>,
    pub salesperson_revenue: Vec<RankedRow<BigDecimal>>,
    pub salesperson_orders: Vec<RankedRow<usize>>,
}

/// 商品汇总行, 按 (商品, 单价) 分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSalesRow {
    /// `<productId>#<price>`
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub price: BigDecimal,
    pub quantity: i64,
    pub amount: BigDecimal,
}

/// 全部销售 / 已结清销售 两张商品表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaidSalesSplit {
    pub all_sales: Vec<ProductSalesRow>,
    pub paid_sales: Vec<ProductSalesRow>,
    pub paid_invoice_count: usize,
    pub unpaid_invoice_count: usize,
}

/// 近期未下单客户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InactiveCustomerRow {
    pub customer_id: String,
    pub customer_name: String,
    pub last_order_date: Option<NaiveDate>,
    pub days_since_last_order: i64,
}

/// 未结清销售单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceBalanceRow {
    pub invoice_id: String,
    pub display_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub effective_amount: BigDecimal,
    pub received_amount: BigDecimal,
    pub outstanding_amount: BigDecimal,
    pub due_date: Option<NaiveDate>,
    pub overdue_days: i64,
}

/// 客户/业务员 区间汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySummaryRow {
    pub id: String,
    pub name: String,
    pub invoice_count: usize,
    pub revenue: BigDecimal,
    pub received: BigDecimal,
    pub returned: BigDecimal,
    pub net_sales: BigDecimal,
    pub outstanding: BigDecimal,
}

/// 库存变动汇总, 按 (商品, 仓库) 分组
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryMovementRow {
    pub product_id: String,
    pub product_name: String,
    pub warehouse_name: String,
    pub inbound: i64,
    pub outbound: i64,
    pub adjusted: i64,
    pub transferred_in: i64,
    pub transferred_out: i64,
    pub net: i64,
}
