use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use rayon::prelude::*;

use crate::models::{Customer, InactiveCustomerRow, InvoiceSummary};

/// 长窗口 (180天) 内无任何订单时使用的天数, 保证升序排序时排在最后
pub const NO_RECENT_ORDER_DAYS: i64 = 999;

/// 近 N 天未下单的客户, 附最近一次下单日期与距今天数
///
/// - `short_window`: 近 N 天的销售单
/// - `long_window`: 近 180 天的销售单, 用于查找最近下单日期
pub fn inactive_customers(
    customers: &[Customer],
    short_window: &[InvoiceSummary],
    long_window: &[InvoiceSummary],
    now: NaiveDateTime,
) -> Vec<InactiveCustomerRow> {
    let active: HashSet<&str> = short_window
        .iter()
        .map(|s| s.customer_id.as_str())
        .collect();

    let mut last_order: HashMap<&str, NaiveDateTime> = HashMap::new();
    for summary in long_window {
        last_order
            .entry(summary.customer_id.as_str())
            .and_modify(|latest| {
                if summary.create_datetime > *latest {
                    *latest = summary.create_datetime;
                }
            })
            .or_insert(summary.create_datetime);
    }

    let today = now.date();
    let mut rows: Vec<InactiveCustomerRow> = customers
        .par_iter()
        .filter(|c| !active.contains(c.customer_id.as_str()))
        .map(|c| {
            let last_order_date: Option<NaiveDate> =
                last_order.get(c.customer_id.as_str()).map(|dt| dt.date());
            let days_since_last_order = last_order_date
                .map(|date| (today - date).num_days())
                .unwrap_or(NO_RECENT_ORDER_DAYS);

            InactiveCustomerRow {
                customer_id: c.customer_id.clone(),
                customer_name: c.name.clone(),
                last_order_date,
                days_since_last_order,
            }
        })
        .collect();

    rows.sort_by_key(|r| r.days_since_last_order);
    rows
}
