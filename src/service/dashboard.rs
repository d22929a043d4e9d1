//! 首页看板: 今日/本月营业额、本月逐日序列、客户与业务员排名

use std::collections::HashMap;

use bigdecimal::{BigDecimal, Zero};
use chrono::{Datelike, NaiveDate};

use crate::models::{InvoiceSummary, RankedRow, ReferenceEntity, RevenueOverview};

fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

/// 计算今日营业额、本月营业额及本月 1 日到参考日的逐日营业额/订单数
///
/// 逐日序列按输入顺序累加, 无数据的日期补 0.
pub fn revenue_overview(summaries: &[InvoiceSummary], reference: NaiveDate) -> RevenueOverview {
    let days = reference.day() as usize;
    let mut today_revenue = BigDecimal::zero();
    let mut month_revenue = BigDecimal::zero();
    let mut daily_revenue = vec![BigDecimal::zero(); days];
    let mut daily_orders = vec![0usize; days];

    for summary in summaries {
        let created = summary.created_on();
        if !same_month(created, reference) {
            continue;
        }

        let amount = summary.effective_amount();
        month_revenue += amount;
        if created == reference {
            today_revenue += amount;
        }

        let slot = created.day() as usize - 1;
        if slot < days {
            daily_revenue[slot] += amount;
            daily_orders[slot] += 1;
        }
    }

    RevenueOverview {
        today_revenue,
        month_revenue,
        daily_revenue,
        daily_orders,
    }
}

/// 按本月营业额对实体排名 (降序, 稳定排序)
///
/// 每个实体先按输入顺序置 0, 输出行数恒等于实体数; 引用不存在实体的销售单被忽略.
/// 多个实体共用同一ID时, 金额只记入第一个, 其余保持 0.
pub fn rank_by_revenue<E: ReferenceEntity>(
    summaries: &[InvoiceSummary],
    entities: &[E],
    reference: NaiveDate,
) -> Vec<RankedRow<BigDecimal>> {
    rank_entities(summaries, entities, reference, BigDecimal::zero(), |total, summary| {
        *total += summary.effective_amount();
    })
}

/// 按本月订单数对实体排名, 规则同 [`rank_by_revenue`]
pub fn rank_by_orders<E: ReferenceEntity>(
    summaries: &[InvoiceSummary],
    entities: &[E],
    reference: NaiveDate,
) -> Vec<RankedRow<usize>> {
    rank_entities(summaries, entities, reference, 0, |count, _| *count += 1)
}

fn rank_entities<E, V, F>(
    summaries: &[InvoiceSummary],
    entities: &[E],
    reference: NaiveDate,
    zero: V,
    mut accumulate: F,
) -> Vec<RankedRow<V>>
where
    E: ReferenceEntity,
    V: Ord + Clone,
    F: FnMut(&mut V, &InvoiceSummary),
{
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(entities.len());
    for (index, entity) in entities.iter().enumerate() {
        slots.entry(entity.id()).or_insert(index);
    }

    let mut values = vec![zero; entities.len()];
    for summary in summaries {
        if !same_month(summary.created_on(), reference) {
            continue;
        }
        if let Some(&slot) = slots.get(E::key_of(summary)) {
            accumulate(&mut values[slot], summary);
        }
    }

    let mut rows: Vec<RankedRow<V>> = entities
        .iter()
        .zip(values)
        .map(|(entity, value)| RankedRow {
            name: entity.name().to_string(),
            value,
        })
        .collect();
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows
}
