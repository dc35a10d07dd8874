use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Order, SalesLine};
use crate::reports::{
    DailySales, PizzaTypeQuantity, PizzaTypeRevenue, SalesSummary, SizePopularity, TopPizza,
};

pub const SUMMARY_TOP_TYPES: usize = 5;
pub const TOP_PIZZAS_LIMIT: usize = 10;
pub const TOP_TYPES_BY_REVENUE_LIMIT: usize = 5;

/// Quantity and revenue accumulated for one group key
#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    quantity: i64,
    revenue: Decimal,
}

impl Totals {
    fn add(&mut self, line: &SalesLine) {
        self.quantity += i64::from(line.quantity);
        self.revenue = self.revenue.saturating_add(line.revenue());
    }
}

/// Group lines by key. BTreeMap keeps keys ascending, which becomes the
/// tie-break order once callers stable-sort by a metric.
fn group_by<'a, F>(lines: &'a [SalesLine], key: F) -> Vec<(String, Totals)>
where
    F: Fn(&'a SalesLine) -> &'a str,
{
    let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
    for line in lines {
        groups.entry(key(line)).or_default().add(line);
    }
    groups
        .into_iter()
        .map(|(k, totals)| (k.to_string(), totals))
        .collect()
}

fn by_quantity_desc(groups: &mut [(String, Totals)]) {
    groups.sort_by(|a, b| b.1.quantity.cmp(&a.1.quantity));
}

fn by_revenue_desc(groups: &mut [(String, Totals)]) {
    groups.sort_by(|a, b| b.1.revenue.cmp(&a.1.revenue));
}

/// Average order value with the zero-order case mapped to 0
pub fn average_order_value(total_sales: Decimal, total_orders: i64) -> Decimal {
    if total_orders > 0 {
        total_sales / Decimal::from(total_orders)
    } else {
        Decimal::ZERO
    }
}

pub fn sales_summary(total_orders: i64, lines: &[SalesLine]) -> SalesSummary {
    let total_pizzas_sold: i64 = lines.iter().map(|l| i64::from(l.quantity)).sum();
    let total_sales = lines
        .iter()
        .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.revenue()));

    let mut by_type = group_by(lines, |l| l.pizza_type_name.as_str());
    by_quantity_desc(&mut by_type);

    SalesSummary {
        total_orders,
        total_pizzas_sold,
        total_sales,
        average_order_value: average_order_value(total_sales, total_orders),
        top_pizza_types: by_type
            .into_iter()
            .take(SUMMARY_TOP_TYPES)
            .map(|(pizza_type, totals)| PizzaTypeQuantity {
                pizza_type,
                quantity_sold: totals.quantity,
            })
            .collect(),
    }
}

/// Per-day order count, pizzas sold and sales, newest day first.
///
/// Orders without any detail still count towards their day.
pub fn daily_sales(orders: &[Order], lines: &[SalesLine]) -> Vec<DailySales> {
    let mut days: BTreeMap<NaiveDate, DailySales> = BTreeMap::new();

    for order in orders {
        let date = order.order_date.date_naive();
        days.entry(date)
            .or_insert_with(|| empty_day(date))
            .total_orders += 1;
    }

    let order_days: HashMap<i32, NaiveDate> = orders
        .iter()
        .map(|o| (o.id, o.order_date.date_naive()))
        .collect();

    for line in lines {
        let date = order_days
            .get(&line.order_id)
            .copied()
            .unwrap_or_else(|| line.order_date.date_naive());
        let day = days.entry(date).or_insert_with(|| empty_day(date));
        day.total_pizzas_sold += i64::from(line.quantity);
        day.total_sales = day.total_sales.saturating_add(line.revenue());
    }

    days.into_values().rev().collect()
}

fn empty_day(date: NaiveDate) -> DailySales {
    DailySales {
        date,
        total_orders: 0,
        total_pizzas_sold: 0,
        total_sales: Decimal::ZERO,
    }
}

pub fn top_pizzas(lines: &[SalesLine]) -> Vec<TopPizza> {
    let mut groups = group_by(lines, |l| l.pizza_type_name.as_str());
    by_quantity_desc(&mut groups);
    groups
        .into_iter()
        .take(TOP_PIZZAS_LIMIT)
        .map(|(pizza_name, totals)| TopPizza {
            pizza_name,
            quantity_sold: totals.quantity,
            total_sales: totals.revenue,
        })
        .collect()
}

pub fn pizza_sizes(lines: &[SalesLine]) -> Vec<SizePopularity> {
    let mut groups = group_by(lines, |l| l.size.as_str());
    by_quantity_desc(&mut groups);
    groups
        .into_iter()
        .map(|(size, totals)| SizePopularity {
            size,
            quantity_sold: totals.quantity,
            total_sales: totals.revenue,
        })
        .collect()
}

pub fn top_pizza_types_by_revenue(lines: &[SalesLine]) -> Vec<PizzaTypeRevenue> {
    let mut groups = group_by(lines, |l| l.pizza_type_name.as_str());
    by_revenue_desc(&mut groups);
    groups
        .into_iter()
        .take(TOP_TYPES_BY_REVENUE_LIMIT)
        .map(|(pizza_type, totals)| PizzaTypeRevenue {
            pizza_type,
            quantity_sold: totals.quantity,
            total_revenue: totals.revenue,
        })
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn lines_strategy() -> impl Strategy<Value = Vec<SalesLine>> {
        prop::collection::vec((0usize..6, 0usize..3, 1i32..=20, 100u32..=5000u32), 0..40)
            .prop_map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (type_idx, size_idx, quantity, cents))| SalesLine {
                        order_id: i as i32,
                        order_date: Utc.with_ymd_and_hms(2015, 1, 1, 12, 0, 0).unwrap(),
                        pizza_type_name: format!("Type {}", type_idx),
                        size: ["S", "M", "L"][size_idx].to_string(),
                        quantity,
                        price: Decimal::from(cents) / Decimal::from(100),
                    })
                    .collect()
            })
    }

    /// Average order value is total sales / total orders, or 0 without orders
    #[test]
    fn prop_average_order_value() {
        proptest!(|(lines in lines_strategy(), total_orders in 0i64..50)| {
            let summary = sales_summary(total_orders, &lines);
            if total_orders > 0 {
                prop_assert_eq!(
                    summary.average_order_value,
                    summary.total_sales / Decimal::from(total_orders)
                );
            } else {
                prop_assert_eq!(summary.average_order_value, Decimal::ZERO);
            }
        });
    }

    /// Grouped reports partition the same quantity and revenue as the raw lines
    #[test]
    fn prop_size_report_conserves_totals() {
        proptest!(|(lines in lines_strategy())| {
            let sizes = pizza_sizes(&lines);
            let quantity: i64 = sizes.iter().map(|s| s.quantity_sold).sum();
            let revenue: Decimal = sizes.iter().map(|s| s.total_sales).sum();
            let summary = sales_summary(1, &lines);

            prop_assert_eq!(quantity, summary.total_pizzas_sold);
            prop_assert_eq!(revenue, summary.total_sales);
        });
    }

    /// Ranked reports are ordered by their metric and respect their limit
    #[test]
    fn prop_rankings_are_sorted_and_bounded() {
        proptest!(|(lines in lines_strategy())| {
            let top = top_pizzas(&lines);
            prop_assert!(top.len() <= TOP_PIZZAS_LIMIT);
            prop_assert!(top.windows(2).all(|w| w[0].quantity_sold >= w[1].quantity_sold));

            let by_revenue = top_pizza_types_by_revenue(&lines);
            prop_assert!(by_revenue.len() <= TOP_TYPES_BY_REVENUE_LIMIT);
            prop_assert!(by_revenue.windows(2).all(|w| w[0].total_revenue >= w[1].total_revenue));
        });
    }

    /// Entries with an equal metric appear in ascending key order
    #[test]
    fn prop_ties_break_on_ascending_key() {
        proptest!(|(lines in lines_strategy())| {
            let top = top_pizzas(&lines);
            prop_assert!(top.windows(2).all(|w| {
                w[0].quantity_sold != w[1].quantity_sold || w[0].pizza_name < w[1].pizza_name
            }), "top_pizzas ties not in ascending key order");

            let sizes = pizza_sizes(&lines);
            prop_assert!(sizes.windows(2).all(|w| {
                w[0].quantity_sold != w[1].quantity_sold || w[0].size < w[1].size
            }), "pizza_sizes ties not in ascending key order");

            let by_revenue = top_pizza_types_by_revenue(&lines);
            prop_assert!(by_revenue.windows(2).all(|w| {
                w[0].total_revenue != w[1].total_revenue || w[0].pizza_type < w[1].pizza_type
            }), "top_pizza_types_by_revenue ties not in ascending key order");
        });
    }
}
