//! Opex breakdown by subcategory

use super::resolve_month;
use crate::models::{Dataset, Month, OpexRow};
use crate::Result;
use std::collections::BTreeMap;

/// Opex totals per category for a month, highest spend first.
///
/// Amounts are native currency, not FX converted. Ties keep the
/// alphabetical grouping order.
pub fn opex_breakdown(dataset: &Dataset, month: Option<Month>) -> Result<Vec<OpexRow>> {
    let target = resolve_month(dataset, month)?;

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for row in dataset.actuals_for(target) {
        if let Some(category) = row.opex_category() {
            *totals.entry(category).or_insert(0.0) += row.amount;
        }
    }

    let mut rows: Vec<OpexRow> = totals
        .into_iter()
        .map(|(category, amount)| OpexRow {
            category: category.to_string(),
            amount,
        })
        .collect();

    // sort_by is stable
    rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    Ok(rows)
}
