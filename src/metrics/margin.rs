//! Gross margin trend

use crate::models::{Dataset, GrossMarginRow};

/// Gross margin % for the `last_n` most recent actuals months, oldest first.
///
/// Returns fewer rows when fewer months exist. Amounts are summed in native
/// currency. A month with zero revenue has an undefined margin.
pub fn gross_margin_trend(dataset: &Dataset, last_n: usize) -> Vec<GrossMarginRow> {
    dataset
        .recent_actual_months(last_n)
        .into_iter()
        .map(|month| {
            let (revenue, cogs) = dataset.actuals_for(month).fold(
                (0.0, 0.0),
                |(revenue, cogs), row| {
                    if row.is_revenue() {
                        (revenue + row.amount, cogs)
                    } else if row.is_cogs() {
                        (revenue, cogs + row.amount)
                    } else {
                        (revenue, cogs)
                    }
                },
            );

            GrossMarginRow {
                month,
                gross_margin_pct: gross_margin_pct(revenue, cogs),
            }
        })
        .collect()
}

fn gross_margin_pct(revenue: f64, cogs: f64) -> Option<f64> {
    if revenue == 0.0 {
        return None;
    }
    Some((revenue - cogs) / revenue * 100.0)
}
