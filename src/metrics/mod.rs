//! Metrics engine
//!
//! Pure functions over a loaded [`Dataset`]. Nothing here mutates the dataset
//! or keeps state between calls, so the same inputs always give the same
//! result.
//!
//! Known discrepancy: revenue vs budget converts amounts to USD through the
//! `fx` table, while opex breakdown, gross margin and EBITDA/runway sum
//! native-currency amounts directly. Mixed-currency ledgers therefore produce
//! mixed-unit totals in the latter three.

use crate::error::CopilotError;
use crate::models::{Dataset, Month};
use crate::Result;

pub mod margin;
pub mod opex;
pub mod revenue;
pub mod runway;

pub use margin::gross_margin_trend;
pub use opex::opex_breakdown;
pub use revenue::revenue_vs_budget;
pub use runway::{cash_runway, NOT_BURNING_NOTE, RUNWAY_WINDOW_MONTHS};

/// Resolve an optional month to a concrete one: the given month, or the
/// latest month present in actuals.
pub fn resolve_month(dataset: &Dataset, month: Option<Month>) -> Result<Month> {
    match month {
        Some(month) => Ok(month),
        None => dataset
            .latest_actual_month()
            .ok_or(CopilotError::EmptyDataset),
    }
}

/// Same as [`resolve_month`] for a raw `YYYY-MM` parameter
pub fn resolve_month_str(dataset: &Dataset, month: Option<&str>) -> Result<Month> {
    let parsed = month.map(str::parse::<Month>).transpose()?;
    resolve_month(dataset, parsed)
}

/// Revenue - COGS - Opex for one month, in native currency units
pub fn ebitda_month(dataset: &Dataset, month: Month) -> f64 {
    let mut revenue = 0.0;
    let mut cogs = 0.0;
    let mut opex = 0.0;

    for row in dataset.actuals_for(month) {
        if row.is_revenue() {
            revenue += row.amount;
        } else if row.is_cogs() {
            cogs += row.amount;
        } else if row.opex_category().is_some() {
            opex += row.amount;
        }
    }

    revenue - cogs - opex
}
