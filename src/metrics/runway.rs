//! Cash runway projection

use super::ebitda_month;
use crate::error::CopilotError;
use crate::models::{CashRunwayReport, Dataset};
use crate::Result;
use tracing::debug;

/// Months of actuals averaged into the burn rate
pub const RUNWAY_WINDOW_MONTHS: usize = 3;

pub const NOT_BURNING_NOTE: &str =
    "Company is not burning cash over the last 3 months (positive EBITDA). Runway is not applicable.";

/// Project how long current cash lasts at the average burn of the most recent
/// months of actuals.
///
/// Burn is the negated mean EBITDA (native currency). When the business is
/// break-even or better there is no runway and the report carries a note.
pub fn cash_runway(dataset: &Dataset) -> Result<CashRunwayReport> {
    let months = dataset.recent_actual_months(RUNWAY_WINDOW_MONTHS);
    let current_month = *months.last().ok_or(CopilotError::EmptyDataset)?;

    let total_ebitda: f64 = months.iter().map(|m| ebitda_month(dataset, *m)).sum();
    let avg_net_burn = -(total_ebitda / months.len() as f64);

    let cash_usd: f64 = dataset
        .cash
        .iter()
        .filter(|row| row.month == current_month)
        .map(|row| row.cash_usd)
        .sum();

    if avg_net_burn <= 0.0 {
        debug!(%current_month, avg_net_burn, "Not burning cash, runway not applicable");
        return Ok(CashRunwayReport {
            current_month,
            cash_usd,
            avg_net_burn: None,
            runway_months: None,
            note: Some(NOT_BURNING_NOTE.to_string()),
        });
    }

    let runway_months = cash_usd / avg_net_burn;
    debug!(%current_month, avg_net_burn, runway_months, "Runway projected");

    Ok(CashRunwayReport {
        current_month,
        cash_usd,
        avg_net_burn: Some(avg_net_burn),
        runway_months: Some(runway_months),
        note: None,
    })
}
