//! Revenue vs budget, converted to USD

use super::resolve_month;
use crate::models::{Dataset, LedgerRow, Month, RevenueVsBudgetReport};
use crate::Result;
use tracing::warn;

/// Compare actual and budgeted revenue for a month in USD.
///
/// A revenue row without a matching fx rate makes its table's total
/// undefined, and with it both deltas. `delta_pct` is also undefined when the
/// budget total is zero.
pub fn revenue_vs_budget(dataset: &Dataset, month: Option<Month>) -> Result<RevenueVsBudgetReport> {
    let target = resolve_month(dataset, month)?;

    let actual_usd = revenue_usd(dataset, &dataset.actuals, target, "actuals");
    let budget_usd = revenue_usd(dataset, &dataset.budget, target, "budget");

    let delta_usd = actual_usd.zip(budget_usd).map(|(actual, budget)| actual - budget);
    let delta_pct = match (delta_usd, budget_usd) {
        (Some(delta), Some(budget)) if budget != 0.0 => Some(delta / budget),
        _ => None,
    };

    Ok(RevenueVsBudgetReport {
        month: target,
        actual_usd,
        budget_usd,
        delta_usd,
        delta_pct,
    })
}

fn revenue_usd(dataset: &Dataset, rows: &[LedgerRow], month: Month, table: &str) -> Option<f64> {
    rows.iter()
        .filter(|row| row.month == month && row.is_revenue())
        .map(|row| {
            let rate = dataset.fx_rate(row.month, &row.currency);
            if rate.is_none() {
                warn!(
                    table,
                    month = %row.month,
                    currency = %row.currency,
                    "Missing fx rate, USD total is undefined"
                );
            }
            rate.map(|rate| row.amount * rate)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_converts_with_fx() {
        let report = revenue_vs_budget(&sample_dataset(), Some(month(3))).unwrap();

        assert_eq!(report.month, month(3));
        assert!(close(report.actual_usd.unwrap(), 1000.0 + 500.0 * 1.1));
        assert!(close(report.budget_usd.unwrap(), 1200.0 + 300.0 * 1.1));
        assert!(close(report.delta_usd.unwrap(), 1550.0 - 1530.0));
        assert!(close(report.delta_pct.unwrap(), 20.0 / 1530.0));
    }

    #[test]
    fn test_defaults_to_latest_month() {
        let dataset = sample_dataset();
        let latest = revenue_vs_budget(&dataset, None).unwrap();
        let explicit = revenue_vs_budget(&dataset, Some(month(3))).unwrap();

        assert_eq!(latest, explicit);
    }

    #[test]
    fn test_zero_budget_gives_undefined_pct() {
        let mut dataset = sample_dataset();
        dataset.budget.clear();

        let report = revenue_vs_budget(&dataset, Some(month(1))).unwrap();
        assert_eq!(report.budget_usd, Some(0.0));
        assert_eq!(report.delta_usd, Some(1000.0));
        assert_eq!(report.delta_pct, None);
    }

    #[test]
    fn test_zero_delta_is_not_undefined() {
        let mut dataset = sample_dataset();
        dataset.budget = vec![row(1, "Revenue", "USD", 1000.0)];

        let report = revenue_vs_budget(&dataset, Some(month(1))).unwrap();
        assert_eq!(report.delta_usd, Some(0.0));
        assert_eq!(report.delta_pct, Some(0.0));
    }

    #[test]
    fn test_missing_fx_rate_propagates_undefined() {
        let mut dataset = sample_dataset();
        dataset.fx.retain(|r| !(r.month == month(3) && r.currency == "EUR"));

        let report = revenue_vs_budget(&dataset, Some(month(3))).unwrap();
        assert_eq!(report.actual_usd, None);
        assert_eq!(report.budget_usd, None);
        assert_eq!(report.delta_usd, None);
        assert_eq!(report.delta_pct, None);

        // months without EUR rows are unaffected
        let january = revenue_vs_budget(&dataset, Some(month(1))).unwrap();
        assert_eq!(january.actual_usd, Some(1000.0));
    }

    #[test]
    fn test_month_without_rows_sums_to_zero() {
        let report = revenue_vs_budget(&sample_dataset(), Some(month(11))).unwrap();

        assert_eq!(report.actual_usd, Some(0.0));
        assert_eq!(report.budget_usd, Some(0.0));
        assert_eq!(report.delta_pct, None);
    }

    #[test]
    fn test_idempotent() {
        let dataset = sample_dataset();
        let first = revenue_vs_budget(&dataset, None).unwrap();
        let second = revenue_vs_budget(&dataset, None).unwrap();

        assert_eq!(first, second);
    }
}
