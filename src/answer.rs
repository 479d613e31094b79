//! Plain-text answer rendering
//!
//! Turns a [`MetricResult`] into the short markdown summary shown to the
//! user. Undefined values render as `n/a`, never as zero.

use crate::models::{
    CashRunwayReport, GrossMarginRow, Intent, MetricResult, OpexRow, RevenueVsBudgetReport,
};

const UNDEFINED: &str = "n/a";

/// Build the markdown summary for a computed metric
pub fn summarize(intent: &Intent, result: &MetricResult) -> String {
    match result {
        MetricResult::RevenueVsBudget(report) => summarize_revenue(report),
        MetricResult::GrossMarginTrend(rows) => {
            let last_n = match intent {
                Intent::GrossMarginTrend { last_n } => *last_n,
                _ => rows.len(),
            };
            summarize_gross_margin(last_n, rows)
        }
        MetricResult::OpexBreakdown(rows) => {
            let requested = match intent {
                Intent::OpexBreakdown { month: Some(month) } => month.to_string(),
                _ => "latest month".to_string(),
            };
            summarize_opex(&requested, rows)
        }
        MetricResult::CashRunway(report) => summarize_runway(report),
    }
}

fn summarize_revenue(report: &RevenueVsBudgetReport) -> String {
    let delta_pct = report
        .delta_pct
        .map(|pct| format!("{:.1}%", pct * 100.0))
        .unwrap_or_else(|| UNDEFINED.to_string());

    format!(
        "**Revenue — {}**\nActual: {} | Budget: {} | Δ: {} ({})",
        report.month.label(),
        format_usd_opt(report.actual_usd),
        format_usd_opt(report.budget_usd),
        format_usd_opt(report.delta_usd),
        delta_pct,
    )
}

fn summarize_gross_margin(last_n: usize, rows: &[GrossMarginRow]) -> String {
    let mut out = format!("**Gross Margin % — last {} months**", last_n);

    for row in rows {
        let pct = row
            .gross_margin_pct
            .map(|pct| format!("{:.1}%", pct))
            .unwrap_or_else(|| UNDEFINED.to_string());
        out.push_str(&format!("\n- {}: {}", row.month.label(), pct));
    }

    out
}

fn summarize_opex(requested: &str, rows: &[OpexRow]) -> String {
    let mut out = format!("**Opex Breakdown — {}**", requested);

    if rows.is_empty() {
        out.push_str("\nNo opex recorded for this month.");
    }
    for row in rows {
        out.push_str(&format!("\n- {}: {}", row.category, group_thousands(row.amount)));
    }

    out
}

fn summarize_runway(report: &CashRunwayReport) -> String {
    let header = format!(
        "**Cash Runway — {}**\nCash: {}",
        report.current_month.label(),
        format_usd(report.cash_usd)
    );

    match (report.avg_net_burn, report.runway_months) {
        (Some(burn), Some(runway)) => format!(
            "{} | Avg net burn (3m): {} → **Runway: {:.1} months**",
            header,
            format_usd(burn),
            runway
        ),
        _ => format!(
            "{}. {}",
            header,
            report.note.as_deref().unwrap_or("Runway is not applicable.")
        ),
    }
}

/// Whole dollars with thousands separators, e.g. `$1,234,568`
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }

    let grouped = group_thousands(value.abs());
    if value.round() < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

fn format_usd_opt(value: Option<f64>) -> String {
    value.map(format_usd).unwrap_or_else(|| UNDEFINED.to_string())
}

fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
