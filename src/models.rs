//! Core data models for the FP&A copilot

use crate::error::CopilotError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Exact category tag for revenue rows
pub const REVENUE: &str = "Revenue";
/// Exact category tag for cost-of-goods-sold rows
pub const COGS: &str = "COGS";
/// Prefix marking an operating-expense subcategory
pub const OPEX_PREFIX: &str = "Opex:";

//
// ================= Month =================
//

/// A calendar month, stored as its first day.
///
/// Every table joins on `Month` equality, so two dates in the same month
/// always compare equal once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Normalize any date to the month containing it
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Human label, e.g. "Jun 2025"
    pub fn label(&self) -> String {
        self.0.format("%b %Y").to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for Month {
    type Err = CopilotError;

    /// Accepts `YYYY-MM` or a full `YYYY-MM-DD` date
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d"))
            .map(Self::from_date)
            .map_err(|_| CopilotError::InvalidMonth(raw.to_string()))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

//
// ================= Tables =================
//

/// One row of `actuals` or `budget`, amount in native currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerRow {
    pub month: Month,
    pub account_category: String,
    pub currency: String,
    pub amount: f64,
}

impl LedgerRow {
    pub fn new(
        month: Month,
        account_category: impl Into<String>,
        currency: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            month,
            account_category: account_category.into(),
            currency: currency.into(),
            amount,
        }
    }

    pub fn is_revenue(&self) -> bool {
        self.account_category == REVENUE
    }

    pub fn is_cogs(&self) -> bool {
        self.account_category == COGS
    }

    /// Display name of an opex subcategory, `None` for non-opex rows
    pub fn opex_category(&self) -> Option<&str> {
        self.account_category.strip_prefix(OPEX_PREFIX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashRow {
    pub month: Month,
    pub cash_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FxRow {
    pub month: Month,
    pub currency: String,
    pub rate_to_usd: f64,
}

/// The four tables every metric reads from. Immutable once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub actuals: Vec<LedgerRow>,
    pub budget: Vec<LedgerRow>,
    pub cash: Vec<CashRow>,
    pub fx: Vec<FxRow>,
}

impl Dataset {
    pub fn new(
        actuals: Vec<LedgerRow>,
        budget: Vec<LedgerRow>,
        cash: Vec<CashRow>,
        fx: Vec<FxRow>,
    ) -> Self {
        Self {
            actuals,
            budget,
            cash,
            fx,
        }
    }

    /// Distinct months present in `actuals`, ascending
    pub fn actual_months(&self) -> Vec<Month> {
        self.actuals
            .iter()
            .map(|row| row.month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The `n` most recent actuals months, ascending
    pub fn recent_actual_months(&self, n: usize) -> Vec<Month> {
        let months = self.actual_months();
        let skip = months.len().saturating_sub(n);
        months.into_iter().skip(skip).collect()
    }

    pub fn latest_actual_month(&self) -> Option<Month> {
        self.actuals.iter().map(|row| row.month).max()
    }

    /// Rate for a (month, currency) pair; first matching row wins
    pub fn fx_rate(&self, month: Month, currency: &str) -> Option<f64> {
        self.fx
            .iter()
            .find(|row| row.month == month && row.currency == currency)
            .map(|row| row.rate_to_usd)
    }

    pub fn actuals_for(&self, month: Month) -> impl Iterator<Item = &LedgerRow> {
        self.actuals.iter().filter(move |row| row.month == month)
    }
}

//
// ================= Intent =================
//

/// Names of every intent the router can emit, in dispatch order
pub const SUPPORTED_INTENTS: &[&str] = &[
    "revenue_vs_budget",
    "gross_margin_trend",
    "opex_breakdown",
    "cash_runway",
];

/// Structured form of a question: which metric to compute, with what params
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "params", rename_all = "snake_case")]
pub enum Intent {
    /// `month: None` means the most recent month in actuals
    RevenueVsBudget { month: Option<Month> },
    GrossMarginTrend { last_n: usize },
    OpexBreakdown { month: Option<Month> },
    CashRunway {},
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::RevenueVsBudget { .. } => "revenue_vs_budget",
            Intent::GrossMarginTrend { .. } => "gross_margin_trend",
            Intent::OpexBreakdown { .. } => "opex_breakdown",
            Intent::CashRunway {} => "cash_runway",
        }
    }

    /// Parameter mapping handed to the metric tool
    pub fn params(&self) -> Value {
        match self {
            Intent::RevenueVsBudget { month } | Intent::OpexBreakdown { month } => {
                json!({ "month": month.map(|m| m.to_string()) })
            }
            Intent::GrossMarginTrend { last_n } => json!({ "last_n": last_n }),
            Intent::CashRunway {} => json!({}),
        }
    }
}

impl Default for Intent {
    fn default() -> Self {
        Intent::RevenueVsBudget { month: None }
    }
}

//
// ================= Results =================
//

/// `None` fields are undefined (missing FX rate, zero budget), never zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueVsBudgetReport {
    pub month: Month,
    pub actual_usd: Option<f64>,
    pub budget_usd: Option<f64>,
    pub delta_usd: Option<f64>,
    pub delta_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrossMarginRow {
    pub month: Month,
    pub gross_margin_pct: Option<f64>,
}

/// Opex amount in native currency units (not FX converted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpexRow {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashRunwayReport {
    pub current_month: Month,
    pub cash_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_net_burn: Option<f64>,
    pub runway_months: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Output of any metric tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum MetricResult {
    RevenueVsBudget(RevenueVsBudgetReport),
    GrossMarginTrend(Vec<GrossMarginRow>),
    OpexBreakdown(Vec<OpexRow>),
    CashRunway(CashRunwayReport),
}

impl MetricResult {
    pub fn kind(&self) -> &'static str {
        match self {
            MetricResult::RevenueVsBudget(_) => "revenue_vs_budget",
            MetricResult::GrossMarginTrend(_) => "gross_margin_trend",
            MetricResult::OpexBreakdown(_) => "opex_breakdown",
            MetricResult::CashRunway(_) => "cash_runway",
        }
    }
}
