//! Intent Router
//!
//! Maps a free-text finance question to an [`Intent`] using an ordered table
//! of keyword rules. The first rule whose predicate matches wins; there is no
//! scoring and no fallback to a later rule once one fires.

use crate::models::{Intent, Month};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

/// `last_n` when the gross margin rule fires with a trend qualifier
const DEFAULT_TREND_MONTHS: usize = 3;
/// `last_n` when "gross margin" appears without any qualifier
const DEFAULT_MARGIN_MONTHS: usize = 6;

lazy_static! {
    static ref MONTH_PATTERN: Regex =
        Regex::new(r"(?i)(jan|feb|mar|apr|may|jun|jul|aug|sept?|oct|nov|dec)[a-z]*\s+(\d{4})")
            .expect("month pattern is valid");
    static ref LAST_N_MONTHS: Regex =
        Regex::new(r"last\s+(\d+)\s+month").expect("last-n pattern is valid");
}

/// One routing rule: a predicate over the lowercased question and a builder
/// producing the intent when it matches.
pub struct RoutingRule {
    pub name: &'static str,
    matches: fn(&str) -> bool,
    build: fn(&str) -> Intent,
}

/// Evaluated top to bottom
static RULES: &[RoutingRule] = &[
    RoutingRule {
        name: "revenue_vs_budget",
        matches: |t| t.contains("revenue") && contains_any(t, &["budget", "vs", "versus"]),
        build: revenue_intent,
    },
    RoutingRule {
        name: "gross_margin_trend",
        matches: |t| t.contains("gross margin") && contains_any(t, &["trend", "last", "%"]),
        build: |t| Intent::GrossMarginTrend {
            last_n: extract_last_n(t).unwrap_or(DEFAULT_TREND_MONTHS),
        },
    },
    RoutingRule {
        name: "opex_breakdown",
        matches: |t| t.contains("opex") && contains_any(t, &["break", "by", "category"]),
        build: opex_intent,
    },
    RoutingRule {
        name: "cash_runway",
        matches: |t| t.contains("runway") || (t.contains("cash") && t.contains("runway")),
        build: |_| Intent::CashRunway {},
    },
    RoutingRule {
        name: "gross_margin",
        matches: |t| t.contains("gross margin"),
        build: |_| Intent::GrossMarginTrend {
            last_n: DEFAULT_MARGIN_MONTHS,
        },
    },
    RoutingRule {
        name: "opex",
        matches: |t| t.contains("opex"),
        build: opex_intent,
    },
    RoutingRule {
        name: "revenue",
        matches: |t| t.contains("revenue"),
        build: revenue_intent,
    },
];

fn revenue_intent(text: &str) -> Intent {
    Intent::RevenueVsBudget {
        month: extract_month(text),
    }
}

fn opex_intent(text: &str) -> Intent {
    Intent::OpexBreakdown {
        month: extract_month(text),
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// Intent router
pub struct IntentRouter;

impl IntentRouter {
    /// Route a question to an intent. Never fails: unmatched questions fall
    /// back to revenue vs budget for the latest month.
    pub fn route(question: &str) -> Intent {
        let text = question.to_lowercase();

        for rule in RULES {
            if (rule.matches)(&text) {
                let intent = (rule.build)(&text);
                debug!(rule = rule.name, intent = intent.name(), "Question routed");
                return intent;
            }
        }

        debug!("No routing rule matched, using default intent");
        Intent::default()
    }

    /// Rule names in evaluation order
    pub fn rule_names() -> Vec<&'static str> {
        RULES.iter().map(|rule| rule.name).collect()
    }
}

/// Shorthand for [`IntentRouter::route`]
pub fn route(question: &str) -> Intent {
    IntentRouter::route(question)
}

/// First "<month name> <yyyy>" in the text, e.g. "June 2025" or "sept 2024"
pub fn extract_month(text: &str) -> Option<Month> {
    let caps = MONTH_PATTERN.captures(text)?;
    let month = month_number(&caps[1].to_lowercase())?;
    let year = caps[2].parse().ok()?;

    Month::new(year, month)
}

fn month_number(prefix: &str) -> Option<u32> {
    let month = match prefix {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" | "sept" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Count from "last N month(s)"; `None` when absent or unparsable
pub fn extract_last_n(text: &str) -> Option<usize> {
    LAST_N_MONTHS
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> Option<Month> {
        Month::new(y, m)
    }

    #[test]
    fn test_revenue_with_budget_keywords() {
        let cases = vec![
            "What was June 2025 revenue vs budget in USD?",
            "revenue versus plan",
            "Show me revenue against budget",
        ];

        for c in cases {
            assert_eq!(IntentRouter::route(c).name(), "revenue_vs_budget", "{}", c);
        }

        assert_eq!(
            route("What was June 2025 revenue vs budget in USD?"),
            Intent::RevenueVsBudget {
                month: month(2025, 6)
            }
        );
    }

    #[test]
    fn test_month_extraction() {
        assert_eq!(extract_month("what was revenue in june 2025?"), month(2025, 6));
        assert_eq!(extract_month("What was revenue in June 2025?"), month(2025, 6));
        assert_eq!(extract_month("opex for Sept 2024"), month(2024, 9));
        assert_eq!(extract_month("opex for sep 2024"), month(2024, 9));
        assert_eq!(extract_month("JAN 2023 numbers"), month(2023, 1));
        assert_eq!(extract_month("What was revenue?"), None);
        assert_eq!(extract_month("june of 2025"), None);
    }

    #[test]
    fn test_revenue_without_month_is_latest() {
        assert_eq!(
            route("What was revenue?"),
            Intent::RevenueVsBudget { month: None }
        );
    }

    #[test]
    fn test_gross_margin_defaults_differ() {
        assert_eq!(
            route("Show gross margin"),
            Intent::GrossMarginTrend { last_n: 6 }
        );
        assert_eq!(
            route("gross margin trend last 4 months"),
            Intent::GrossMarginTrend { last_n: 4 }
        );
        assert_eq!(
            route("Show Gross Margin % trend"),
            Intent::GrossMarginTrend { last_n: 3 }
        );
        assert_eq!(
            route("gross margin for the last quarter"),
            Intent::GrossMarginTrend { last_n: 3 }
        );
        assert_eq!(
            route("gross margin last 1 month"),
            Intent::GrossMarginTrend { last_n: 1 }
        );
    }

    #[test]
    fn test_oversized_count_falls_back_to_default() {
        let q = "gross margin last 99999999999999999999999 months";
        assert_eq!(route(q), Intent::GrossMarginTrend { last_n: 3 });
    }

    #[test]
    fn test_opex_rules() {
        assert_eq!(
            route("Break down Opex by category for June 2025"),
            Intent::OpexBreakdown {
                month: month(2025, 6)
            }
        );
        assert_eq!(route("opex"), Intent::OpexBreakdown { month: None });
        assert_eq!(
            route("total opex in mar 2025"),
            Intent::OpexBreakdown {
                month: month(2025, 3)
            }
        );
    }

    #[test]
    fn test_runway_has_no_params() {
        for q in ["What is our cash runway right now?", "runway?", "RUNWAY"] {
            let intent = route(q);
            assert_eq!(intent, Intent::CashRunway {});
            assert_eq!(intent.params(), serde_json::json!({}));
        }
    }

    #[test]
    fn test_priority_order() {
        // revenue+budget beats runway
        assert_eq!(route("revenue budget and runway").name(), "revenue_vs_budget");
        // runway beats bare gross margin
        assert_eq!(route("gross margin and runway").name(), "cash_runway");
        // qualified gross margin beats runway
        assert_eq!(route("gross margin trend and runway").name(), "gross_margin_trend");
        // bare gross margin beats bare opex
        assert_eq!(
            route("gross margin and opex"),
            Intent::GrossMarginTrend { last_n: 6 }
        );
    }

    #[test]
    fn test_unmatched_defaults() {
        for q in ["", "hello there", "what's the weather like in may 2025"] {
            assert_eq!(route(q), Intent::RevenueVsBudget { month: None });
        }
    }

    #[test]
    fn test_rule_table_order() {
        assert_eq!(
            IntentRouter::rule_names(),
            vec![
                "revenue_vs_budget",
                "gross_margin_trend",
                "opex_breakdown",
                "cash_runway",
                "gross_margin",
                "opex",
                "revenue",
            ]
        );
    }
}
