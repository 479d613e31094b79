//! Metric tool trait and registry
//!
//! Tools are deterministic, side-effect-free wrappers around the metrics
//! engine. Each one reads its parameters from the JSON mapping carried by an
//! [`Intent`] and returns a [`MetricResult`].

use crate::error::CopilotError;
use crate::metrics;
use crate::models::{Dataset, Intent, MetricResult, Month};
use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// `last_n` used when a gross margin request carries no count
const DEFAULT_LAST_N: usize = 3;

/// Trait for a single metric tool (deterministic execution)
pub trait MetricTool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn execute(&self, dataset: &Dataset, params: &Value) -> Result<MetricResult>;
}

/// Tool registry for looking up and executing tools by intent name
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn MetricTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn MetricTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn MetricTool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Run the tool registered under `name` with a raw parameter mapping
    pub fn execute(&self, name: &str, dataset: &Dataset, params: &Value) -> Result<MetricResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| CopilotError::ToolNotFound(name.to_string()))?;

        debug!(tool = name, %params, "Executing metric tool");
        tool.execute(dataset, params)
    }

    /// Dispatch an intent to the tool matching its name
    pub fn dispatch(&self, dataset: &Dataset, intent: &Intent) -> Result<MetricResult> {
        self.execute(intent.name(), dataset, &intent.params())
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_object_parameters(params: &Value) -> Result<()> {
    if params.is_object() || params.is_null() {
        Ok(())
    } else {
        Err(CopilotError::InvalidParameter(
            "params must be a JSON object".to_string(),
        ))
    }
}

/// Optional `month` param: absent or null means latest month
fn month_param(params: &Value) -> Result<Option<Month>> {
    match params.get("month") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => raw.parse::<Month>().map(Some),
        Some(other) => Err(CopilotError::InvalidParameter(format!(
            "'month' must be a YYYY-MM string, got {}",
            other
        ))),
    }
}

fn last_n_param(params: &Value) -> Result<usize> {
    match params.get("last_n") {
        None | Some(Value::Null) => Ok(DEFAULT_LAST_N),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                CopilotError::InvalidParameter(format!(
                    "'last_n' must be a non-negative integer, got {}",
                    value
                ))
            }),
    }
}

pub struct RevenueVsBudgetTool;

impl MetricTool for RevenueVsBudgetTool {
    fn name(&self) -> &'static str {
        "revenue_vs_budget"
    }

    fn description(&self) -> &'static str {
        "Actual vs budgeted revenue for a month, converted to USD"
    }

    fn execute(&self, dataset: &Dataset, params: &Value) -> Result<MetricResult> {
        ensure_object_parameters(params)?;
        let month = month_param(params)?;
        metrics::revenue_vs_budget(dataset, month).map(MetricResult::RevenueVsBudget)
    }
}

pub struct GrossMarginTrendTool;

impl MetricTool for GrossMarginTrendTool {
    fn name(&self) -> &'static str {
        "gross_margin_trend"
    }

    fn description(&self) -> &'static str {
        "Gross margin % for the most recent N months"
    }

    fn execute(&self, dataset: &Dataset, params: &Value) -> Result<MetricResult> {
        ensure_object_parameters(params)?;
        let last_n = last_n_param(params)?;
        Ok(MetricResult::GrossMarginTrend(metrics::gross_margin_trend(
            dataset, last_n,
        )))
    }
}

pub struct OpexBreakdownTool;

impl MetricTool for OpexBreakdownTool {
    fn name(&self) -> &'static str {
        "opex_breakdown"
    }

    fn description(&self) -> &'static str {
        "Opex by category for a month, highest spend first"
    }

    fn execute(&self, dataset: &Dataset, params: &Value) -> Result<MetricResult> {
        ensure_object_parameters(params)?;
        let month = month_param(params)?;
        metrics::opex_breakdown(dataset, month).map(MetricResult::OpexBreakdown)
    }
}

pub struct CashRunwayTool;

impl MetricTool for CashRunwayTool {
    fn name(&self) -> &'static str {
        "cash_runway"
    }

    fn description(&self) -> &'static str {
        "Months of cash left at the recent average net burn"
    }

    fn execute(&self, dataset: &Dataset, params: &Value) -> Result<MetricResult> {
        ensure_object_parameters(params)?;
        metrics::cash_runway(dataset).map(MetricResult::CashRunway)
    }
}

/// Create a registry with one tool per supported intent
pub fn create_default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(RevenueVsBudgetTool));
    registry.register(Arc::new(GrossMarginTrendTool));
    registry.register(Arc::new(OpexBreakdownTool));
    registry.register(Arc::new(CashRunwayTool));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::{month, sample_dataset};
    use crate::models::SUPPORTED_INTENTS;
    use serde_json::json;

    #[test]
    fn test_registry_covers_every_intent() {
        let registry = create_default_registry();

        let mut expected = SUPPORTED_INTENTS.to_vec();
        expected.sort_unstable();
        assert_eq!(registry.list(), expected);
    }

    #[test]
    fn test_dispatch_matches_intent() {
        let registry = create_default_registry();
        let dataset = sample_dataset();

        let intents = vec![
            Intent::RevenueVsBudget { month: None },
            Intent::GrossMarginTrend { last_n: 2 },
            Intent::OpexBreakdown { month: Some(month(1)) },
            Intent::CashRunway {},
        ];

        for intent in intents {
            let result = registry.dispatch(&dataset, &intent).unwrap();
            assert_eq!(result.kind(), intent.name());
        }
    }

    #[test]
    fn test_dispatch_same_as_direct_call() {
        let registry = create_default_registry();
        let dataset = sample_dataset();

        let via_registry = registry
            .dispatch(&dataset, &Intent::GrossMarginTrend { last_n: 2 })
            .unwrap();
        assert_eq!(
            via_registry,
            MetricResult::GrossMarginTrend(metrics::gross_margin_trend(&dataset, 2))
        );
    }

    #[test]
    fn test_unknown_tool() {
        let registry = create_default_registry();
        let err = registry
            .execute("ebitda", &sample_dataset(), &json!({}))
            .unwrap_err();

        assert!(matches!(err, CopilotError::ToolNotFound(name) if name == "ebitda"));
    }

    #[test]
    fn test_param_parsing() {
        let registry = create_default_registry();
        let dataset = sample_dataset();

        let result = registry
            .execute("revenue_vs_budget", &dataset, &json!({ "month": "2025-02" }))
            .unwrap();
        match result {
            MetricResult::RevenueVsBudget(report) => assert_eq!(report.month, month(2)),
            other => panic!("unexpected result: {:?}", other),
        }

        // missing last_n falls back to 3
        let result = registry
            .execute("gross_margin_trend", &dataset, &json!({}))
            .unwrap();
        match result {
            MetricResult::GrossMarginTrend(rows) => assert_eq!(rows.len(), 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_bad_params_rejected() {
        let registry = create_default_registry();
        let dataset = sample_dataset();

        assert!(matches!(
            registry.execute("opex_breakdown", &dataset, &json!({ "month": "June" })),
            Err(CopilotError::InvalidMonth(_))
        ));
        assert!(matches!(
            registry.execute("opex_breakdown", &dataset, &json!({ "month": 6 })),
            Err(CopilotError::InvalidParameter(_))
        ));
        assert!(matches!(
            registry.execute("gross_margin_trend", &dataset, &json!({ "last_n": -1 })),
            Err(CopilotError::InvalidParameter(_))
        ));
        assert!(matches!(
            registry.execute("cash_runway", &dataset, &json!([1, 2])),
            Err(CopilotError::InvalidParameter(_))
        ));
    }
}
