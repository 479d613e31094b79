//! Copilot facade - implements the question loop
//!
//! QUESTION → ROUTE → DISPATCH → SUMMARIZE

use crate::answer::summarize;
use crate::models::{Dataset, Intent, MetricResult};
use crate::router::IntentRouter;
use crate::tools::{create_default_registry, ToolRegistry};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Everything produced for one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub query_id: Uuid,
    pub question: String,
    pub intent: Intent,
    pub result: MetricResult,
    pub summary: String,
    pub execution_time_ms: u64,
}

/// Answers finance questions over one immutable dataset.
///
/// Holds no per-question state, so a single instance can serve concurrent
/// callers behind an `Arc`.
pub struct Copilot {
    dataset: Dataset,
    registry: ToolRegistry,
}

impl Copilot {
    pub fn new(dataset: Dataset, registry: ToolRegistry) -> Self {
        Self { dataset, registry }
    }

    pub fn with_default_tools(dataset: Dataset) -> Self {
        Self::new(dataset, create_default_registry())
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn route(&self, question: &str) -> Intent {
        IntentRouter::route(question)
    }

    /// Route a question, compute its metric and render the summary
    pub fn ask(&self, question: &str) -> Result<Answer> {
        let query_id = Uuid::new_v4();
        let start = Instant::now();

        let intent = self.route(question);
        info!(%query_id, intent = intent.name(), "Answering question");

        let result = self
            .registry
            .dispatch(&self.dataset, &intent)
            .inspect_err(|e| warn!(%query_id, error = %e, "Metric computation failed"))?;

        let summary = summarize(&intent, &result);
        let execution_time_ms = start.elapsed().as_millis() as u64;

        info!(%query_id, execution_time_ms, "Question answered");

        Ok(Answer {
            query_id,
            question: question.to_string(),
            intent,
            result,
            summary,
            execution_time_ms,
        })
    }

    /// Run a metric by intent name with an explicit parameter mapping
    pub fn run_metric(&self, name: &str, params: &Value) -> Result<MetricResult> {
        self.registry.execute(name, &self.dataset, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CopilotError;
    use crate::metrics::test_support::{month, sample_dataset};
    use serde_json::json;

    #[test]
    fn test_ask_routes_and_computes() {
        let copilot = Copilot::with_default_tools(sample_dataset());
        let answer = copilot.ask("What was March 2025 revenue vs budget?").unwrap();

        assert_eq!(
            answer.intent,
            Intent::RevenueVsBudget {
                month: Some(month(3))
            }
        );
        match &answer.result {
            MetricResult::RevenueVsBudget(report) => assert_eq!(report.month, month(3)),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(answer.summary.starts_with("**Revenue — Mar 2025**"));
    }

    #[test]
    fn test_each_intent_answers() {
        let copilot = Copilot::with_default_tools(sample_dataset());

        let cases = vec![
            ("gross margin trend last 2 months", "gross_margin_trend"),
            ("Break down opex by category", "opex_breakdown"),
            ("How long is our cash runway?", "cash_runway"),
            ("tell me something", "revenue_vs_budget"),
        ];

        for (question, kind) in cases {
            let answer = copilot.ask(question).unwrap();
            assert_eq!(answer.result.kind(), kind, "{}", question);
            assert!(!answer.summary.is_empty());
        }
    }

    #[test]
    fn test_repeated_questions_give_identical_results() {
        let copilot = Copilot::with_default_tools(sample_dataset());

        let first = copilot.ask("cash runway").unwrap();
        let second = copilot.ask("cash runway").unwrap();

        assert_eq!(first.result, second.result);
        assert_ne!(first.query_id, second.query_id);
    }

    #[test]
    fn test_empty_dataset_surfaces_error() {
        let copilot = Copilot::with_default_tools(Dataset::default());

        assert!(matches!(
            copilot.ask("What was revenue?"),
            Err(CopilotError::EmptyDataset)
        ));
        // trends over no months are just empty
        let answer = copilot.ask("gross margin").unwrap();
        assert_eq!(answer.result, MetricResult::GrossMarginTrend(vec![]));
    }

    #[test]
    fn test_run_metric_by_name() {
        let copilot = Copilot::with_default_tools(sample_dataset());
        let result = copilot
            .run_metric("opex_breakdown", &json!({ "month": "2025-01" }))
            .unwrap();

        match result {
            MetricResult::OpexBreakdown(rows) => {
                assert_eq!(rows[0].category, "Marketing");
                assert_eq!(rows.len(), 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
