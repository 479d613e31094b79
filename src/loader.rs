//! Fixture loader
//!
//! Reads the four tables from JSON files in a directory. Months may be written
//! as `YYYY-MM` or `YYYY-MM-DD`; both normalize to the first of the month.

use crate::error::CopilotError;
use crate::models::{CashRow, Dataset, FxRow, LedgerRow};
use crate::Result;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::info;

pub const ACTUALS_FILE: &str = "actuals.json";
pub const BUDGET_FILE: &str = "budget.json";
pub const CASH_FILE: &str = "cash.json";
pub const FX_FILE: &str = "fx.json";

/// Load `actuals`, `budget`, `cash` and `fx` from `dir`
pub fn load_dataset(dir: impl AsRef<Path>) -> Result<Dataset> {
    let dir = dir.as_ref();

    let actuals: Vec<LedgerRow> = read_table(dir, ACTUALS_FILE)?;
    let budget: Vec<LedgerRow> = read_table(dir, BUDGET_FILE)?;
    let cash: Vec<CashRow> = read_table(dir, CASH_FILE)?;
    let fx: Vec<FxRow> = read_table(dir, FX_FILE)?;

    info!(
        dir = %dir.display(),
        actuals = actuals.len(),
        budget = budget.len(),
        cash = cash.len(),
        fx = fx.len(),
        "Dataset loaded"
    );

    Ok(Dataset::new(actuals, budget, cash, fx))
}

fn read_table<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>> {
    let path = dir.join(file);

    let raw = fs::read_to_string(&path).map_err(|e| {
        CopilotError::DataLoad(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        CopilotError::DataLoad(format!("Failed to parse {}: {}", path.display(), e))
    })
}
