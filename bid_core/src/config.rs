//! # Markup Configuration
//!
//! Percentages applied on top of raw material and labor cost. The config is a
//! plain value passed into every bid calculation, so two calculations running
//! side by side can use different settings.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

pub const DEFAULT_MATERIAL_MARKUP_PCT: f64 = 15.0;
pub const DEFAULT_LABOR_MARKUP_PCT: f64 = 20.0;
pub const DEFAULT_OVERHEAD_PCT: f64 = 10.0;
pub const DEFAULT_PROFIT_PCT: f64 = 10.0;

/// Markup, overhead and profit percentages (15 means 15%).
///
/// ## JSON Example
///
/// ```json
/// {
///   "material_markup_pct": 15.0,
///   "labor_markup_pct": 20.0,
///   "overhead_pct": 10.0,
///   "profit_pct": 10.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    pub material_markup_pct: f64,
    pub labor_markup_pct: f64,
    pub overhead_pct: f64,
    pub profit_pct: f64,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        MarkupConfig {
            material_markup_pct: DEFAULT_MATERIAL_MARKUP_PCT,
            labor_markup_pct: DEFAULT_LABOR_MARKUP_PCT,
            overhead_pct: DEFAULT_OVERHEAD_PCT,
            profit_pct: DEFAULT_PROFIT_PCT,
        }
    }
}

impl MarkupConfig {
    /// All percentages zero: the bid equals raw cost.
    pub fn at_cost() -> Self {
        MarkupConfig {
            material_markup_pct: 0.0,
            labor_markup_pct: 0.0,
            overhead_pct: 0.0,
            profit_pct: 0.0,
        }
    }

    pub fn with_material_markup(mut self, pct: f64) -> Self {
        self.material_markup_pct = pct;
        self
    }

    pub fn with_labor_markup(mut self, pct: f64) -> Self {
        self.labor_markup_pct = pct;
        self
    }

    pub fn with_overhead(mut self, pct: f64) -> Self {
        self.overhead_pct = pct;
        self
    }

    pub fn with_profit(mut self, pct: f64) -> Self {
        self.profit_pct = pct;
        self
    }

    /// Every percentage must be finite and non-negative.
    pub fn validate(&self) -> CalcResult<()> {
        let fields = [
            ("material_markup_pct", self.material_markup_pct),
            ("labor_markup_pct", self.labor_markup_pct),
            ("overhead_pct", self.overhead_pct),
            ("profit_pct", self.profit_pct),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Percentage must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}
