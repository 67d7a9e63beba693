//! # Bid Output
//!
//! A [`Bid`] is built once by the calculator and handed to export adapters.
//! Every figure is kept at full precision; [`round_currency`] and
//! [`Bid::summary`] are the only places where cents rounding happens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::PriceItem;
use crate::compliance::Standard;
use crate::config::MarkupConfig;
use crate::requirements::{ElementCategory, Unit};

/// Round a dollar amount to cents for presentation.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// One row of the bid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidLineItem {
    pub category: ElementCategory,

    /// Matched catalog item; `None` for an unpriced placeholder
    pub price_item: Option<PriceItem>,

    pub quantity: f64,

    pub unit: Unit,

    /// quantity × unit_price
    pub material_cost: f64,

    /// quantity × labor_rate
    pub labor_cost: f64,

    pub line_total: f64,

    /// Why the line is needed (rule note from the requirement)
    pub note: String,
}

impl BidLineItem {
    pub fn priced(category: ElementCategory, item: &PriceItem, quantity: f64, unit: Unit, note: impl Into<String>) -> Self {
        let material_cost = quantity * item.unit_price;
        let labor_cost = quantity * item.labor_rate;
        BidLineItem {
            category,
            price_item: Some(item.clone()),
            quantity,
            unit,
            material_cost,
            labor_cost,
            line_total: material_cost + labor_cost,
            note: note.into(),
        }
    }

    pub fn unpriced(category: ElementCategory, quantity: f64, unit: Unit, note: impl Into<String>) -> Self {
        BidLineItem {
            category,
            price_item: None,
            quantity,
            unit,
            material_cost: 0.0,
            labor_cost: 0.0,
            line_total: 0.0,
            note: note.into(),
        }
    }

    pub fn is_unpriced(&self) -> bool {
        self.price_item.is_none()
    }

    pub fn section(&self) -> &'static str {
        self.category.section()
    }

    /// Item name, or a placeholder label for unpriced lines
    pub fn description(&self) -> String {
        match &self.price_item {
            Some(item) => format!("{} ({})", item.name, item.code),
            None => format!("UNPRICED: {} (no catalog match)", self.category),
        }
    }
}

/// A requirement the catalog could not price. Reported, never raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnpricedRequirement {
    pub category: ElementCategory,
    pub quantity: f64,
    pub unit: Unit,
}

/// The rollup from raw subtotals to the final amount.
///
/// Steps run in a fixed order: markup on each subtotal, overhead on the
/// marked-up subtotal, profit on subtotal plus overhead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rollup {
    pub material_subtotal: f64,
    pub labor_subtotal: f64,
    pub marked_up_material: f64,
    pub marked_up_labor: f64,
    pub subtotal: f64,
    pub overhead_amount: f64,
    pub profit_amount: f64,
    pub final_bid_amount: f64,
}

impl Rollup {
    pub fn compute(material_subtotal: f64, labor_subtotal: f64, config: &MarkupConfig) -> Self {
        let marked_up_material = material_subtotal * (1.0 + config.material_markup_pct / 100.0);
        let marked_up_labor = labor_subtotal * (1.0 + config.labor_markup_pct / 100.0);
        let subtotal = marked_up_material + marked_up_labor;
        let overhead_amount = subtotal * (config.overhead_pct / 100.0);
        let profit_amount = (subtotal + overhead_amount) * (config.profit_pct / 100.0);
        let final_bid_amount = subtotal + overhead_amount + profit_amount;
        Rollup {
            material_subtotal,
            labor_subtotal,
            marked_up_material,
            marked_up_labor,
            subtotal,
            overhead_amount,
            profit_amount,
            final_bid_amount,
        }
    }
}

/// Material/labor totals for one bid section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTotal {
    pub name: String,
    pub material: f64,
    pub labor: f64,
    pub total: f64,
}

/// Fully priced bid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub project_name: String,
    pub standard: Standard,

    /// Lines in requirement category order
    pub line_items: Vec<BidLineItem>,

    /// Requirements with no catalog match
    pub unpriced: Vec<UnpricedRequirement>,

    pub markup: MarkupConfig,

    #[serde(flatten)]
    pub rollup: Rollup,
}

impl Bid {
    pub fn material_subtotal(&self) -> f64 {
        self.rollup.material_subtotal
    }

    pub fn labor_subtotal(&self) -> f64 {
        self.rollup.labor_subtotal
    }

    pub fn final_bid_amount(&self) -> f64 {
        self.rollup.final_bid_amount
    }

    /// True when every requirement was priced from the catalog
    pub fn is_complete(&self) -> bool {
        self.unpriced.is_empty()
    }

    pub fn unpriced_count(&self) -> usize {
        self.line_items.iter().filter(|line| line.is_unpriced()).count()
    }

    /// Section totals in order of first appearance.
    pub fn section_totals(&self) -> Vec<SectionTotal> {
        let mut sections: Vec<SectionTotal> = Vec::new();
        for line in &self.line_items {
            let name = line.section();
            let idx = match sections.iter().position(|s| s.name == name) {
                Some(idx) => idx,
                None => {
                    sections.push(SectionTotal {
                        name: name.to_string(),
                        material: 0.0,
                        labor: 0.0,
                        total: 0.0,
                    });
                    sections.len() - 1
                }
            };
            let section = &mut sections[idx];
            section.material += line.material_cost;
            section.labor += line.labor_cost;
            section.total += line.line_total;
        }
        sections
    }

    /// Subtotals equal the sum of their line items (within float tolerance).
    pub fn is_consistent(&self) -> bool {
        let material: f64 = self.line_items.iter().map(|l| l.material_cost).sum();
        let labor: f64 = self.line_items.iter().map(|l| l.labor_cost).sum();
        let close = |a: f64, b: f64| (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0);
        close(material, self.rollup.material_subtotal) && close(labor, self.rollup.labor_subtotal)
    }

    /// Cents-rounded figures for rendering.
    pub fn summary(&self) -> BidSummary {
        let r = &self.rollup;
        BidSummary {
            project_name: self.project_name.clone(),
            standard: self.standard,
            line_count: self.line_items.len(),
            unpriced_count: self.unpriced.len(),
            material_subtotal: round_currency(r.material_subtotal),
            labor_subtotal: round_currency(r.labor_subtotal),
            marked_up_material: round_currency(r.marked_up_material),
            marked_up_labor: round_currency(r.marked_up_labor),
            subtotal: round_currency(r.subtotal),
            overhead_amount: round_currency(r.overhead_amount),
            profit_amount: round_currency(r.profit_amount),
            final_bid_amount: round_currency(r.final_bid_amount),
        }
    }
}

/// Presentation view of a bid, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidSummary {
    pub project_name: String,
    pub standard: Standard,
    pub line_count: usize,
    pub unpriced_count: usize,
    pub material_subtotal: f64,
    pub labor_subtotal: f64,
    pub marked_up_material: f64,
    pub marked_up_labor: f64,
    pub subtotal: f64,
    pub overhead_amount: f64,
    pub profit_amount: f64,
    pub final_bid_amount: f64,
}
