//! # Bid Calculator
//!
//! Turns a [`RequirementSet`] into a priced [`Bid`]:
//!
//! 1. Each non-zero requirement is matched against the catalog's category
//!    index, preferring the project's material.
//! 2. Unmatched requirements become zero-cost placeholder lines and are
//!    listed in [`Bid::unpriced`]; the bid is still produced.
//! 3. Line costs are summed and rolled up with the [`MarkupConfig`].
//!
//! ## Example
//!
//! ```rust
//! use bid_core::calculator::estimate;
//! use bid_core::catalog::Catalog;
//! use bid_core::compliance::Standard;
//! use bid_core::config::MarkupConfig;
//! use bid_core::project::ProjectDescriptor;
//!
//! let project = ProjectDescriptor::new("Office", 35.0, 5000.0, 4, 300.0);
//! let bid = estimate(&project, Standard::Ul96a, &Catalog::empty(), &MarkupConfig::default()).unwrap();
//!
//! assert_eq!(bid.final_bid_amount(), 0.0);
//! assert!(!bid.is_complete());
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bid::{Bid, BidLineItem, Rollup, UnpricedRequirement};
use crate::catalog::Catalog;
use crate::compliance::{compute_requirements, Standard};
use crate::config::MarkupConfig;
use crate::errors::CalcResult;
use crate::project::ProjectDescriptor;
use crate::requirements::RequirementSet;

/// Price a requirement set against a catalog.
///
/// Fails only for an invalid markup configuration; a sparse or empty catalog
/// yields unpriced lines instead of an error.
pub fn calculate_bid(requirements: RequirementSet, catalog: &Catalog, config: &MarkupConfig) -> CalcResult<Bid> {
    config.validate()?;

    let preferred = Some(requirements.preferred_material);
    let mut line_items = Vec::with_capacity(requirements.len());
    let mut unpriced = Vec::new();

    for requirement in requirements.iter().filter(|r| r.quantity > 0.0) {
        let category = requirement.category;
        match catalog.find(category, preferred) {
            Some(item) => {
                if !requirement.unit.matches_label(&item.unit) {
                    warn!(
                        category = %category,
                        code = %item.code,
                        item_unit = %item.unit,
                        required_unit = %requirement.unit,
                        "catalog item is priced in a different unit than the requirement"
                    );
                }
                debug!(
                    category = %category,
                    code = %item.code,
                    quantity = requirement.quantity,
                    "requirement matched"
                );
                line_items.push(BidLineItem::priced(
                    category,
                    item,
                    requirement.quantity,
                    requirement.unit,
                    requirement.note.clone(),
                ));
            }
            None => {
                warn!(
                    category = %category,
                    quantity = requirement.quantity,
                    "no catalog item for requirement, emitting unpriced line"
                );
                line_items.push(BidLineItem::unpriced(
                    category,
                    requirement.quantity,
                    requirement.unit,
                    requirement.note.clone(),
                ));
                unpriced.push(UnpricedRequirement {
                    category,
                    quantity: requirement.quantity,
                    unit: requirement.unit,
                });
            }
        }
    }

    let material_subtotal: f64 = line_items.iter().map(|line| line.material_cost).sum();
    let labor_subtotal: f64 = line_items.iter().map(|line| line.labor_cost).sum();
    let rollup = Rollup::compute(material_subtotal, labor_subtotal, config);

    info!(
        project = %requirements.project_name,
        standard = %requirements.standard,
        lines = line_items.len(),
        unpriced = unpriced.len(),
        final_bid_amount = rollup.final_bid_amount,
        "bid calculated"
    );

    Ok(Bid {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        project_name: requirements.project_name,
        standard: requirements.standard,
        line_items,
        unpriced,
        markup: *config,
        rollup,
    })
}

/// Full pipeline: validate, derive requirements, price.
pub fn estimate(
    project: &ProjectDescriptor,
    standard: Standard,
    catalog: &Catalog,
    config: &MarkupConfig,
) -> CalcResult<Bid> {
    let requirements = compute_requirements(project, standard)?;
    calculate_bid(requirements, catalog, config)
}
