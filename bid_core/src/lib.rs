//! # bid_core - Lightning Protection Bid Engine
//!
//! `bid_core` turns building geometry and a parts price list into a priced,
//! code-compliant bill of materials for lightning protection systems.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **No silent gaps**: Requirements the catalog cannot price are reported
//!   on the bid, never dropped
//!
//! ## Quick Start
//!
//! ```rust
//! use bid_core::{estimate, Catalog, MarkupConfig, PriceItem, ProjectDescriptor, Standard};
//!
//! let project = ProjectDescriptor::new("Sample Office", 35.0, 5000.0, 4, 300.0);
//! let catalog = Catalog::new(vec![
//!     PriceItem::new("AT-001", "Air Terminal - Copper", "ea", 45.0, 15.0),
//!     PriceItem::new("COND-100", "Conductor Cable - Copper", "ft", 3.5, 2.0),
//!     PriceItem::new("GR-10", "Ground Rod - 10ft Copper", "ea", 65.0, 50.0),
//!     PriceItem::new("CLAMP-01", "Cable Clamp", "ea", 8.0, 5.0),
//! ]).unwrap();
//!
//! let bid = estimate(&project, Standard::Ul96a, &catalog, &MarkupConfig::default()).unwrap();
//! assert!(bid.is_complete());
//! assert!(bid.final_bid_amount() > bid.material_subtotal());
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Building descriptor and partial input
//! - [`compliance`] - UL 96A / NFPA 780 rule engine
//! - [`requirements`] - Requirement sets passed from rules to calculator
//! - [`catalog`] - Price items and category index
//! - [`calculator`] - Matching and cost rollup
//! - [`bid`] - Bid output types
//! - [`config`] - Markup configuration
//! - [`job`], [`file_io`] - Job files and atomic JSON saves
//! - [`batch`] - Many projects against one catalog
//! - [`errors`] - Structured error types

pub mod batch;
pub mod bid;
pub mod calculator;
pub mod catalog;
pub mod compliance;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod job;
pub mod project;
pub mod requirements;

// Re-export commonly used types at crate root for convenience
pub use bid::{Bid, BidLineItem, BidSummary, UnpricedRequirement};
pub use calculator::{calculate_bid, estimate};
pub use catalog::{Catalog, PriceItem};
pub use compliance::{compute_requirements, ComplianceRules, Standard};
pub use config::MarkupConfig;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_job, save_bid, save_job};
pub use job::BidJob;
pub use project::{Material, ProjectDescriptor, ProjectInput, SoilType, StructureType};
pub use requirements::{ElementCategory, Requirement, RequirementSet};
