//! # Bid Jobs
//!
//! A `BidJob` bundles everything one estimate needs: the (possibly partial)
//! project data, the standard identifier, the price list and optional markup
//! overrides. Jobs serialize to `.lpb` JSON files (see [`crate::file_io`]).
//!
//! The standard and the project are stored as loosely as they arrive from
//! upstream tools; [`BidJob::resolve`] turns them into validated types and
//! reports the first problem it finds.
//!
//! ## Example
//!
//! ```rust
//! use bid_core::job::BidJob;
//! use bid_core::project::ProjectDescriptor;
//!
//! let project = ProjectDescriptor::new("Office", 35.0, 5000.0, 4, 300.0);
//! let job = BidJob::new(&project, "NFPA 780", Vec::new());
//!
//! let bid = job.run().unwrap();
//! assert_eq!(bid.unpriced.len(), bid.line_items.len());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bid::Bid;
use crate::calculator::estimate;
use crate::catalog::{Catalog, PriceItem};
use crate::compliance::Standard;
use crate::config::MarkupConfig;
use crate::errors::CalcResult;
use crate::project::{ProjectDescriptor, ProjectInput};

/// Current schema version for .lpb files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Serialized estimate request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidJob {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub created: DateTime<Utc>,

    pub project: ProjectInput,

    /// Standard identifier as written by the user ("UL 96A", "nfpa780", ...)
    pub standard: String,

    #[serde(default)]
    pub catalog: Vec<PriceItem>,

    /// Overrides for the default markup; `None` means defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<MarkupConfig>,
}

/// A job whose inputs have all been validated.
#[derive(Debug, Clone)]
pub struct ResolvedJob {
    pub project: ProjectDescriptor,
    pub standard: Standard,
    pub catalog: Catalog,
    pub markup: MarkupConfig,
}

impl BidJob {
    pub fn new(project: &ProjectDescriptor, standard: impl Into<String>, catalog: Vec<PriceItem>) -> Self {
        BidJob {
            version: SCHEMA_VERSION.to_string(),
            created: Utc::now(),
            project: ProjectInput::from(project),
            standard: standard.into(),
            catalog,
            markup: None,
        }
    }

    pub fn with_markup(mut self, markup: MarkupConfig) -> Self {
        self.markup = Some(markup);
        self
    }

    /// Validate the standard, project, catalog and markup, in that order.
    pub fn resolve(&self) -> CalcResult<ResolvedJob> {
        let standard: Standard = self.standard.parse()?;
        let project = ProjectDescriptor::try_from(self.project.clone())?;
        let catalog = Catalog::new(self.catalog.clone())?;
        let markup = self.markup.unwrap_or_default();
        markup.validate()?;
        Ok(ResolvedJob {
            project,
            standard,
            catalog,
            markup,
        })
    }

    /// Resolve and estimate with the job's own markup.
    pub fn run(&self) -> CalcResult<Bid> {
        self.resolve()?.run()
    }
}

impl ResolvedJob {
    pub fn run(&self) -> CalcResult<Bid> {
        estimate(&self.project, self.standard, &self.catalog, &self.markup)
    }

    /// Estimate with a markup supplied by the caller instead of the job's.
    pub fn run_with(&self, markup: &MarkupConfig) -> CalcResult<Bid> {
        estimate(&self.project, self.standard, &self.catalog, markup)
    }
}
