//! # Batch Estimation
//!
//! Runs many projects against one shared, read-only catalog. Each project is
//! an independent unit of work: one failing project does not affect the
//! others, and results come back in input order.
//!
//! With the `parallel` feature the units run on rayon's thread pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use crate::bid::Bid;
use crate::calculator::estimate;
use crate::catalog::Catalog;
use crate::compliance::Standard;
use crate::config::MarkupConfig;
use crate::errors::CalcResult;
use crate::project::ProjectDescriptor;

/// Estimate every `(project, standard)` pair.
pub fn estimate_all(
    jobs: &[(ProjectDescriptor, Standard)],
    catalog: &Catalog,
    config: &MarkupConfig,
) -> Vec<CalcResult<Bid>> {
    let run = |(project, standard): &(ProjectDescriptor, Standard)| estimate(project, *standard, catalog, config);

    #[cfg(feature = "parallel")]
    let results: Vec<CalcResult<Bid>> = jobs.par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<CalcResult<Bid>> = jobs.iter().map(run).collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(jobs = jobs.len(), failed, "batch estimate finished");
    results
}

/// Compare both standards for one project.
pub fn compare_standards(
    project: &ProjectDescriptor,
    catalog: &Catalog,
    config: &MarkupConfig,
) -> CalcResult<Vec<Bid>> {
    let jobs: Vec<_> = Standard::ALL.iter().map(|s| (project.clone(), *s)).collect();
    estimate_all(&jobs, catalog, config).into_iter().collect()
}
