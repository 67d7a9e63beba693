//! # LightningBid CLI
//!
//! Command-line front end for `bid_core`: loads a job file, runs the
//! compliance rules and the bid calculator, prints a summary and optionally
//! writes the bid as JSON for the spreadsheet/PDF exporters.

mod config;
mod demo;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bid_core::bid::round_currency;
use bid_core::job::ResolvedJob;
use bid_core::requirements::RequirementDetail;
use bid_core::{file_io, Bid, BidJob, Catalog, MarkupConfig, RequirementSet, Standard};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::config::{MarkupOverrides, Settings};

#[derive(Parser)]
#[command(name = "lightningbid")]
#[command(version)]
#[command(about = "Lightning protection bid generator (UL 96A / NFPA 780)", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the compliance requirements for a job without pricing them
    Requirements {
        /// Path to the .lpb job file
        job: PathBuf,
        /// Override the job's standard ("UL 96A" or "NFPA 780")
        #[arg(long)]
        standard: Option<String>,
        /// Print the requirement set as JSON
        #[arg(long)]
        json: bool,
    },
    /// Price a job and print the bid
    Bid {
        /// Path to the .lpb job file
        job: PathBuf,
        /// Override the job's standard ("UL 96A" or "NFPA 780")
        #[arg(long)]
        standard: Option<String>,
        /// Write the full bid as JSON to this path
        #[arg(long, short)]
        out: Option<PathBuf>,
        /// Print the bid as JSON instead of the table
        #[arg(long)]
        json: bool,
        /// Exit with status 2 when any requirement is unpriced
        #[arg(long)]
        strict: bool,
        #[command(flatten)]
        markup: MarkupArgs,
    },
    /// Price the job under both standards side by side
    Compare {
        /// Path to the .lpb job file
        job: PathBuf,
        #[command(flatten)]
        markup: MarkupArgs,
    },
    /// Run the built-in sample project and catalog
    Demo {
        #[arg(long, default_value = "UL 96A")]
        standard: String,
    },
    /// Write a sample job file to start from
    NewJob {
        path: PathBuf,
        #[arg(long, default_value = "UL 96A")]
        standard: String,
    },
}

#[derive(Args, Debug, Default)]
struct MarkupArgs {
    /// Material markup percentage
    #[arg(long, value_name = "PCT")]
    material_markup: Option<f64>,
    /// Labor markup percentage
    #[arg(long, value_name = "PCT")]
    labor_markup: Option<f64>,
    /// Overhead percentage
    #[arg(long, value_name = "PCT")]
    overhead: Option<f64>,
    /// Profit percentage
    #[arg(long, value_name = "PCT")]
    profit: Option<f64>,
}

impl From<&MarkupArgs> for MarkupOverrides {
    fn from(args: &MarkupArgs) -> Self {
        MarkupOverrides {
            material_markup_pct: args.material_markup,
            labor_markup_pct: args.labor_markup,
            overhead_pct: args.overhead,
            profit_pct: args.profit,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    logging::init_logging(settings.env, cli.log_json);

    match run(cli.command, &settings) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(core) = e.downcast_ref::<bid_core::CalcError>() {
                if let Ok(json) = serde_json::to_string_pretty(core) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            std::process::exit(1);
        }
    }
}

fn run(command: Commands, settings: &Settings) -> Result<i32> {
    match command {
        Commands::Requirements { job, standard, json } => {
            let resolved = load_resolved(&job, standard.as_deref())?;
            let reqs = bid_core::compute_requirements(&resolved.project, resolved.standard)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reqs)?);
            } else {
                print_requirements(&reqs);
            }
            Ok(0)
        }
        Commands::Bid {
            job,
            standard,
            out,
            json,
            strict,
            markup,
        } => {
            let resolved = load_resolved(&job, standard.as_deref())?;
            let config = effective_markup(resolved.markup, settings, &markup);
            let bid = resolved.run_with(&config)?;

            if let Some(out) = out {
                file_io::save_bid(&bid, &out).with_context(|| format!("writing bid to {}", out.display()))?;
                info!(path = %out.display(), "bid written");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&bid)?);
            } else {
                print_bid(&bid);
            }

            if strict && !bid.is_complete() {
                warn!(unpriced = bid.unpriced.len(), "bid incomplete");
                return Ok(2);
            }
            Ok(0)
        }
        Commands::Compare { job, markup } => {
            let resolved = load_resolved(&job, None)?;
            let config = effective_markup(resolved.markup, settings, &markup);
            let bids = bid_core::batch::compare_standards(&resolved.project, &resolved.catalog, &config)?;
            print_comparison(&bids);
            Ok(0)
        }
        Commands::Demo { standard } => {
            let standard: Standard = standard.parse()?;
            let catalog = Catalog::new(demo::sample_catalog())?;
            let config = settings.markup.apply(MarkupConfig::default());
            let bid = bid_core::estimate(&demo::sample_project(), standard, &catalog, &config)?;
            print_bid(&bid);
            Ok(0)
        }
        Commands::NewJob { path, standard } => {
            let job = BidJob::new(&demo::sample_project(), standard, demo::sample_catalog())
                .with_markup(MarkupConfig::default());
            // Parse before saving so a typo in the standard fails here
            job.resolve()?;
            file_io::save_job(&job, &path).with_context(|| format!("writing job to {}", path.display()))?;
            println!("Wrote sample job to {}", path.display());
            Ok(0)
        }
    }
}

fn load_resolved(path: &Path, standard: Option<&str>) -> Result<ResolvedJob> {
    let mut job = file_io::load_job(path).with_context(|| format!("loading job {}", path.display()))?;
    if let Some(standard) = standard {
        job.standard = standard.to_string();
    }
    Ok(job.resolve()?)
}

fn effective_markup(job_markup: MarkupConfig, settings: &Settings, args: &MarkupArgs) -> MarkupConfig {
    settings.markup.merged_with(&MarkupOverrides::from(args)).apply(job_markup)
}

fn print_requirements(reqs: &RequirementSet) {
    println!("═══════════════════════════════════════");
    println!("  {} REQUIREMENTS", reqs.standard);
    println!("  {}", reqs.project_name);
    println!("═══════════════════════════════════════");
    for req in reqs {
        println!("  {:<20} {:>10.1} {}", req.category, req.quantity, req.unit);
        match &req.detail {
            RequirementDetail::AirTerminals { corners, edges, field, .. } => {
                println!("      corners {}, edges {}, field {}", corners, edges, field);
            }
            RequirementDetail::Conductors { down_conductors, .. } => {
                println!("      {} down conductors", down_conductors);
            }
            RequirementDetail::GroundRods {
                rod_depth_ft,
                ground_ring,
                ..
            } => {
                println!("      {} ft depth{}", rod_depth_ft, if *ground_ring { ", ground ring" } else { "" });
            }
            RequirementDetail::Bonding { connections, wire_size_awg } => {
                println!("      {} connections, #{} AWG", connections, wire_size_awg);
            }
            RequirementDetail::Fittings { .. } => {}
        }
        println!("      {}", req.note);
    }
}

fn print_bid(bid: &Bid) {
    let s = bid.summary();
    println!("═══════════════════════════════════════");
    println!("  BID: {}", s.project_name);
    println!("  Standard: {}", s.standard);
    println!("═══════════════════════════════════════");
    println!();
    for section in bid.section_totals() {
        println!("{}  (${:.2})", section.name, round_currency(section.total));
        for line in bid.line_items.iter().filter(|l| l.section() == section.name) {
            println!(
                "  {:<45} {:>9.1} {:<3} mat ${:>10.2}  lab ${:>10.2}",
                line.description(),
                line.quantity,
                line.unit,
                round_currency(line.material_cost),
                round_currency(line.labor_cost)
            );
        }
    }
    println!();
    println!("  Material subtotal:  ${:>12.2}", s.material_subtotal);
    println!("  Labor subtotal:     ${:>12.2}", s.labor_subtotal);
    println!("  Marked-up material: ${:>12.2}", s.marked_up_material);
    println!("  Marked-up labor:    ${:>12.2}", s.marked_up_labor);
    println!("  Subtotal:           ${:>12.2}", s.subtotal);
    println!("  Overhead:           ${:>12.2}", s.overhead_amount);
    println!("  Profit:             ${:>12.2}", s.profit_amount);
    println!("═══════════════════════════════════════");
    println!("  FINAL BID:          ${:>12.2}", s.final_bid_amount);
    println!("═══════════════════════════════════════");

    if !bid.unpriced.is_empty() {
        println!();
        println!("[WARN] {} requirement(s) had no catalog match:", bid.unpriced.len());
        for gap in &bid.unpriced {
            println!("  - {} ({:.1} {})", gap.category, gap.quantity, gap.unit);
        }
    }
}

fn print_comparison(bids: &[Bid]) {
    println!("{:<10} {:>8} {:>14} {:>10}", "Standard", "Lines", "Final bid", "Unpriced");
    for bid in bids {
        println!(
            "{:<10} {:>8} {:>14.2} {:>10}",
            bid.standard.code(),
            bid.line_items.len(),
            round_currency(bid.final_bid_amount()),
            bid.unpriced.len()
        );
    }
}
