//! Environment-driven settings for the CLI.
//!
//! Markup precedence, lowest to highest: built-in defaults, the job file,
//! `LIGHTNINGBID_*` environment variables, command-line flags.

use std::env;

use anyhow::{Context, Result};
use bid_core::MarkupConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

/// Individual markup percentages that replace the job's values when set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarkupOverrides {
    pub material_markup_pct: Option<f64>,
    pub labor_markup_pct: Option<f64>,
    pub overhead_pct: Option<f64>,
    pub profit_pct: Option<f64>,
}

impl MarkupOverrides {
    pub fn apply(&self, base: MarkupConfig) -> MarkupConfig {
        MarkupConfig {
            material_markup_pct: self.material_markup_pct.unwrap_or(base.material_markup_pct),
            labor_markup_pct: self.labor_markup_pct.unwrap_or(base.labor_markup_pct),
            overhead_pct: self.overhead_pct.unwrap_or(base.overhead_pct),
            profit_pct: self.profit_pct.unwrap_or(base.profit_pct),
        }
    }

    /// `other` wins wherever it is set.
    pub fn merged_with(&self, other: &MarkupOverrides) -> MarkupOverrides {
        MarkupOverrides {
            material_markup_pct: other.material_markup_pct.or(self.material_markup_pct),
            labor_markup_pct: other.labor_markup_pct.or(self.labor_markup_pct),
            overhead_pct: other.overhead_pct.or(self.overhead_pct),
            profit_pct: other.profit_pct.or(self.profit_pct),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub markup: MarkupOverrides,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::parse(&env::var("LIGHTNINGBID_ENV").unwrap_or_else(|_| "dev".to_string()));
        let markup = MarkupOverrides {
            material_markup_pct: pct_var("LIGHTNINGBID_MATERIAL_MARKUP_PCT")?,
            labor_markup_pct: pct_var("LIGHTNINGBID_LABOR_MARKUP_PCT")?,
            overhead_pct: pct_var("LIGHTNINGBID_OVERHEAD_PCT")?,
            profit_pct: pct_var("LIGHTNINGBID_PROFIT_PCT")?,
        };
        Ok(Settings { env, markup })
    }
}

fn pct_var(name: &str) -> Result<Option<f64>> {
    match env::var(name) {
        Ok(raw) => parse_pct(&raw).with_context(|| format!("{} must be a number", name)).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_pct(raw: &str) -> Result<f64> {
    let value: f64 = raw.trim().trim_end_matches('%').trim().parse()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("Production"), Environment::Prod);
        assert_eq!(Environment::parse("anything"), Environment::Dev);
    }

    #[test]
    fn test_parse_pct_accepts_percent_sign() {
        assert_eq!(parse_pct(" 12.5% ").unwrap(), 12.5);
        assert!(parse_pct("twelve").is_err());
    }

    #[test]
    fn test_overrides_apply_and_merge() {
        let env = MarkupOverrides {
            profit_pct: Some(5.0),
            overhead_pct: Some(8.0),
            ..Default::default()
        };
        let flags = MarkupOverrides {
            profit_pct: Some(12.0),
            ..Default::default()
        };
        let config = env.merged_with(&flags).apply(MarkupConfig::default());
        assert_eq!(config.profit_pct, 12.0);
        assert_eq!(config.overhead_pct, 8.0);
        assert_eq!(config.material_markup_pct, 15.0);
    }
}
