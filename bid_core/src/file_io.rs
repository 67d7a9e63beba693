//! # File I/O Module
//!
//! Reads and writes bid jobs (`.lpb`) and finished bids (`.bid.json`) as
//! human-readable JSON.
//!
//! - **Atomic saves**: write to `.tmp`, sync, rename, so an interrupted save
//!   never leaves a truncated file behind
//! - **Version validation**: job files from a newer schema are rejected
//!
//! ## Example
//!
//! ```rust,no_run
//! use bid_core::file_io::{load_job, save_bid};
//! use std::path::Path;
//!
//! let job = load_job(Path::new("warehouse.lpb"))?;
//! let bid = job.run()?;
//! save_bid(&bid, Path::new("warehouse.bid.json"))?;
//! # Ok::<(), bid_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::bid::Bid;
use crate::errors::{CalcError, CalcResult};
use crate::job::{BidJob, SCHEMA_VERSION};

/// Save a job with an atomic write.
pub fn save_job(job: &BidJob, path: &Path) -> CalcResult<()> {
    write_json_atomic(job, path)
}

/// Load a job and check its schema version.
///
/// # Returns
///
/// * `Ok(BidJob)` - Successfully loaded job (not yet resolved)
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_job(path: &Path) -> CalcResult<BidJob> {
    let job: BidJob = read_json(path)?;
    validate_version(&job.version)?;
    Ok(job)
}

/// Write a finished bid for downstream exporters.
pub fn save_bid(bid: &Bid, path: &Path) -> CalcResult<()> {
    write_json_atomic(bid, path)
}

pub fn load_bid(path: &Path) -> CalcResult<Bid> {
    read_json(path)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = json.len(), "saved");
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let mut file = File::open(path).map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // 0.x: a newer minor may carry breaking changes
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PriceItem;
    use crate::project::ProjectDescriptor;
    use std::env::temp_dir;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("lightningbid_test_{}_{}.lpb", name, std::process::id()))
    }

    fn sample_job() -> BidJob {
        let project = ProjectDescriptor::new("Office", 35.0, 5000.0, 4, 300.0);
        BidJob::new(
            &project,
            "UL 96A",
            vec![PriceItem::new("AT-001", "Air Terminal - Copper", "ea", 45.0, 15.0)],
        )
    }

    #[test]
    fn test_tmp_path_generation() {
        let tmp = tmp_path_for(Path::new("/jobs/warehouse.lpb"));
        assert_eq!(tmp, PathBuf::from("/jobs/warehouse.lpb.tmp"));
    }

    #[test]
    fn test_save_and_load_job_roundtrip() {
        let path = temp_path("roundtrip");
        let job = sample_job();
        save_job(&job, &path).unwrap();

        let loaded = load_job(&path).unwrap();
        assert_eq!(loaded, job);
        assert!(!tmp_path_for(&path).exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_bid_then_load() {
        let path = temp_path("bid");
        let bid = sample_job().run().unwrap();
        save_bid(&bid, &path).unwrap();

        let loaded = load_bid(&path).unwrap();
        assert_eq!(loaded.id, bid.id);
        assert_eq!(loaded.line_items.len(), bid.line_items.len());
        assert!((loaded.final_bid_amount() - bid.final_bid_amount()).abs() < 1e-6);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_newer_job_version_rejected() {
        let path = temp_path("version");
        let mut job = sample_job();
        job.version = "0.9.0".to_string();
        save_job(&job, &path).unwrap();

        let err = load_job(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.3").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = load_job(Path::new("/definitely/not/here.lpb")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let path = temp_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        let err = load_job(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }
}
