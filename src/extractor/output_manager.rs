use crate::config::{Config, NormalizedDir};
use crate::error::{HtmlCleanError, Result};
use crate::extractor::WriteProgress;
use crate::scanner::SourceFile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::time::Duration;

/// Summary of one run, printed at the end and serialized in JSON mode.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub version: String,
    pub source_dir: String,
    pub dest_dir: String,
    pub files: Vec<String>,
    pub files_written: usize,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub elapsed: Duration,
    pub cleaned: bool,
    pub cleanup_warning: Option<String>,
    pub dry_run: bool,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn new(config: &Config, sources: &[SourceFile], elapsed: Duration) -> Self {
        Self {
            version: crate::version_info().to_string(),
            source_dir: config.source_dir().to_string(),
            dest_dir: config.dest_dir().to_string(),
            files: sources.iter().map(SourceFile::display_path).collect(),
            files_written: 0,
            bytes_read: 0,
            bytes_written: 0,
            elapsed,
            cleaned: false,
            cleanup_warning: None,
            dry_run: false,
            finished_at: Utc::now(),
        }
    }

    pub fn with_progress(mut self, progress: &WriteProgress) -> Self {
        self.files_written = progress.files_processed;
        self.bytes_read = progress.bytes_read;
        self.bytes_written = progress.bytes_written;
        self
    }

    pub fn with_cleanup(mut self, cleaned: bool, warning: Option<String>) -> Self {
        self.cleaned = cleaned;
        self.cleanup_warning = warning;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Elapsed wall-clock time as `seconds.millis`, e.g. `0.042`.
    pub fn elapsed_seconds(&self) -> String {
        format_elapsed(self.elapsed)
    }

    /// Percentage of input bytes removed by compression.
    pub fn savings_percentage(&self) -> f64 {
        if self.bytes_read == 0 {
            0.0
        } else {
            (1.0 - self.bytes_written as f64 / self.bytes_read as f64) * 100.0
        }
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{}.{:03}", elapsed.as_secs(), elapsed.subsec_millis())
}

/// Owns the destination tree for the `--clean` step.
pub struct DestinationManager {
    dest_dir: NormalizedDir,
}

impl DestinationManager {
    pub fn new(dest_dir: NormalizedDir) -> Self {
        Self { dest_dir }
    }

    pub fn dest_dir(&self) -> &NormalizedDir {
        &self.dest_dir
    }

    /// Remove the whole destination tree and recreate it empty.
    ///
    /// A destination that is already gone is not an error. Any other failure is
    /// returned as [`HtmlCleanError::CleanupFailure`]; callers treat it as a warning.
    pub fn clean(&self) -> Result<()> {
        match fs::remove_dir_all(self.dest_dir.as_path()) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(self.cleanup_failure(e)),
        }

        fs::create_dir(self.dest_dir.as_path()).map_err(|e| self.cleanup_failure(e))?;

        log::debug!("cleaned {}", self.dest_dir);
        Ok(())
    }

    fn cleanup_failure(&self, source: std::io::Error) -> HtmlCleanError {
        HtmlCleanError::CleanupFailure {
            path: self.dest_dir.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{validate_path, Options};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_everything() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("old").join("nested")).unwrap();
        fs::write(root.join("stale.html"), "stale").unwrap();
        fs::write(root.join("old").join("nested").join("deep.html"), "stale").unwrap();

        let manager = DestinationManager::new(validate_path(root.to_str().unwrap(), "--dest").unwrap());
        manager.clean().unwrap();

        assert!(root.is_dir());
        assert_eq!(fs::read_dir(root).unwrap().count(), 0);
    }

    #[test]
    fn test_clean_recreates_missing_destination() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        let manager = DestinationManager::new(validate_path(dest.to_str().unwrap(), "--dest").unwrap());

        fs::remove_dir(&dest).unwrap();
        manager.clean().unwrap();
        assert!(dest.is_dir());
    }

    #[test]
    fn test_clean_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&dest).unwrap();
        let manager = DestinationManager::new(validate_path(dest.to_str().unwrap(), "--dest").unwrap());

        // With the parent gone the destination cannot be recreated.
        fs::remove_dir_all(temp_dir.path().join("a")).unwrap();
        let error = manager.clean().unwrap_err();
        assert!(matches!(error, HtmlCleanError::CleanupFailure { .. }));
        assert!(error.to_string().contains(manager.dest_dir().as_str()));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(0)), "0.000");
        assert_eq!(format_elapsed(Duration::from_millis(42)), "0.042");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.500");
        assert_eq!(format_elapsed(Duration::from_micros(2_345_678)), "2.345");
    }

    #[test]
    fn test_report_from_progress() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let config = Config::from_options(&Options::new(
            src.path().to_str().unwrap(),
            dest.path().to_str().unwrap(),
        ))
        .unwrap();

        let sources = vec![SourceFile {
            source_path: src.path().join("index.html"),
            relative_path: PathBuf::from("index.html"),
        }];

        let mut progress = WriteProgress::new(1);
        progress.files_processed = 1;
        progress.bytes_read = 200;
        progress.bytes_written = 150;

        let report = RunReport::new(&config, &sources, Duration::from_millis(12))
            .with_progress(&progress)
            .with_cleanup(true, None);

        assert_eq!(report.files, vec!["index.html".to_string()]);
        assert_eq!(report.files_written, 1);
        assert_eq!(report.savings_percentage(), 25.0);
        assert_eq!(report.elapsed_seconds(), "0.012");
        assert!(report.cleaned);
        assert!(!report.dry_run);
        assert_eq!(report.dest_dir, config.dest_dir().to_string());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["files_written"], 1);
        assert_eq!(json["version"], crate::version_info());
    }
}
