use crate::config::NormalizedDir;
use crate::error::{HtmlCleanError, Result};
use crate::extractor::compressor::compress_html;
use crate::scanner::SourceFile;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct WriteProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl WriteProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            bytes_read: 0,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn update_file(&mut self, filename: String, outcome: &FileOutcome) {
        self.files_processed += 1;
        self.bytes_read += outcome.bytes_read;
        self.bytes_written += outcome.bytes_written;
        self.current_file = Some(filename);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.files_processed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.elapsed();
        let rate = self.files_processed as f64 / elapsed.as_secs_f64();
        let remaining_files = self.total_files.saturating_sub(self.files_processed);

        if rate > 0.0 {
            Duration::from_secs_f64(remaining_files as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

/// Sizes of one transformed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOutcome {
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Reads, compresses and writes source files below the destination directory.
pub struct FileWriter {
    create_missing_dirs: bool,
}

impl FileWriter {
    pub fn new() -> Self {
        Self {
            create_missing_dirs: false,
        }
    }

    /// When set, parent directories missing below the destination are created.
    /// Otherwise a file whose destination folder does not exist fails the run.
    pub fn with_create_missing_dirs(mut self, create: bool) -> Self {
        self.create_missing_dirs = create;
        self
    }

    /// Process every source in order. The first failing file aborts the run.
    pub fn write_files(
        &self,
        sources: &[SourceFile],
        dest_dir: &NormalizedDir,
        progress_callback: Option<&dyn Fn(&WriteProgress)>,
    ) -> Result<WriteProgress> {
        let mut progress = WriteProgress::new(sources.len());

        for source in sources {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let outcome = self.write_file(source, dest_dir)?;
            progress.update_file(source.display_path(), &outcome);
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(progress)
    }

    pub fn write_file(&self, source: &SourceFile, dest_dir: &NormalizedDir) -> Result<FileOutcome> {
        let content = fs::read(&source.source_path).map_err(|e| HtmlCleanError::Read {
            path: source.source_path.clone(),
            source: e,
        })?;

        let compressed = compress_html(&content);
        let dest_path = self.destination_path(source, dest_dir)?;

        fs::write(&dest_path, &compressed).map_err(|e| HtmlCleanError::Write {
            path: dest_path.clone(),
            source: e,
        })?;

        log::debug!(
            "{} -> {} ({} -> {} bytes)",
            source.source_path.display(),
            dest_path.display(),
            content.len(),
            compressed.len()
        );

        Ok(FileOutcome {
            bytes_read: content.len() as u64,
            bytes_written: compressed.len() as u64,
        })
    }

    fn destination_path(&self, source: &SourceFile, dest_dir: &NormalizedDir) -> Result<PathBuf> {
        let dest_path = dest_dir.join(&source.relative_path);

        if self.create_missing_dirs {
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent).map_err(|e| HtmlCleanError::Write {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        Ok(dest_path)
    }
}

impl Default for FileWriter {
    fn default() -> Self {
        Self::new()
    }
}
