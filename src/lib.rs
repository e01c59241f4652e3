pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, NormalizedDir, Options};
pub use error::{HtmlCleanError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{compress_html, DestinationManager, FileWriter, RunReport, WriteProgress};
pub use scanner::{FileFilter, HtmlScanner, SourceFile};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::time::Instant;

/// Runs one scan, clean and compress pass over a validated [`Config`].
pub struct HtmlCleanCompress {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    dry_run: bool,
    started_at: Instant,
}

impl HtmlCleanCompress {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
            dry_run: false,
            started_at: Instant::now(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Measure elapsed time from `started_at` rather than from construction.
    pub fn with_started_at(mut self, started_at: Instant) -> Self {
        self.started_at = started_at;
        self
    }

    /// Build an instance from parsed CLI arguments. Timing starts before the
    /// configuration is loaded and validated.
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let started_at = Instant::now();
        let options = cli_args.load_options()?;
        let config = Config::from_options(&options)?;

        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(
            Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
                .with_dry_run(cli_args.dry_run)
                .with_started_at(started_at),
        )
    }

    /// Enumerate, optionally clean, then compress every source file.
    pub fn run(&self) -> Result<RunReport> {
        self.output_formatter.start_operation(&format!(
            "Starting HtmlCleanCompress v{}...",
            version_info()
        ));

        // Step 1: Enumerate sources before the destination is touched
        let sources = self.scan_sources()?;

        if self.dry_run {
            return Ok(
                RunReport::new(&self.config, &sources, self.started_at.elapsed())
                    .with_cleanup(self.config.clean(), None)
                    .with_dry_run(true),
            );
        }

        // Step 2: Clean the destination if requested
        let cleanup_warning = if self.config.clean() {
            self.clean_destination()
        } else {
            None
        };

        // Step 3: Compress and write
        let progress = self.write_files(&sources)?;

        Ok(
            RunReport::new(&self.config, &sources, self.started_at.elapsed())
                .with_progress(&progress)
                .with_cleanup(self.config.clean(), cleanup_warning),
        )
    }

    fn scan_sources(&self) -> Result<Vec<SourceFile>> {
        let scanner = HtmlScanner::new(self.config.source_dir().as_path());
        let sources = scanner.collect_sources()?;

        self.output_formatter.debug(&format!(
            "Found {} html files in {}",
            sources.len(),
            self.config.source_dir()
        ));

        Ok(sources)
    }

    /// Failures are reported as a warning and the run goes on with whatever
    /// is left in the destination.
    fn clean_destination(&self) -> Option<String> {
        let manager = DestinationManager::new(self.config.dest_dir().clone());

        match manager.clean() {
            Ok(()) => None,
            Err(e) => {
                log::debug!("cleanup failed: {:?}", e);
                let message = e.user_message();
                self.output_formatter.warning(&message);
                Some(message)
            }
        }
    }

    fn write_files(&self, sources: &[SourceFile]) -> Result<WriteProgress> {
        let file_progress = self.progress_manager.create_file_progress(sources.len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &WriteProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let writer = FileWriter::new().with_create_missing_dirs(self.config.create_dirs());
        let result = writer.write_files(sources, self.config.dest_dir(), Some(&progress_callback));

        match result {
            Ok(progress) => {
                ui::progress::finish_progress_with_summary(
                    &file_progress,
                    &format!("Compressed {} files", progress.files_processed),
                    progress.elapsed(),
                );
                Ok(progress)
            }
            Err(e) => {
                file_progress.abandon();
                Err(e)
            }
        }
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &HtmlCleanError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Programmatic entry point: validate `options` and run without status output.
///
/// The application directory defaults to the location of the running
/// executable unless `options.app_dir` is set. Cleanup failures still print a
/// warning on stderr and are recorded in the returned report.
pub fn compress_html_tree(options: &Options) -> Result<RunReport> {
    let started_at = Instant::now();
    let config = Config::from_options(options)?;

    HtmlCleanCompress::new(config, OutputMode::Plain, 0, true)
        .with_started_at(started_at)
        .run()
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
