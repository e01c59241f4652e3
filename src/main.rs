use htmlcleancompress::{
    Cli, HtmlCleanCompress, HtmlCleanError, OutputFormat, OutputFormatter, OutputMode,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = match Cli::parse_lenient() {
        Ok(cli) => cli,
        Err(e) => {
            OutputFormatter::new(OutputMode::Plain, 0, false).print_user_friendly_error(&e);
            return e.exit_code();
        }
    };

    // --help and --version exit here, before anything touches the filesystem
    if cli.help {
        eprint!("{}", Cli::help_text());
        return 0;
    }
    if cli.version {
        eprintln!("{}", Cli::version_text());
        return 0;
    }

    setup_logging(cli.verbosity_level());

    let app = match HtmlCleanCompress::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&cli, &e);
            return e.exit_code();
        }
    };

    match app.run() {
        Ok(report) => {
            app.output_formatter().print_run_report(&report);
            0
        }
        Err(e) => {
            app.handle_error(&e);
            e.exit_code()
        }
    }
}

fn print_startup_error(cli: &Cli, error: &HtmlCleanError) {
    let mode = match cli.output_format {
        OutputFormat::Human => OutputMode::Human,
        OutputFormat::Json => OutputMode::Json,
        OutputFormat::Plain => OutputMode::Plain,
    };
    let formatter = OutputFormatter::new(mode, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();

    if std::env::var("RUST_LOG").is_err() {
        let level = match verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        builder.filter_level(level);
    }

    builder.target(env_logger::Target::Stderr).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use htmlcleancompress::cli::normalize_args;
    use std::fs;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["htmlcleancompress"];
        argv.extend_from_slice(args);
        Cli::parse_from(normalize_args(argv))
    }

    #[test]
    fn test_from_cli_and_run() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::write(src.path().join("index.html"), "<b>  bold  </b>\n").unwrap();

        let src_arg = format!("--src={}", src.path().display());
        let dest_arg = format!("--dest={}", dest.path().display());
        let cli = cli(&[src_arg.as_str(), dest_arg.as_str(), "--quiet"]);

        let app = HtmlCleanCompress::from_cli(&cli).unwrap();
        let report = app.run().unwrap();

        assert_eq!(report.files_written, 1);
        assert_eq!(
            fs::read_to_string(dest.path().join("index.html")).unwrap(),
            "<b> bold </b> "
        );
    }

    #[test]
    fn test_missing_src_maps_to_exit_code_nine() {
        let dest = TempDir::new().unwrap();
        let dest_arg = format!("--dest={}", dest.path().display());
        let cli = cli(&[dest_arg.as_str()]);

        let error = HtmlCleanCompress::from_cli(&cli).err().unwrap();
        assert_eq!(error.exit_code(), 9);
        assert!(error.to_string().contains("--src"));
    }

    #[test]
    fn test_dry_run_flag_is_carried() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let src_arg = format!("--src={}", src.path().display());
        let dest_arg = format!("--dest={}", dest.path().display());

        let app = HtmlCleanCompress::from_cli(&cli(&[src_arg.as_str(), dest_arg.as_str(), "--dry-run"])).unwrap();
        assert!(app.is_dry_run());
    }
}
