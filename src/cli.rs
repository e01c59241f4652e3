use crate::config::{CliOverrides, Options};
use crate::error::{HtmlCleanError, Result};
use clap::{CommandFactory, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Flags that carry a value, written `--key=value`.
const VALUE_FLAGS: &[&str] = &["--src", "--dest", "--config", "--output-format"];

/// Flags that never carry a value. A `=value` suffix on them is dropped.
/// Runs of `-v` (`-vv`, `-vvvv`, ...) are accepted as well.
const SWITCH_FLAGS: &[&str] = &[
    "--clean",
    "--create-dirs",
    "--dry-run",
    "--help",
    "-h",
    "--version",
    "--quiet",
    "--verbose",
    "-q",
];

#[derive(Parser, Debug)]
#[command(name = "htmlcleancompress")]
#[command(about = "Strip comments and collapse whitespace in a tree of HTML files")]
#[command(
    long_about = "HtmlCleanCompress reads every .html file below --src, removes HTML comments, \
                  turns line breaks and tabs into spaces, collapses runs of spaces and writes \
                  the result to the same relative path below --dest."
)]
#[command(after_help = "EXAMPLES:\n  \
    htmlcleancompress --src=./site --dest=./dist\n  \
    htmlcleancompress --src=./site --dest=./dist --clean --create-dirs\n  \
    htmlcleancompress --config=htmlcleancompress.toml --dry-run\n\n\
    Unrecognized parameters are ignored.")]
#[command(args_override_self = true)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// The path to the directory where the sources are located
    #[arg(long, value_name = "PATH")]
    pub src: Option<PathBuf>,

    /// The path to the directory where the html files have to be generated
    #[arg(long, value_name = "PATH")]
    pub dest: Option<PathBuf>,

    /// Remove the destination directory before generating the files
    #[arg(long)]
    pub clean: bool,

    /// Create missing destination sub-directories instead of failing
    #[arg(long)]
    pub create_dirs: bool,

    /// List the files that would be generated without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Path to a TOML file providing src, dest and clean
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format for status messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only warnings and errors)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print help
    #[arg(short, long)]
    pub help: bool,

    /// Print version
    #[arg(long)]
    pub version: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    /// Parse the process arguments, silently dropping anything unrecognized.
    pub fn parse_lenient() -> Result<Self> {
        Self::try_parse_lenient(std::env::args_os())
    }

    pub fn try_parse_lenient<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
            .map_err(|e| HtmlCleanError::bad_parameter("arguments", e.to_string().trim()))
    }

    pub fn help_text() -> String {
        Self::command().render_long_help().to_string()
    }

    pub fn version_text() -> String {
        format!("Version : v{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn load_options(&self) -> Result<Options> {
        let mut options = match self.config {
            Some(ref path) => Options::load_from_file(path)?,
            None => Options::default(),
        };

        options.merge_with_cli_args(&self.create_cli_overrides()?);
        Ok(options)
    }

    /// Fails with a bad parameter when `--src` or `--dest` is not valid UTF-8.
    pub fn create_cli_overrides(&self) -> Result<CliOverrides> {
        let app_dir = std::env::current_exe()
            .map(|exe| exe.to_string_lossy().to_string())
            .ok();

        Ok(CliOverrides::new()
            .with_src(path_arg(self.src.as_deref(), "--src")?)
            .with_dest(path_arg(self.dest.as_deref(), "--dest")?)
            .with_clean(self.clean)
            .with_create_dirs(self.create_dirs)
            .with_app_dir(app_dir))
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

fn path_arg(path: Option<&Path>, parameter: &str) -> Result<Option<String>> {
    path.map(|path| {
        path.to_str().map(str::to_string).ok_or_else(|| {
            HtmlCleanError::bad_parameter(
                parameter,
                format!("{} is not valid UTF-8", path.to_string_lossy()),
            )
        })
    })
    .transpose()
}

/// Rewrite raw process arguments into a form clap accepts.
///
/// The first argument (the program name) is kept as is. Value flags are kept
/// only when written `--key=value` with a non-empty value; switches lose any
/// `=value` suffix. Everything else is dropped. Values are passed through
/// untouched, so paths need not be valid UTF-8.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();

    for arg in args {
        let bytes = arg.as_encoded_bytes();
        let (key_bytes, value_bytes) = match bytes.iter().position(|b| *b == b'=') {
            Some(index) => (&bytes[..index], Some(&bytes[index + 1..])),
            None => (bytes, None),
        };

        let Ok(key) = std::str::from_utf8(key_bytes) else {
            log::debug!("ignoring unrecognized argument {}", arg.to_string_lossy());
            continue;
        };

        if VALUE_FLAGS.contains(&key) {
            match value_bytes {
                Some(value) if value.is_empty() => {
                    log::debug!("ignoring {} without a value", key)
                }
                Some(value) if key == "--output-format" && !is_output_format(value) => {
                    log::debug!(
                        "ignoring unknown output format {}",
                        String::from_utf8_lossy(value)
                    )
                }
                Some(_) => normalized.push(arg.clone()),
                None => log::debug!("ignoring {} without a value", key),
            }
        } else if SWITCH_FLAGS.contains(&key) || is_verbose_run(key) {
            normalized.push(OsString::from(key));
        } else {
            log::debug!("ignoring unrecognized argument {}", arg.to_string_lossy());
        }
    }

    normalized
}

fn is_output_format(value: &[u8]) -> bool {
    std::str::from_utf8(value)
        .map(|value| OutputFormat::from_str(value, false).is_ok())
        .unwrap_or(false)
}

fn is_verbose_run(key: &str) -> bool {
    key.len() > 1 && key.starts_with('-') && key[1..].chars().all(|c| c == 'v')
}
