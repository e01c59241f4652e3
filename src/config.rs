use crate::error::{HtmlCleanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Raw, unvalidated options. This is what a caller hands to the programmatic
/// entry point and what `--config` files deserialize into.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Options {
    pub src: String,
    pub dest: String,
    pub clean: bool,
    pub create_dirs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_dir: Option<String>,
}

impl Options {
    pub fn new<S: Into<String>, D: Into<String>>(src: S, dest: D) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
            ..Self::default()
        }
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    pub fn with_app_dir<S: Into<String>>(mut self, app_dir: S) -> Self {
        self.app_dir = Some(app_dir.into());
        self
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(HtmlCleanError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| HtmlCleanError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let options: Options = toml::from_str(&content).map_err(|e| HtmlCleanError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(options)
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref src) = cli_args.src {
            self.src = src.clone();
        }

        if let Some(ref dest) = cli_args.dest {
            self.dest = dest.clone();
        }

        // Flags only ever switch behaviour on.
        if cli_args.clean {
            self.clean = true;
        }

        if cli_args.create_dirs {
            self.create_dirs = true;
        }

        if let Some(ref app_dir) = cli_args.app_dir {
            self.app_dir = Some(app_dir.clone());
        }
    }

    /// The application directory to validate: the explicit one when set,
    /// otherwise the location of the running executable.
    pub fn resolved_app_dir(&self) -> String {
        match self.app_dir {
            Some(ref app_dir) => app_dir.clone(),
            None => default_app_dir(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub src: Option<String>,
    pub dest: Option<String>,
    pub clean: bool,
    pub create_dirs: bool,
    pub app_dir: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_src(mut self, src: Option<String>) -> Self {
        self.src = src;
        self
    }

    pub fn with_dest(mut self, dest: Option<String>) -> Self {
        self.dest = dest;
        self
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    pub fn with_app_dir(mut self, app_dir: Option<String>) -> Self {
        self.app_dir = app_dir;
        self
    }
}

/// An absolute, canonical directory path that always ends with exactly one
/// separator. The separator is whichever of `/` or `\` the canonical path uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedDir(String);

impl NormalizedDir {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    pub fn separator(&self) -> char {
        separator_of(&self.0)
    }

    pub fn join<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.as_path().join(relative)
    }
}

impl fmt::Display for NormalizedDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for NormalizedDir {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

/// Validated run configuration. Built once from [`Options`] and read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    source_dir: NormalizedDir,
    dest_dir: NormalizedDir,
    app_dir: NormalizedDir,
    clean: bool,
    create_dirs: bool,
}

impl Config {
    pub fn from_options(options: &Options) -> Result<Self> {
        let source_dir = validate_path(&options.src, "--src")?;
        let dest_dir = validate_path(&options.dest, "--dest")?;
        let app_dir = validate_path(&options.resolved_app_dir(), "app directory")?;

        if source_dir == dest_dir {
            return Err(HtmlCleanError::bad_parameter(
                "--src and --dest",
                format!("both resolve to {}", source_dir),
            ));
        }

        log::debug!(
            "configuration: src={} dest={} app={} clean={} create_dirs={}",
            source_dir,
            dest_dir,
            app_dir,
            options.clean,
            options.create_dirs
        );

        Ok(Self {
            source_dir,
            dest_dir,
            app_dir,
            clean: options.clean,
            create_dirs: options.create_dirs,
        })
    }

    pub fn source_dir(&self) -> &NormalizedDir {
        &self.source_dir
    }

    pub fn dest_dir(&self) -> &NormalizedDir {
        &self.dest_dir
    }

    pub fn app_dir(&self) -> &NormalizedDir {
        &self.app_dir
    }

    pub fn clean(&self) -> bool {
        self.clean
    }

    pub fn create_dirs(&self) -> bool {
        self.create_dirs
    }
}

/// Resolve `raw` to a canonical directory ending with a separator.
///
/// Fails with [`HtmlCleanError::BadParameter`] naming `parameter` when the path
/// is empty, does not exist, or cannot be canonicalized. A path naming a file is
/// truncated to the directory that contains it.
pub fn validate_path(raw: &str, parameter: &str) -> Result<NormalizedDir> {
    if raw.is_empty() {
        return Err(HtmlCleanError::bad_parameter(parameter, "the path is empty"));
    }

    let canonical = fs::canonicalize(raw)
        .map_err(|e| HtmlCleanError::bad_parameter(parameter, format!("{}: {}", raw, e)))?;

    let mut resolved = canonical
        .to_str()
        .ok_or_else(|| {
            HtmlCleanError::bad_parameter(parameter, format!("{} is not valid UTF-8", raw))
        })?
        .to_string();

    let separator = separator_of(&resolved);

    let metadata = fs::symlink_metadata(&resolved)
        .map_err(|e| HtmlCleanError::bad_parameter(parameter, format!("{}: {}", raw, e)))?;

    if metadata.is_file() {
        if let Some(index) = resolved.rfind(separator) {
            resolved.truncate(index);
        }
    }

    if !resolved.ends_with(separator) {
        resolved.push(separator);
    }

    Ok(NormalizedDir(resolved))
}

fn separator_of(path: &str) -> char {
    if path.contains('\\') {
        '\\'
    } else {
        '/'
    }
}

fn default_app_dir() -> String {
    std::env::current_exe()
        .map(|exe| exe.to_string_lossy().to_string())
        .unwrap_or_default()
}
