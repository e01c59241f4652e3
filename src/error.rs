use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when `--src`, `--dest` or the application directory is unusable.
pub const EXIT_BAD_PARAMETER: i32 = 9;

/// Exit code for every other failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Error, Debug)]
pub enum HtmlCleanError {
    #[error("Invalid or missing {parameter} parameter: {reason}")]
    BadParameter { parameter: String, reason: String },

    #[error("Not possible to clean the {path} folder")]
    CleanupFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl HtmlCleanError {
    pub fn bad_parameter<P: Into<String>, R: Into<String>>(parameter: P, reason: R) -> Self {
        HtmlCleanError::BadParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code the entry point should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            HtmlCleanError::BadParameter { .. } | HtmlCleanError::Config { .. } => {
                EXIT_BAD_PARAMETER
            }
            _ => EXIT_FAILURE,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for HtmlCleanError {
    fn user_message(&self) -> String {
        match self {
            HtmlCleanError::BadParameter { parameter, reason } => {
                format!("Invalid or missing {} parameter: {}", parameter, reason)
            }
            HtmlCleanError::CleanupFailure { path, source } => {
                format!("Not possible to clean the {} folder: {}", path, source)
            }
            HtmlCleanError::Read { path, source } => {
                format!("Cannot read {}: {}", path.display(), source)
            }
            HtmlCleanError::Write { path, source } => {
                format!("Cannot write {}: {}", path.display(), source)
            }
            HtmlCleanError::Walk(error) => {
                let path = error
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "unknown path".to_string());
                format!("Cannot list {}: {}", path, error)
            }
            HtmlCleanError::Config { message } => {
                format!("Configuration error: {}", message)
            }
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            HtmlCleanError::BadParameter { parameter, .. } if parameter == "--src" || parameter == "--dest" => Some(
                "Pass existing, distinct directories, e.g. --src=./site --dest=./dist".to_string()
            ),
            HtmlCleanError::BadParameter { .. } => Some(
                "Run with --help to see the accepted parameters.".to_string()
            ),
            HtmlCleanError::CleanupFailure { .. } => Some(
                "Close any program holding files open in the destination folder and run again.".to_string()
            ),
            HtmlCleanError::Write { .. } => Some(
                "Make sure the destination mirrors the source folders, or run with --clean --create-dirs.".to_string()
            ),
            HtmlCleanError::Read { .. } => Some(
                "Check that the file still exists and is readable by the current user.".to_string()
            ),
            HtmlCleanError::Config { .. } => Some(
                "Check your configuration file syntax; accepted keys are src, dest, clean, create_dirs and app_dir.".to_string()
            ),
            HtmlCleanError::Walk(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HtmlCleanError>;
