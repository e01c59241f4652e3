use crate::error::{HtmlCleanError, Result};
use crate::scanner::file_filter::FileFilter;
use std::path::PathBuf;
use walkdir::WalkDir;

/// One HTML file below the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub source_path: PathBuf,
    /// Path relative to the source directory, used unchanged below the destination.
    pub relative_path: PathBuf,
}

impl SourceFile {
    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

pub struct HtmlScanner {
    root: PathBuf,
    filter: FileFilter,
}

impl HtmlScanner {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            filter: FileFilter::default(),
        }
    }

    /// Depth-first, lazy walk over the matching files. Every call starts a fresh walk.
    ///
    /// Only plain files and real directories are considered: symbolic links are
    /// neither followed nor returned.
    pub fn files(&self) -> HtmlFiles {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .into_iter();

        HtmlFiles {
            walker,
            root: self.root.clone(),
            filter: self.filter.clone(),
        }
    }

    /// Run the walk to completion, stopping at the first listing error.
    pub fn collect_sources(&self) -> Result<Vec<SourceFile>> {
        let sources = self.files().collect::<Result<Vec<_>>>()?;
        log::debug!(
            "found {} .{} files below {}",
            sources.len(),
            self.filter.extension(),
            self.root.display()
        );
        Ok(sources)
    }
}

pub struct HtmlFiles {
    walker: walkdir::IntoIter,
    root: PathBuf,
    filter: FileFilter,
}

impl Iterator for HtmlFiles {
    type Item = Result<SourceFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(HtmlCleanError::Walk(err))),
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            if !file_type.is_file() {
                log::trace!("skipping {}: not a regular file", entry.path().display());
                continue;
            }

            if !self.filter.matches_name(entry.file_name()) {
                continue;
            }

            let relative_path = match entry.path().strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => {
                    return Some(Err(HtmlCleanError::bad_parameter(
                        "--src",
                        format!(
                            "cannot express {} relative to {}",
                            entry.path().display(),
                            self.root.display()
                        ),
                    )))
                }
            };

            return Some(Ok(SourceFile {
                source_path: entry.into_path(),
                relative_path,
            }));
        }
    }
}
