use std::ffi::OsStr;

/// Extension every collected source file must carry.
pub const HTML_EXTENSION: &str = "html";

/// Selects source files by the last dot-delimited segment of their name.
///
/// The comparison is case-sensitive and looks at the raw name, so `page.html`
/// and a file named just `html` both match while `page.HTML` and `page.htm` do not.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extension: String,
}

impl FileFilter {
    pub fn new<S: Into<String>>(extension: S) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn matches_name(&self, file_name: &OsStr) -> bool {
        let file_name = file_name.to_string_lossy();
        file_name.rsplit('.').next() == Some(self.extension.as_str())
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(HTML_EXTENSION)
    }
}
