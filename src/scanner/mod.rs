pub mod file_filter;
pub mod html_scanner;

pub use file_filter::{FileFilter, HTML_EXTENSION};
pub use html_scanner::{HtmlFiles, HtmlScanner, SourceFile};
