pub mod compressor;
pub mod file_writer;
pub mod output_manager;

pub use compressor::compress_html;
pub use file_writer::{FileOutcome, FileWriter, WriteProgress};
pub use output_manager::{format_elapsed, DestinationManager, RunReport};
