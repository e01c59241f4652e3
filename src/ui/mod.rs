pub mod output;
pub mod progress;

pub use output::{completion_message, OutputFormatter, OutputMode};
pub use progress::ProgressManager;
