//! Utility modules for addonctl

pub mod dryrun;
pub mod errors;
pub mod logger;
pub mod paths;
pub mod preflight;
pub mod prereqs;
pub mod progress;

// Re-export commonly used items
pub use dryrun::DryRun;
pub use errors::ErrorReport;
pub use logger::{log_error, log_info, log_warn};
pub use paths::MasterPaths;
pub use prereqs::{CommonPrereqs, Prerequisite};
