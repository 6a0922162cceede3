//! Command-line front end for comparing two screenshots.

pub mod compare;
pub mod config;
pub mod error;
pub mod input;
pub mod regions;
pub mod report;

pub use compare::{run_compare, CompareRequest};
pub use error::{CliError, CliResult};
pub use report::ComparisonReport;
