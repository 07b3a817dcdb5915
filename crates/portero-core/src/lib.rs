//! Shared vocabulary of the portero access-control endpoint.
//!
//! Identifiers, buffered access events, the outbound report codec and the
//! fixed parameters every other crate sizes itself by.

pub mod constants;
pub mod error;
pub mod report;
pub mod types;

pub use error::{Error, Result};
pub use report::ReportLine;
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
