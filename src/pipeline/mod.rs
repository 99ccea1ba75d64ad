//! Pipeline entry points for triage operations.
//!
//! - `scan`: Flag suspicious rows in a log
//! - `build_prompt`: Turn flagged rows into an analysis request
//! - `run_triage`: Fetch, scan, analyze and notify for one object

pub mod filter;
pub mod prompt;
pub mod triage;

pub use filter::scan;
pub use prompt::build_prompt;
pub use triage::{TriageOutcome, run_triage};
