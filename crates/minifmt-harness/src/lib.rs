//! # minifmt-harness
//!
//! Conformance harness for the minifmt engines.
//!
//! Fixture sets (JSON) describe calls into the core crate and the exact
//! rendering each call must produce. The harness executes them, diffs the
//! results, and writes markdown/JSON reports plus a JSONL event log.

#![forbid(unsafe_code)]

pub mod bounds;
pub mod config;
pub mod diff;
pub mod error;
pub mod exec;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use exec::{ArgSpec, TargetSpec, execute_fixture_case};
pub use fixtures::{FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
