//! Output comparison and verification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Result of verifying a single fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Fixture family the case came from.
    pub family: String,
    /// Function under test.
    pub symbol: String,
    /// Name of the test case.
    pub case_name: String,
    /// C standard clause reference.
    pub clause: String,
    /// Whether the case passed.
    pub passed: bool,
    /// Expected output.
    pub expected: String,
    /// Actual output from our implementation.
    pub actual: String,
    /// Diff if the case failed.
    pub diff: Option<String>,
}

/// Aggregate verification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    /// Total cases run.
    pub total: usize,
    /// Cases passed.
    pub passed: usize,
    /// Cases failed.
    pub failed: usize,
    /// Individual results.
    pub results: Vec<VerificationResult>,
}

impl VerificationSummary {
    /// Build a summary from a list of results.
    #[must_use]
    pub fn from_results(results: Vec<VerificationResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        Self {
            total,
            passed,
            failed,
            results,
        }
    }

    /// Returns true if all cases passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// `(passed, total)` per function under test.
    #[must_use]
    pub fn by_symbol(&self) -> BTreeMap<&str, (usize, usize)> {
        let mut tally = BTreeMap::new();
        for r in &self.results {
            let entry = tally.entry(r.symbol.as_str()).or_insert((0, 0));
            entry.0 += usize::from(r.passed);
            entry.1 += 1;
        }
        tally
    }

    /// Failed results only.
    pub fn failures(&self) -> impl Iterator<Item = &VerificationResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}
