//! Report generation for conformance results.

use serde::{Deserialize, Serialize};

use crate::structured_log::sha256_hex;
use crate::verify::VerificationSummary;

/// A conformance report over one harness run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// Report title.
    pub title: String,
    /// Campaign name (the harness subcommand that produced it).
    pub campaign: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// Verification summary.
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Campaign: {}\n", self.campaign));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        out.push_str("| Function | Passed | Total |\n");
        out.push_str("|----------|--------|-------|\n");
        for (symbol, (passed, total)) in self.summary.by_symbol() {
            out.push_str(&format!("| {symbol} | {passed} | {total} |\n"));
        }
        out.push('\n');

        out.push_str("| Case | Function | Clause | Status |\n");
        out.push_str("|------|----------|--------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                r.case_name, r.symbol, r.clause, status
            ));
        }

        let failures: Vec<_> = self.summary.failures().collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                out.push_str(&format!("\n### {}\n\n```diff\n", r.case_name));
                out.push_str(r.diff.as_deref().unwrap_or(""));
                out.push_str("```\n");
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    /// SHA-256 of the JSON rendering with the timestamp cleared, so that two
    /// runs with identical results hash identically.
    #[must_use]
    pub fn results_digest(&self) -> String {
        let mut stable = self.clone();
        stable.timestamp.clear();
        sha256_hex(stable.to_json().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::VerificationResult;

    fn report(passed: bool, timestamp: &str) -> ConformanceReport {
        let results = vec![VerificationResult {
            family: "stdio/scanf".into(),
            symbol: "sscanf".into(),
            case_name: "hex_prefix".into(),
            clause: "C11 7.21.6.2".into(),
            passed,
            expected: "ret=1".into(),
            actual: if passed { "ret=1".into() } else { "ret=0".into() },
            diff: (!passed).then(|| crate::diff::render_diff("ret=1", "ret=0")),
        }];
        ConformanceReport {
            title: "minifmt Conformance Report".into(),
            campaign: "verify".into(),
            timestamp: timestamp.into(),
            summary: VerificationSummary::from_results(results),
        }
    }

    #[test]
    fn markdown_lists_cases_and_tally() {
        let md = report(true, "t0").to_markdown();
        assert!(md.starts_with("# minifmt Conformance Report\n"));
        assert!(md.contains("| sscanf | 1 | 1 |"));
        assert!(md.contains("| hex_prefix | sscanf | C11 7.21.6.2 | PASS |"));
        assert!(!md.contains("## Failures"));
    }

    #[test]
    fn markdown_includes_failure_diffs() {
        let md = report(false, "t0").to_markdown();
        assert!(md.contains("## Failures"));
        assert!(md.contains("-ret=1\n+ret=0\n"));
    }

    #[test]
    fn digest_ignores_timestamp() {
        assert_eq!(report(true, "t0").results_digest(), report(true, "t1").results_digest());
        assert_ne!(report(true, "t0").results_digest(), report(false, "t0").results_digest());
    }

    #[test]
    fn json_parses_back() {
        let json = report(true, "t0").to_json();
        let back: ConformanceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary.total, 1);
    }
}
