//! Test execution engine.

use std::io::Write;
use std::time::Instant;

use crate::diff;
use crate::exec::execute_fixture_case;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::structured_log::{LogEmitter, LogLevel, Outcome};
use crate::verify::VerificationResult;

/// Runs fixture sets and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| verify_case(&fixture_set.family, case).0)
            .collect()
    }

    /// Like [`run`](Self::run), also logging one `case_result` event per case.
    pub fn run_logged<W: Write>(
        &self,
        fixture_set: &FixtureSet,
        log: &mut LogEmitter<W>,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let entry = log
            .entry(LogLevel::Debug, "set_start")
            .with_details(serde_json::json!({
                "family": fixture_set.family,
                "version": fixture_set.version,
                "cases": fixture_set.cases.len(),
            }));
        log.emit_entry(entry)?;

        let mut results = Vec::with_capacity(fixture_set.cases.len());
        for case in &fixture_set.cases {
            let started = Instant::now();
            let (result, error) = verify_case(&fixture_set.family, case);
            let latency_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

            let (level, outcome) = match (&error, result.passed) {
                (Some(_), _) => (LogLevel::Error, Outcome::Error),
                (None, true) => (LogLevel::Info, Outcome::Pass),
                (None, false) => (LogLevel::Warn, Outcome::Fail),
            };
            let mut entry = log
                .entry(level, "case_result")
                .with_api(&fixture_set.family, &case.function)
                .with_case(&case.name)
                .with_outcome(outcome)
                .with_latency_ns(latency_ns);
            if let Some(err) = error {
                entry = entry.with_details(serde_json::json!({ "error": err }));
            } else if !result.passed {
                entry = entry.with_details(serde_json::json!({
                    "expected": result.expected,
                    "actual": result.actual,
                }));
            }
            log.emit_entry(entry)?;
            results.push(result);
        }
        Ok(results)
    }
}

/// Execute one case. The second element carries the harness error, if the
/// case could not be executed at all.
fn verify_case(family: &str, case: &FixtureCase) -> (VerificationResult, Option<String>) {
    let (actual, error) = match execute_fixture_case(&case.function, &case.inputs) {
        Ok(rendered) => (rendered, None),
        Err(err) => (format!("unsupported:{err}"), Some(err.to_string())),
    };
    let passed = error.is_none() && actual == case.expected_output;
    let diff = (!passed).then(|| diff::render_diff(&case.expected_output, &actual));
    let result = VerificationResult {
        family: family.to_string(),
        symbol: case.function.clone(),
        case_name: case.name.clone(),
        clause: case.clause.clone(),
        passed,
        expected: case.expected_output.clone(),
        actual,
        diff,
    };
    (result, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_log::validate_log_line;

    fn fixture() -> FixtureSet {
        FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"stdio/printf",
                "captured_at":"2026-10-18T00:00:00Z",
                "cases":[
                    {"name":"ok","function":"sprintf","clause":"C11 7.21.6.1",
                     "inputs":{"format":"[%3d]","args":[{"int":7}]},"expected_output":"ret=5 out=\"[  7]\""},
                    {"name":"wrong","function":"sprintf",
                     "inputs":{"format":"%x","args":[{"int":255}]},"expected_output":"ret=2 out=\"FF\""},
                    {"name":"unknown","function":"printf_s",
                     "inputs":{},"expected_output":""}
                ]
            }"#,
        )
        .expect("valid fixture json")
    }

    #[test]
    fn runner_classifies_cases() {
        let results = TestRunner::new("smoke").run(&fixture());
        assert_eq!(results.len(), 3);
        assert!(results[0].passed);
        assert!(results[0].diff.is_none());
        assert!(!results[1].passed);
        assert_eq!(results[1].actual, "ret=2 out=\"ff\"");
        assert!(results[1].diff.as_deref().unwrap().contains("+ret=2 out=\"ff\""));
        assert!(!results[2].passed);
        assert!(results[2].actual.starts_with("unsupported:"));
    }

    #[test]
    fn logged_run_emits_valid_case_events() {
        let mut log = LogEmitter::to_buffer("run-1", "smoke");
        let results = TestRunner::new("smoke").run_logged(&fixture(), &mut log).unwrap();
        assert_eq!(results.len(), 3);

        let text = String::from_utf8(log.into_inner()).unwrap();
        let entries: Vec<_> = text
            .lines()
            .enumerate()
            .map(|(i, line)| validate_log_line(line, i + 1).expect("valid log line"))
            .collect();
        assert_eq!(entries[0].event, "set_start");
        let outcomes: Vec<_> = entries[1..].iter().map(|e| e.outcome).collect();
        assert_eq!(
            outcomes,
            [Some(Outcome::Pass), Some(Outcome::Fail), Some(Outcome::Error)]
        );
        assert_eq!(entries[3].symbol.as_deref(), Some("printf_s"));
    }

    #[test]
    fn log_level_filter_keeps_failures_only() {
        let mut log = LogEmitter::to_buffer("run-2", "smoke").with_min_level(LogLevel::Warn);
        TestRunner::new("smoke").run_logged(&fixture(), &mut log).unwrap();
        assert_eq!(log.emitted(), 2);
    }
}
