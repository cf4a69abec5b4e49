//! Fixture loading and management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Core function to call (`snprintf`, `sscanf`, `strtoul`, ...).
    pub function: String,
    /// C standard clause the case exercises, e.g. `C11 7.21.6.1p6`.
    #[serde(default)]
    pub clause: String,
    /// Function-specific inputs; see [`crate::exec`].
    pub inputs: serde_json::Value,
    /// Expected rendering of the call's result.
    pub expected_output: String,
}

/// A collection of fixture cases for a function family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Function family name.
    pub family: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Ok(Self::from_json(&content)?)
    }
}

/// Load every `*.json` fixture set in `dir`, sorted by file name.
///
/// Files that fail to parse are returned alongside the loaded sets so the
/// caller can report them.
pub fn load_fixture_dir(
    dir: &Path,
) -> Result<(Vec<FixtureSet>, Vec<(PathBuf, HarnessError)>), HarnessError> {
    let entries = std::fs::read_dir(dir).map_err(|e| HarnessError::io(dir, e))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut sets = Vec::new();
    let mut skipped = Vec::new();
    for path in paths {
        match FixtureSet::from_file(&path) {
            Ok(set) => sets.push(set),
            Err(err) => skipped.push((path, err)),
        }
    }
    if sets.is_empty() {
        return Err(HarnessError::NoFixtures(dir.to_path_buf()));
    }
    Ok((sets, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": "v1",
        "family": "stdio/printf",
        "captured_at": "2026-10-18T00:00:00Z",
        "cases": [
            {"name": "plain", "function": "sprintf", "clause": "C11 7.21.6.1",
             "inputs": {"format": "%d", "args": [{"int": 5}]}, "expected_output": "ret=1 out=\"5\""},
            {"name": "no_clause", "function": "strtoul",
             "inputs": {"text": "7", "base": 10}, "expected_output": "value=7 end=1"}
        ]
    }"#;

    #[test]
    fn parses_and_defaults_clause() {
        let set = FixtureSet::from_json(SAMPLE).unwrap();
        assert_eq!(set.family, "stdio/printf");
        assert_eq!(set.cases.len(), 2);
        assert_eq!(set.cases[0].clause, "C11 7.21.6.1");
        assert_eq!(set.cases[1].clause, "");
    }

    #[test]
    fn json_roundtrip_preserves_cases() {
        let set = FixtureSet::from_json(SAMPLE).unwrap();
        let again = FixtureSet::from_json(&set.to_json().unwrap()).unwrap();
        assert_eq!(again.cases[0].inputs, set.cases[0].inputs);
        assert_eq!(again.cases[1].expected_output, "value=7 end=1");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FixtureSet::from_file(Path::new("/nonexistent/minifmt.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/minifmt.json"));
    }

    #[test]
    fn shipped_fixture_dir_loads_cleanly() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let (sets, skipped) = load_fixture_dir(&dir).unwrap();
        assert!(skipped.is_empty(), "unparseable fixtures: {skipped:?}");
        assert!(sets.len() >= 3);
    }
}
