//! Structured JSONL logging for harness runs.
//!
//! Provides:
//! - [`LogEntry`]: one JSONL record with required and optional fields.
//! - [`ArtifactIndex`]: ties a run's log to the reports it wrote, by SHA-256.
//! - [`LogEmitter`]: writes JSONL lines to any [`Write`] sink, filtered by level.
//! - [`validate_log_line`] / [`validate_log_file`]: schema checks for emitted logs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;

// ---------------------------------------------------------------------------
// Log entry
// ---------------------------------------------------------------------------

/// Severity level for log entries. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const NAMES: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];

    /// Parse from string (case-insensitive). Unknown names fall back to `Info`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "all" => Self::Trace,
            "debug" | "verbose" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" | "err" | "quiet" => Self::Error,
            _ => Self::Info,
        }
    }
}

/// Fixture outcome recorded on `case_*` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
    Error,
}

/// Structured log record.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    /// Fixture family, e.g. `stdio/printf`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ns: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_refs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    /// Create a new log entry with required fields only.
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            run_id: None,
            family: None,
            symbol: None,
            case: None,
            outcome: None,
            latency_ns: None,
            artifact_refs: None,
            details: None,
        }
    }

    /// Set the fixture family and the function under test.
    #[must_use]
    pub fn with_api(mut self, family: impl Into<String>, symbol: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self.symbol = Some(symbol.into());
        self
    }

    #[must_use]
    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.case = Some(case.into());
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    #[must_use]
    pub fn with_latency_ns(mut self, ns: u64) -> Self {
        self.latency_ns = Some(ns);
        self
    }

    #[must_use]
    pub fn with_artifacts(mut self, refs: Vec<String>) -> Self {
        self.artifact_refs = Some(refs);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Serialize to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Artifact index
// ---------------------------------------------------------------------------

/// A single artifact entry in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub path: String,
    pub kind: String,
    pub sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// Artifact index linking a run's log to the files it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactIndex {
    pub index_version: u32,
    pub run_id: String,
    pub generated_utc: String,
    pub artifacts: Vec<ArtifactEntry>,
}

impl ArtifactIndex {
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            index_version: 1,
            run_id: run_id.into(),
            generated_utc: now_utc(),
            artifacts: Vec::new(),
        }
    }

    /// Record in-memory content that was (or will be) written to `path`.
    pub fn add_bytes(&mut self, path: &Path, kind: impl Into<String>, bytes: &[u8]) -> &mut Self {
        self.artifacts.push(ArtifactEntry {
            path: path.display().to_string(),
            kind: kind.into(),
            sha256: sha256_hex(bytes),
            size_bytes: Some(bytes.len() as u64),
        });
        self
    }

    /// Hash a file already on disk and record it.
    pub fn add_file(&mut self, path: &Path, kind: impl Into<String>) -> std::io::Result<&mut Self> {
        let bytes = std::fs::read(path)?;
        Ok(self.add_bytes(path, kind, &bytes))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

// ---------------------------------------------------------------------------
// Log emitter
// ---------------------------------------------------------------------------

/// Writes structured JSONL log entries.
///
/// Trace ids have the form `<run_id>::<campaign>::<seq>`. Entries below the
/// emitter's minimum level are dropped without consuming a sequence number.
pub struct LogEmitter<W: Write> {
    writer: W,
    seq: u64,
    run_id: String,
    campaign: String,
    min_level: LogLevel,
}

impl LogEmitter<std::io::BufWriter<std::fs::File>> {
    /// Create an emitter that writes to a file.
    pub fn to_file(path: &Path, run_id: &str, campaign: &str) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(std::io::BufWriter::new(file), run_id, campaign))
    }
}

impl LogEmitter<Vec<u8>> {
    /// Create an emitter that writes to an in-memory buffer.
    #[must_use]
    pub fn to_buffer(run_id: &str, campaign: &str) -> Self {
        Self::new(Vec::new(), run_id, campaign)
    }
}

impl<W: Write> LogEmitter<W> {
    pub fn new(writer: W, run_id: &str, campaign: &str) -> Self {
        Self {
            writer,
            seq: 0,
            run_id: run_id.to_string(),
            campaign: campaign.to_string(),
            min_level: LogLevel::Trace,
        }
    }

    /// Drop entries less severe than `level`.
    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    fn next_trace_id(&mut self) -> String {
        self.seq += 1;
        format!("{}::{}::{:03}", self.run_id, self.campaign, self.seq)
    }

    /// Start an entry with a fresh trace id and this emitter's run id.
    pub fn entry(&mut self, level: LogLevel, event: &str) -> LogEntry {
        let mut entry = LogEntry::new(String::new(), level, event);
        entry.run_id = Some(self.run_id.clone());
        entry
    }

    /// Emit a bare event.
    pub fn emit(&mut self, level: LogLevel, event: &str) -> std::io::Result<()> {
        let entry = self.entry(level, event);
        self.emit_entry(entry)
    }

    /// Emit a fully-populated entry, filling `trace_id` and `run_id` if unset.
    pub fn emit_entry(&mut self, mut entry: LogEntry) -> std::io::Result<()> {
        if entry.level < self.min_level {
            return Ok(());
        }
        if entry.trace_id.is_empty() {
            entry.trace_id = self.next_trace_id();
        }
        if entry.run_id.is_none() {
            entry.run_id = Some(self.run_id.clone());
        }
        let line = entry.to_jsonl().map_err(std::io::Error::other)?;
        writeln!(self.writer, "{line}")
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    /// Number of entries written so far.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.seq
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validation error for a log line.
#[derive(Debug)]
pub struct LogValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for LogValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: field '{}': {}",
            self.line_number, self.field, self.message
        )
    }
}

/// Validate a single JSONL line against the log schema.
pub fn validate_log_line(
    line: &str,
    line_number: usize,
) -> Result<LogEntry, Vec<LogValidationError>> {
    let mut errors = Vec::new();
    let mut fail = |field: &str, message: String| {
        errors.push(LogValidationError {
            line_number,
            field: field.to_string(),
            message,
        });
    };

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            fail("<json>", format!("invalid JSON: {e}"));
            return Err(errors);
        }
    };
    let Some(obj) = value.as_object() else {
        fail("<root>", "expected JSON object".to_string());
        return Err(errors);
    };

    for field in ["timestamp", "trace_id", "level", "event"] {
        match obj.get(field) {
            None => fail(field, "required field missing".to_string()),
            Some(v) if !v.is_string() => fail(field, "expected string".to_string()),
            Some(_) => {}
        }
    }

    if let Some(level) = obj.get("level").and_then(|v| v.as_str())
        && !LogLevel::NAMES.contains(&level)
    {
        fail("level", format!("invalid level: '{level}'"));
    }

    if let Some(outcome) = obj.get("outcome").and_then(|v| v.as_str())
        && !["pass", "fail", "skip", "error"].contains(&outcome)
    {
        fail("outcome", format!("invalid outcome: '{outcome}'"));
    }

    // Case events must say which fixture they belong to.
    if obj.get("outcome").is_some() && !obj.get("case").is_some_and(serde_json::Value::is_string) {
        fail("case", "outcome events must name their case".to_string());
    }

    if let Some(trace_id) = obj.get("trace_id").and_then(|v| v.as_str())
        && trace_id.split("::").count() != 3
    {
        fail(
            "trace_id",
            format!("trace_id should follow <run_id>::<campaign>::<seq> format, got: '{trace_id}'"),
        );
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value::<LogEntry>(value).map_err(|e| {
        vec![LogValidationError {
            line_number,
            field: "<deserialization>".to_string(),
            message: format!("failed to deserialize: {e}"),
        }]
    })
}

/// Validate an entire JSONL file.
///
/// Returns the number of non-blank lines and every validation error found.
pub fn validate_log_file(path: &Path) -> Result<(usize, Vec<LogValidationError>), std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    let mut all_errors = Vec::new();
    let mut line_count = 0;

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        line_count += 1;
        if let Err(errs) = validate_log_line(line, i + 1) {
            all_errors.extend(errs);
        }
    }

    Ok((line_count, all_errors))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[must_use]
pub fn now_utc() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format_utc(duration.as_secs(), duration.subsec_millis())
}

/// Format seconds since the epoch using the proleptic Gregorian calendar.
fn format_utc(secs: u64, millis: u32) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;

    // Days-from-civil inverse, with eras starting on 0000-03-01.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);

    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{millis:03}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_entry_serializes_required_fields() {
        let entry = LogEntry::new("run-1::verify::001", LogLevel::Info, "run_start");
        let json = entry.to_jsonl().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["timestamp"].is_string());
        assert_eq!(parsed["trace_id"], "run-1::verify::001");
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["event"], "run_start");
        assert!(parsed.get("run_id").is_none());
        assert!(parsed.get("outcome").is_none());
        assert!(parsed.get("details").is_none());
    }

    #[test]
    fn optional_fields_serialize_when_set() {
        let entry = LogEntry::new("r::c::001", LogLevel::Warn, "case_result")
            .with_api("stdio/printf", "snprintf")
            .with_case("pad_left")
            .with_outcome(Outcome::Fail)
            .with_latency_ns(1200);
        let parsed: serde_json::Value = serde_json::from_str(&entry.to_jsonl().unwrap()).unwrap();
        assert_eq!(parsed["family"], "stdio/printf");
        assert_eq!(parsed["symbol"], "snprintf");
        assert_eq!(parsed["outcome"], "fail");
        assert_eq!(parsed["latency_ns"], 1200);
    }

    #[test]
    fn validate_accepts_emitted_entry() {
        let entry = LogEntry::new("r::c::001", LogLevel::Info, "case_result")
            .with_case("x")
            .with_outcome(Outcome::Pass);
        let line = entry.to_jsonl().unwrap();
        assert!(validate_log_line(&line, 1).is_ok());
    }

    #[test]
    fn validate_reports_missing_fields() {
        let errors = validate_log_line(r#"{"trace_id":"a::b::1"}"#, 7).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"timestamp"));
        assert!(fields.contains(&"level"));
        assert!(fields.contains(&"event"));
        assert!(errors.iter().all(|e| e.line_number == 7));
    }

    #[test]
    fn validate_rejects_bad_enums_and_trace_ids() {
        let line = r#"{"timestamp":"t","trace_id":"flat","level":"loud","event":"e"}"#;
        let errors = validate_log_line(line, 1).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "level"));
        assert!(errors.iter().any(|e| e.field == "trace_id"));

        let line =
            r#"{"timestamp":"t","trace_id":"a::b::1","level":"info","event":"e","outcome":"pass"}"#;
        let errors = validate_log_line(line, 1).unwrap_err();
        assert_eq!(errors[0].field, "case");
    }

    #[test]
    fn validate_rejects_non_objects() {
        assert_eq!(validate_log_line("[1,2]", 3).unwrap_err()[0].field, "<root>");
        assert_eq!(validate_log_line("{oops", 3).unwrap_err()[0].field, "<json>");
    }

    #[test]
    fn emitter_generates_sequential_trace_ids() {
        let mut emitter = LogEmitter::to_buffer("run-9", "verify");
        emitter.emit(LogLevel::Info, "a").unwrap();
        emitter.emit(LogLevel::Info, "b").unwrap();
        assert_eq!(emitter.emitted(), 2);

        let text = String::from_utf8(emitter.into_inner()).unwrap();
        let ids: Vec<String> = text
            .lines()
            .map(|l| validate_log_line(l, 0).unwrap().trace_id)
            .collect();
        assert_eq!(ids, ["run-9::verify::001", "run-9::verify::002"]);
    }

    #[test]
    fn emitter_drops_entries_below_min_level() {
        let mut emitter =
            LogEmitter::to_buffer("run", "c").with_min_level(LogLevel::Warn);
        emitter.emit(LogLevel::Debug, "noise").unwrap();
        emitter.emit(LogLevel::Error, "kept").unwrap();
        assert_eq!(emitter.emitted(), 1);
        let text = String::from_utf8(emitter.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("run::c::001"));
    }

    #[test]
    fn level_parsing_is_loose() {
        assert_eq!(LogLevel::from_str_loose("WARNING"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_loose(" debug "), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_loose("bogus"), LogLevel::Info);
        assert!(LogLevel::Trace < LogLevel::Error);
    }

    #[test]
    fn artifact_index_hashes_content() {
        let mut index = ArtifactIndex::new("run-1");
        index.add_bytes(Path::new("report.md"), "report", b"abc");
        assert_eq!(
            index.artifacts[0].sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(index.artifacts[0].size_bytes, Some(3));
        let parsed: serde_json::Value = serde_json::from_str(&index.to_json().unwrap()).unwrap();
        assert_eq!(parsed["index_version"], 1);
        assert_eq!(parsed["artifacts"][0]["kind"], "report");
    }

    #[test]
    fn utc_formatting_handles_calendar() {
        assert_eq!(format_utc(0, 0), "1970-01-01T00:00:00.000Z");
        // 2000-02-29 12:34:56 (leap day).
        assert_eq!(format_utc(951_827_696, 7), "2000-02-29T12:34:56.007Z");
        // 2026-10-18 00:00:00.
        assert_eq!(format_utc(1_792_281_600, 0), "2026-10-18T00:00:00.000Z");
    }

    #[test]
    fn roundtrip_deserialization() {
        let entry = LogEntry::new("r::c::001", LogLevel::Error, "case_error")
            .with_case("broken")
            .with_outcome(Outcome::Error)
            .with_details(serde_json::json!({"error": "unsupported function `x`"}));
        let back: LogEntry = serde_json::from_str(&entry.to_jsonl().unwrap()).unwrap();
        assert_eq!(back.outcome, Some(Outcome::Error));
        assert_eq!(back.case.as_deref(), Some("broken"));
        assert_eq!(back.details, entry.details);
    }
}
