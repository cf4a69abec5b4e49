//! Errors raised by the formatting engines.
//!
//! Malformed *input* is never an error: truncation, overflow and scanner
//! mismatches all have well-defined results. What is reported here are
//! contract violations between a format string and the arguments handed to it.

/// Argument/format contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// A directive needed argument `index` (zero-based) but the slice ran out.
    #[error("directive needs argument #{index}, only {index} supplied")]
    MissingArgument { index: usize },
    /// Argument `index` has a kind the directive cannot consume.
    #[error("argument #{index} is {found}, directive expects {expected}")]
    ArgumentMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    /// A `%[` scan-set ran into the end of the format before its `]`.
    #[error("scan-set is not terminated (format ends at offset {offset})")]
    UnterminatedScanSet { offset: usize },
}
