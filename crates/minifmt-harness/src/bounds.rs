//! Bounded-write sweep.
//!
//! Replays every formatter fixture through `snprintf` at each capacity from 0
//! to two bytes past the unbounded length and checks that:
//! - the return value is the unbounded length at every capacity,
//! - nothing is written at or beyond the capacity,
//! - the kept prefix matches the unbounded rendering and is NUL-terminated,
//! - `%n` slots receive the same values at every capacity,
//! - a call that fails unbounded fails identically when bounded.

use serde::{Deserialize, Serialize};

use minifmt_core::{FormatError, snprintf, sprintf};

use crate::error::HarnessError;
use crate::exec::{ArgSpec, FormatInputs, Operand, borrow_args, counts};
use crate::fixtures::FixtureSet;

const GUARD: u8 = 0xEE;
const GUARD_LEN: usize = 8;

/// One broken property at one capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundsViolation {
    pub case_name: String,
    pub capacity: usize,
    pub message: String,
}

/// Totals for a sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundsReport {
    /// Formatter cases swept.
    pub cases: usize,
    /// `snprintf` calls made across all cases.
    pub calls: usize,
    pub violations: Vec<BoundsViolation>,
}

impl BoundsReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Fold another sweep's totals into this one.
    pub fn absorb(&mut self, other: Self) {
        self.cases += other.cases;
        self.calls += other.calls;
        self.violations.extend(other.violations);
    }
}

/// Sweep one format/argument pair.
#[must_use]
pub fn sweep_format(case_name: &str, format: &[u8], specs: &[ArgSpec]) -> BoundsReport {
    let mut report = BoundsReport {
        cases: 1,
        ..BoundsReport::default()
    };
    let mut violation = |capacity: usize, message: String| {
        report.violations.push(BoundsViolation {
            case_name: case_name.to_string(),
            capacity,
            message,
        });
    };

    let mut operands = Operand::for_specs(specs);
    let mut full = Vec::new();
    let unbounded: Result<usize, FormatError> =
        sprintf(&mut full, format, &mut borrow_args(&mut operands));
    let full_counts = counts(&operands);

    let limit = full.len() + 2;
    for capacity in 0..=limit {
        let mut operands = Operand::for_specs(specs);
        let mut storage = vec![GUARD; capacity + GUARD_LEN];
        let bounded = snprintf(
            &mut storage[..capacity],
            format,
            &mut borrow_args(&mut operands),
        );

        if bounded != unbounded {
            violation(
                capacity,
                format!("returned {bounded:?}, unbounded call returned {unbounded:?}"),
            );
            continue;
        }
        if storage[capacity..].iter().any(|&b| b != GUARD) {
            violation(capacity, "wrote past the capacity".to_string());
        }
        if unbounded.is_err() {
            continue;
        }
        if capacity > 0 {
            let kept = full.len().min(capacity - 1);
            if storage[..kept] != full[..kept] {
                violation(capacity, "kept prefix differs from unbounded output".to_string());
            }
            if storage[kept] != 0 {
                violation(capacity, format!("no NUL terminator at offset {kept}"));
            }
        }
        let bounded_counts = counts(&operands);
        if bounded_counts != full_counts {
            violation(
                capacity,
                format!("%n stored {bounded_counts:?}, unbounded stored {full_counts:?}"),
            );
        }
    }
    report.calls = limit + 1;
    report
}

/// Sweep every `snprintf`/`sprintf` case in `set`.
pub fn sweep_set(set: &FixtureSet) -> Result<BoundsReport, HarnessError> {
    let mut report = BoundsReport::default();
    for case in &set.cases {
        if !matches!(case.function.as_str(), "snprintf" | "sprintf") {
            continue;
        }
        let inputs: FormatInputs = serde_json::from_value(case.inputs.clone())?;
        report.absorb(sweep_format(&case.name, inputs.format.as_bytes(), &inputs.args));
    }
    Ok(report)
}
