//! Fixture execution against the core engines.
//!
//! Every supported function takes a JSON object of inputs and renders its
//! result as one line of text, which is what fixtures compare against:
//!
//! | function | inputs | rendering |
//! |----------|--------|-----------|
//! | `snprintf` | `format`, `args`, `capacity` | `ret=N out="..."[ counts=[..]]` |
//! | `sprintf` | `format`, `args` | same as `snprintf` |
//! | `sscanf` | `input`, `format`, `targets` | `ret=N values=[..]` |
//! | `strtoul`, `strtoq`, `strtouq` | `text`, `base` | `value=V end=E` |
//! | `ksprintn` | `value`, `base`, `upper` | `digits=D len=L` |
//!
//! A [`FormatError`] from the engine renders as `error: <message>` so that
//! argument-contract violations can be fixtures too.

use std::str::FromStr;

use minifmt_core::stdio::digits::digits_forward;
use minifmt_core::stdio::{MAXNBUF, ksprintn};
use minifmt_core::{
    FormatArg, FormatError, ScanArg, snprintf, sprintf, sscanf, strtoq, strtoul, strtouq,
};
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

// ---------------------------------------------------------------------------
// Argument and target descriptions
// ---------------------------------------------------------------------------

/// One formatter operand as written in a fixture or on the command line.
///
/// JSON: `{"int": -5}`, `{"uint": 7}`, `{"char": 97}`, `{"ptr": 16}`,
/// `{"str": "text"}`, `{"str": null}`, `"count"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgSpec {
    Int(i64),
    Uint(u64),
    Char(u8),
    Ptr(usize),
    Str(Option<String>),
    Count,
}

/// One scanner target. JSON: `"int"`, `"uint"`, `"ptr"`, `{"chars": 16}`, `"count"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSpec {
    Int,
    Uint,
    Ptr,
    Chars(usize),
    Count,
}

fn parse_int<T: FromStr>(field: &'static str, text: &str) -> Result<T, HarnessError> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16)
            .ok()
            .and_then(|v| v.to_string().parse().ok()),
        None => text.parse().ok(),
    };
    parsed.ok_or_else(|| HarnessError::bad_input(field, format!("not a number: `{text}`")))
}

/// Command-line form: `int:-5`, `uint:7`, `char:a`, `char:97`, `ptr:0x10`,
/// `str:text`, `null`, `count`.
impl FromStr for ArgSpec {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s.split_once(':').unwrap_or((s, ""));
        Ok(match kind {
            "int" => Self::Int(parse_int("arg", value)?),
            "uint" => Self::Uint(parse_int("arg", value)?),
            "ptr" => Self::Ptr(parse_int("arg", value)?),
            "char" => match value.as_bytes() {
                [c] => Self::Char(*c),
                _ => Self::Char(parse_int("arg", value)?),
            },
            "str" => Self::Str(Some(value.to_string())),
            "null" => Self::Str(None),
            "count" => Self::Count,
            _ => return Err(HarnessError::bad_input("arg", format!("unknown kind `{kind}`"))),
        })
    }
}

/// Command-line form: `int`, `uint`, `ptr`, `chars:16`, `count`.
impl FromStr for TargetSpec {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s.split_once(':').unwrap_or((s, ""));
        Ok(match kind {
            "int" => Self::Int,
            "uint" => Self::Uint,
            "ptr" => Self::Ptr,
            "chars" => Self::Chars(parse_int("target", value)?),
            "count" => Self::Count,
            _ => return Err(HarnessError::bad_input("target", format!("unknown kind `{kind}`"))),
        })
    }
}

// ---------------------------------------------------------------------------
// Operand storage
// ---------------------------------------------------------------------------

/// Backing storage for one formatter argument. `%n` slots need somewhere to
/// write; everything else borrows from its [`ArgSpec`].
#[derive(Debug)]
pub(crate) enum Operand<'s> {
    Value(&'s ArgSpec),
    Count(i64),
}

impl<'s> Operand<'s> {
    pub(crate) fn for_specs(specs: &'s [ArgSpec]) -> Vec<Self> {
        specs
            .iter()
            .map(|spec| match spec {
                ArgSpec::Count => Self::Count(0),
                other => Self::Value(other),
            })
            .collect()
    }

    fn as_arg(&mut self) -> FormatArg<'_> {
        match self {
            Self::Count(slot) => FormatArg::Count(slot),
            Self::Value(spec) => match spec {
                ArgSpec::Int(v) => FormatArg::Int(*v),
                ArgSpec::Uint(v) => FormatArg::Uint(*v),
                ArgSpec::Char(c) => FormatArg::Char(*c),
                ArgSpec::Ptr(p) => FormatArg::Ptr(*p),
                ArgSpec::Str(s) => FormatArg::Str(s.as_deref().map(str::as_bytes)),
                ArgSpec::Count => FormatArg::Int(0),
            },
        }
    }
}

/// Borrow a fresh argument slice from `operands`.
pub(crate) fn borrow_args<'a>(operands: &'a mut [Operand<'_>]) -> Vec<FormatArg<'a>> {
    operands.iter_mut().map(Operand::as_arg).collect()
}

/// Values `%n` stored, in argument order.
pub(crate) fn counts(operands: &[Operand<'_>]) -> Vec<i64> {
    operands
        .iter()
        .filter_map(|op| match op {
            Operand::Count(v) => Some(*v),
            Operand::Value(_) => None,
        })
        .collect()
}

/// Backing storage for one scanner target.
#[derive(Debug)]
enum Slot {
    Int(i64),
    Uint(u64),
    Ptr(usize),
    Chars(Vec<u8>),
    Count(i64),
}

impl Slot {
    fn for_target(target: &TargetSpec) -> Self {
        match *target {
            TargetSpec::Int => Self::Int(0),
            TargetSpec::Uint => Self::Uint(0),
            TargetSpec::Ptr => Self::Ptr(0),
            TargetSpec::Chars(n) => Self::Chars(vec![0; n]),
            TargetSpec::Count => Self::Count(0),
        }
    }

    fn as_arg(&mut self) -> ScanArg<'_> {
        match self {
            Self::Int(v) => ScanArg::Int(v),
            Self::Uint(v) => ScanArg::Uint(v),
            Self::Ptr(v) => ScanArg::Ptr(v),
            Self::Chars(buf) => ScanArg::Chars(buf.as_mut_slice()),
            Self::Count(v) => ScanArg::Count(v),
        }
    }

    fn render(&self, out: &mut String) {
        let text = match self {
            Self::Int(v) | Self::Count(v) => v.to_string(),
            Self::Uint(v) => v.to_string(),
            Self::Ptr(v) => format!("{v:#x}"),
            Self::Chars(buf) => format!("\"{}\"", until_nul(buf).escape_ascii()),
        };
        out.push_str(&text);
    }
}

fn until_nul(buf: &[u8]) -> &[u8] {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    &buf[..end]
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Format `format` with `specs`, into a `capacity`-byte buffer when given,
/// unbounded otherwise.
#[must_use]
pub fn render_format(format: &[u8], specs: &[ArgSpec], capacity: Option<usize>) -> String {
    let mut operands = Operand::for_specs(specs);
    let (result, text): (Result<usize, FormatError>, Vec<u8>) = {
        let mut args = borrow_args(&mut operands);
        match capacity {
            Some(cap) => {
                let mut dst = vec![0u8; cap];
                let result = snprintf(&mut dst, format, &mut args);
                (result, until_nul(&dst).to_vec())
            }
            None => {
                let mut out = Vec::new();
                let result = sprintf(&mut out, format, &mut args);
                (result, out)
            }
        }
    };

    match result {
        Ok(n) => {
            let mut line = format!("ret={n} out=\"{}\"", text.escape_ascii());
            let counts = counts(&operands);
            if !counts.is_empty() {
                line.push_str(&format!(" counts={counts:?}"));
            }
            line
        }
        Err(err) => format!("error: {err}"),
    }
}

/// Scan `input` against `format` into fresh targets.
#[must_use]
pub fn render_scan(input: &[u8], format: &[u8], targets: &[TargetSpec]) -> String {
    let mut slots: Vec<Slot> = targets.iter().map(Slot::for_target).collect();
    let result = {
        let mut args: Vec<ScanArg<'_>> = slots.iter_mut().map(Slot::as_arg).collect();
        sscanf(input, format, &mut args)
    };

    match result {
        Ok(outcome) => {
            let mut line = format!("ret={} values=[", outcome.as_c_int());
            for (i, slot) in slots.iter().enumerate() {
                if i > 0 {
                    line.push_str(", ");
                }
                slot.render(&mut line);
            }
            line.push(']');
            line
        }
        Err(err) => format!("error: {err}"),
    }
}

fn render_decode(function: &str, text: &[u8], base: u32) -> String {
    let (value, end) = match function {
        "strtoul" => {
            let (v, e) = strtoul(text, base);
            (v.to_string(), e)
        }
        "strtoq" => {
            let (v, e) = strtoq(text, base);
            (v.to_string(), e)
        }
        _ => {
            let (v, e) = strtouq(text, base);
            (v.to_string(), e)
        }
    };
    format!("value={value} end={end}")
}

fn render_encode(value: u64, base: u32, upper: bool) -> Result<String, HarnessError> {
    if !(2..=36).contains(&base) {
        return Err(HarnessError::bad_input("base", format!("{base} is outside 2..=36")));
    }
    let mut nbuf = [0u8; MAXNBUF];
    let len = ksprintn(&mut nbuf, value, base, upper);
    let digits: String = digits_forward(&nbuf, len).map(char::from).collect();
    Ok(format!("digits={digits} len={len}"))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Inputs shared by `snprintf` and `sprintf` fixtures.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatInputs {
    pub format: String,
    #[serde(default)]
    pub args: Vec<ArgSpec>,
    #[serde(default)]
    pub capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ScanInputs {
    input: String,
    format: String,
    #[serde(default)]
    targets: Vec<TargetSpec>,
}

#[derive(Debug, Deserialize)]
struct DecodeInputs {
    text: String,
    base: u32,
}

#[derive(Debug, Deserialize)]
struct EncodeInputs {
    value: u64,
    base: u32,
    #[serde(default)]
    upper: bool,
}

/// Functions [`execute_fixture_case`] knows how to call.
pub const SUPPORTED_FUNCTIONS: &[&str] = &[
    "snprintf", "sprintf", "sscanf", "strtoul", "strtoq", "strtouq", "ksprintn",
];

/// Run one fixture call and render its result.
pub fn execute_fixture_case(
    function: &str,
    inputs: &serde_json::Value,
) -> Result<String, HarnessError> {
    match function {
        "snprintf" => {
            let inputs: FormatInputs = serde_json::from_value(inputs.clone())?;
            let capacity = inputs
                .capacity
                .ok_or_else(|| HarnessError::bad_input("capacity", "snprintf needs a capacity"))?;
            Ok(render_format(inputs.format.as_bytes(), &inputs.args, Some(capacity)))
        }
        "sprintf" => {
            let inputs: FormatInputs = serde_json::from_value(inputs.clone())?;
            Ok(render_format(inputs.format.as_bytes(), &inputs.args, None))
        }
        "sscanf" => {
            let inputs: ScanInputs = serde_json::from_value(inputs.clone())?;
            Ok(render_scan(
                inputs.input.as_bytes(),
                inputs.format.as_bytes(),
                &inputs.targets,
            ))
        }
        "strtoul" | "strtoq" | "strtouq" => {
            let inputs: DecodeInputs = serde_json::from_value(inputs.clone())?;
            Ok(render_decode(function, inputs.text.as_bytes(), inputs.base))
        }
        "ksprintn" => {
            let inputs: EncodeInputs = serde_json::from_value(inputs.clone())?;
            render_encode(inputs.value, inputs.base, inputs.upper)
        }
        other => Err(HarnessError::UnsupportedFunction(other.to_string())),
    }
}
