//! Integration test: formatter contract matrix
//!
//! Each case pairs a directive string and its arguments with the exact bytes
//! the engine must produce, then replays it at every capacity to check the
//! bounded-write contract against the unbounded rendering.
//!
//! Run: cargo test -p minifmt-core --test printf_contract_test

use minifmt_core::{Discard, FormatArg, FormatError, snprintf, sprintf};

struct Case {
    fmt: &'static str,
    args: fn() -> Vec<FormatArg<'static>>,
    expected: &'static str,
}

fn render(fmt: &str, mut args: Vec<FormatArg<'_>>) -> Vec<u8> {
    let mut out = Vec::new();
    let n = sprintf(&mut out, fmt.as_bytes(), &mut args).expect("format should succeed");
    assert_eq!(n, out.len(), "logical length disagrees with Vec sink for {fmt:?}");
    out
}

// ---------------------------------------------------------------------------
// 1. Rendering matrix
// ---------------------------------------------------------------------------

const CASES: &[Case] = &[
    Case { fmt: "%d|%i", args: || vec![0.into(), (-1).into()], expected: "0|-1" },
    Case { fmt: "[%6d]", args: || vec![(-123).into()], expected: "[  -123]" },
    Case { fmt: "[%-6d]", args: || vec![(-123).into()], expected: "[-123  ]" },
    Case { fmt: "[%06d]", args: || vec![(-123).into()], expected: "[-00123]" },
    Case { fmt: "[%6.4d]", args: || vec![7.into()], expected: "[  0007]" },
    Case { fmt: "[%-6.4d]", args: || vec![7.into()], expected: "[0007  ]" },
    Case { fmt: "%u", args: || vec![(-1).into()], expected: "4294967295" },
    Case { fmt: "%lu", args: || vec![(-1).into()], expected: "18446744073709551615" },
    Case { fmt: "%o", args: || vec![8.into()], expected: "10" },
    Case { fmt: "%x %X", args: || vec![0xABCD.into(), 0xABCD.into()], expected: "abcd ABCD" },
    Case { fmt: "%#X", args: || vec![0xABCD.into()], expected: "0xABCD" },
    Case { fmt: "[%#8x]", args: || vec![0x1F.into()], expected: "[    0x1f]" },
    Case { fmt: "[%#-8x]", args: || vec![0x1F.into()], expected: "[0x1f    ]" },
    Case { fmt: "[%#08x]", args: || vec![0x1F.into()], expected: "[0x00001f]" },
    Case { fmt: "%y|%+r|%r", args: || vec![(-16).into(), (-16).into(), 16.into()], expected: "-10|-16|16" },
    Case { fmt: "%hhx", args: || vec![0x1234.into()], expected: "34" },
    Case { fmt: "%hx", args: || vec![0x12345.into()], expected: "2345" },
    Case { fmt: "%qx", args: || vec![FormatArg::Uint(u64::MAX)], expected: "ffffffffffffffff" },
    Case { fmt: "%p", args: || vec![FormatArg::Ptr(0x7fff_0010)], expected: "0x7fff0010" },
    Case { fmt: "[%12p]", args: || vec![FormatArg::Ptr(0x10)], expected: "[          10]" },
    Case { fmt: "%c%c%c", args: || vec![FormatArg::Char(b'a'), FormatArg::Char(b'b'), 99.into()], expected: "abc" },
    Case { fmt: "[%s]", args: || vec!["".into()], expected: "[]" },
    Case { fmt: "[%8s]", args: || vec![FormatArg::Str(None)], expected: "[  (null)]" },
    Case { fmt: "[%.2s]", args: || vec![FormatArg::Str(None)], expected: "[(n]" },
    Case { fmt: "[%-4.1s]", args: || vec!["xyz".into()], expected: "[x   ]" },
    Case { fmt: "%*.*d", args: || vec![6.into(), 3.into(), 5.into()], expected: "   005" },
    Case { fmt: "%-*d|", args: || vec![(-4).into(), 1.into()], expected: "   1|" },
    Case { fmt: "%%%d%%", args: || vec![50.into()], expected: "%50%" },
    Case { fmt: "%d %v %d %s", args: || vec![1.into()], expected: "1 %v %d %s" },
    Case { fmt: "trailing %0", args: Vec::new, expected: "trailing %0" },
];

#[test]
fn rendering_matrix() {
    for case in CASES {
        let out = render(case.fmt, (case.args)());
        assert_eq!(
            String::from_utf8_lossy(&out),
            case.expected,
            "format {:?}",
            case.fmt
        );
    }
}

// ---------------------------------------------------------------------------
// 2. Bounded writes at every capacity
// ---------------------------------------------------------------------------

#[test]
fn every_capacity_matches_unbounded_prefix() {
    for case in CASES {
        let full = render(case.fmt, (case.args)());
        for cap in 0..=full.len() + 2 {
            let mut storage = vec![0xEE_u8; cap + 4];
            let total = snprintf(&mut storage[..cap], case.fmt.as_bytes(), &mut (case.args)())
                .expect("format should succeed");
            assert_eq!(total, full.len(), "{:?} at capacity {cap}", case.fmt);
            assert!(storage[cap..].iter().all(|&b| b == 0xEE), "wrote past capacity");
            if cap > 0 {
                let kept = full.len().min(cap - 1);
                assert_eq!(&storage[..kept], &full[..kept], "{:?} at capacity {cap}", case.fmt);
                assert_eq!(storage[kept], 0, "{:?} not terminated at capacity {cap}", case.fmt);
            }
        }
    }
}

#[test]
fn discard_sink_measures() {
    let n = sprintf(&mut Discard, b"%08.3x-%s", &mut [0xFF.into(), "tail".into()]).unwrap();
    assert_eq!(n, 13);
}

#[test]
fn length_formatting_with_empty_destination() {
    let mut dst = [0u8; 0];
    assert_eq!(snprintf(&mut dst, b"%s=%d", &mut ["key".into(), 12345.into()]), Ok(9));
}

// ---------------------------------------------------------------------------
// 3. Argument contract
// ---------------------------------------------------------------------------

#[test]
fn star_consumes_arguments_before_operand() {
    assert_eq!(
        sprintf(&mut Discard, b"%*d", &mut [5.into()]),
        Err(FormatError::MissingArgument { index: 1 })
    );
}

#[test]
fn count_slot_mismatch_is_reported() {
    let err = sprintf(&mut Discard, b"ab%n", &mut [1.into()]).unwrap_err();
    assert_eq!(
        err,
        FormatError::ArgumentMismatch {
            index: 0,
            expected: "count slot",
            found: "integer",
        }
    );
    assert!(err.to_string().contains("#0"));
}

#[test]
fn disabled_directives_need_no_arguments() {
    let mut out = Vec::new();
    assert_eq!(sprintf(&mut out, b"%k%d%s%n", &mut []), Ok(8));
    assert_eq!(out, b"%k%d%s%n");
}
