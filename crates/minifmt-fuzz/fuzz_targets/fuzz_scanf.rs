#![no_main]
use libfuzzer_sys::fuzz_target;
use minifmt_core::{ScanArg, ScanOutcome, sscanf};

fuzz_target!(|data: &[u8]| {
    // Layout: [format length, format..., input...].
    let Some((&flen, rest)) = data.split_first() else {
        return;
    };
    let (fmt, input) = rest.split_at(usize::from(flen).min(rest.len()));

    let (mut a, mut b) = (0_i64, 0_i64);
    let mut u = 0_u64;
    let mut p = 0_usize;
    let mut text = [0u8; 8];
    let mut chars = [0u8; 4];
    let mut count = 0_i64;
    let mut args = [
        ScanArg::Int(&mut a),
        ScanArg::Uint(&mut u),
        ScanArg::Chars(&mut text),
        ScanArg::Int(&mut b),
        ScanArg::Ptr(&mut p),
        ScanArg::Chars(&mut chars),
        ScanArg::Count(&mut count),
    ];
    // Contract violations are errors; they must never panic.
    if let Ok(ScanOutcome::Assigned(n)) = sscanf(input, fmt, &mut args) {
        assert!(n <= 6, "more assignments than assignable targets");
    }
});
