#![no_main]
use libfuzzer_sys::fuzz_target;
use minifmt_core::{Discard, FormatArg, snprintf, sprintf};

const GUARD: u8 = 0xA5;
/// Longest rendering replayed into a `Vec`; wider fields are only measured.
const MAX_MATERIALIZED: usize = 1 << 20;

/// Six operands whose kinds follow the selector bits, then one `%n` slot.
fn operands(selector: u8, slot: &mut i64) -> Vec<FormatArg<'_>> {
    let mut args: Vec<FormatArg<'_>> = (0..6)
        .map(|bit| match (selector >> bit) & 1 {
            0 => FormatArg::Int(i64::from(selector) * -977),
            _ => FormatArg::Str(Some(b"fuzz".as_slice())),
        })
        .collect();
    args.push(FormatArg::Count(slot));
    args
}

fuzz_target!(|data: &[u8]| {
    // Layout: [capacity, selector, format...]. The selector mixes operand
    // kinds so that both matched and mismatched slices get exercised.
    let [cap, selector, fmt @ ..] = data else {
        return;
    };
    let cap = usize::from(*cap);

    let mut measure_slot = 0_i64;
    let measured = sprintf(&mut Discard, fmt, &mut operands(*selector, &mut measure_slot));
    if matches!(measured, Ok(len) if len > MAX_MATERIALIZED) {
        return;
    }

    let mut full = Vec::new();
    let mut slot_full = 0_i64;
    let unbounded = sprintf(&mut full, fmt, &mut operands(*selector, &mut slot_full));

    let mut storage = vec![GUARD; cap + 16];
    let mut slot_bounded = 0_i64;
    let bounded = snprintf(
        &mut storage[..cap],
        fmt,
        &mut operands(*selector, &mut slot_bounded),
    );

    assert_eq!(bounded, unbounded, "bounded and unbounded calls disagree");
    assert!(storage[cap..].iter().all(|&b| b == GUARD), "wrote past capacity");
    if let Ok(total) = unbounded {
        assert_eq!(total, full.len());
        assert_eq!(slot_full, slot_bounded, "%n must record the logical length");
        if cap > 0 {
            let kept = total.min(cap - 1);
            assert_eq!(&storage[..kept], &full[..kept]);
            assert_eq!(storage[kept], 0);
        }
    }
});
