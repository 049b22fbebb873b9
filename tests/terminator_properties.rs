//! Property-based tests for line terminator detection

use fast_posfilter::core::{detect_terminator, DetectError, LineTerminator};
use proptest::prelude::*;
use std::io::{BufReader, Read};

/// First-line content: any bytes except line terminators
fn arb_first_line() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>().prop_filter("no terminator", |b| *b != b'\n' && *b != b'\r'), 0..300)
}

fn arb_terminator() -> impl Strategy<Value = LineTerminator> {
    prop_oneof![
        Just(LineTerminator::Lf),
        Just(LineTerminator::CrLf),
        Just(LineTerminator::Cr),
    ]
}

/// Remainder of the stream; must not start with `\n` after a bare `\r`
fn arb_rest() -> impl Strategy<Value = Vec<u8>> {
    "[a-z0-9\t]{0,100}".prop_map(|s| s.into_bytes())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The detected terminator and the consumed header match what was written,
    /// whatever the reader's buffer size.
    #[test]
    fn prop_detects_written_terminator(
        first in arb_first_line(),
        terminator in arb_terminator(),
        rest in arb_rest(),
        capacity in 1usize..64,
    ) {
        let mut input = first.clone();
        input.extend_from_slice(terminator.as_bytes());
        input.extend_from_slice(&rest);

        let mut reader = BufReader::with_capacity(capacity, &input[..]);
        let detected = detect_terminator(&mut reader).unwrap();

        prop_assert_eq!(detected.terminator, terminator);
        prop_assert_eq!(detected.consumed, first);

        // Nothing past the terminator is consumed
        let mut remaining = Vec::new();
        reader.read_to_end(&mut remaining).unwrap();
        prop_assert_eq!(remaining, rest);
    }

    /// A stream without any terminator reports end of stream with everything consumed.
    #[test]
    fn prop_eof_without_terminator(first in arb_first_line()) {
        let mut reader = &first[..];
        match detect_terminator(&mut reader) {
            Err(DetectError::UnexpectedEof { consumed }) => prop_assert_eq!(consumed, first),
            other => prop_assert!(false, "unexpected result: {:?}", other),
        }
    }
}

#[test]
fn test_terminator_widths() {
    assert_eq!(LineTerminator::Lf.width(), 1);
    assert_eq!(LineTerminator::CrLf.width(), 2);
    assert_eq!(LineTerminator::Cr.width(), 1);
    assert_eq!(LineTerminator::CrLf.delimiter(), b'\n');
    assert_eq!(LineTerminator::Cr.delimiter(), b'\r');
}
