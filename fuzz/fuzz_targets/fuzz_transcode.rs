#![no_main]

use libfuzzer_sys::fuzz_target;
use lingotouch::braille::{glyph_for, transcode};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let braille = transcode(&text);

    // Never longer than the input, counted in chars.
    assert!(braille.chars().count() <= text.chars().count());

    // Every output char is a table cell, in input order.
    let expected: String = text.chars().filter_map(glyph_for).collect();
    assert_eq!(braille, expected);

    // A second pass only keeps word separators.
    assert!(transcode(&braille).chars().all(|c| c == ' '));
});
