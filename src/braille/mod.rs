//! Text-to-braille transcoding.
//!
//! Maps the 26 Latin letters and the space character onto Grade 1 braille
//! cells from the Unicode Braille Patterns block (U+2800..U+28FF).
//!
//! ## Design
//! - One static table, never mutated, shared by every caller
//! - ASCII case folding happens once, before lookup
//! - Characters outside the table are dropped, not replaced
//! - Total over `&str`: no error path, no panics, O(n)

// ── Glyph table ──────────────────────────────────────────────────

/// Every mappable character and its braille cell: `a` through `z`, then the
/// word separator. Letters sit at index `letter - b'a'`.
pub const GLYPH_TABLE: [(char, char); 27] = [
    ('a', '⠁'),
    ('b', '⠃'),
    ('c', '⠉'),
    ('d', '⠙'),
    ('e', '⠑'),
    ('f', '⠋'),
    ('g', '⠛'),
    ('h', '⠓'),
    ('i', '⠊'),
    ('j', '⠚'),
    ('k', '⠅'),
    ('l', '⠇'),
    ('m', '⠍'),
    ('n', '⠝'),
    ('o', '⠕'),
    ('p', '⠏'),
    ('q', '⠟'),
    ('r', '⠗'),
    ('s', '⠎'),
    ('t', '⠞'),
    ('u', '⠥'),
    ('v', '⠧'),
    ('w', '⠺'),
    ('x', '⠭'),
    ('y', '⠽'),
    ('z', '⠵'),
    // Braille text uses a blank cell between words; a plain space keeps the
    // output readable in ordinary text fields.
    (' ', ' '),
];

const SPACE_INDEX: usize = 26;

// ── Lookup ───────────────────────────────────────────────────────

/// Look up the braille cell for a single character.
///
/// Uppercase ASCII letters fold to lowercase first. Anything outside
/// `a-z` and space returns `None`.
pub fn glyph_for(c: char) -> Option<char> {
    match c.to_ascii_lowercase() {
        ' ' => Some(GLYPH_TABLE[SPACE_INDEX].1),
        folded @ 'a'..='z' => Some(GLYPH_TABLE[usize::from(folded as u8 - b'a')].1),
        _ => None,
    }
}

/// Whether `c` has an entry in the glyph table (after case folding).
pub fn is_mappable(c: char) -> bool {
    glyph_for(c).is_some()
}

// ── Transcoding ──────────────────────────────────────────────────

/// Transcode `text` into braille.
///
/// Every input character yields at most one output character, in order.
/// Digits, punctuation, accented letters and other scripts are silently
/// dropped; consecutive spaces are kept one-for-one.
///
/// ```
/// assert_eq!(lingotouch::braille::transcode("Hi Bob"), "⠓⠊ ⠃⠕⠃");
/// assert_eq!(lingotouch::braille::transcode("123!"), "");
/// ```
pub fn transcode(text: &str) -> String {
    text.chars().filter_map(glyph_for).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn transcode_cat() {
        assert_eq!(transcode("cat"), "⠉⠁⠞");
    }

    #[test]
    fn transcode_mixed_case_with_space() {
        assert_eq!(transcode("Hi Bob"), "⠓⠊ ⠃⠕⠃");
    }

    #[test]
    fn transcode_empty() {
        assert_eq!(transcode(""), "");
    }

    #[test]
    fn transcode_digits_and_punctuation_dropped() {
        assert_eq!(transcode("123!"), "");
    }

    #[test]
    fn transcode_single_space_between_letters() {
        assert_eq!(transcode("a b"), "⠁ ⠃");
    }

    #[test]
    fn consecutive_spaces_are_not_collapsed() {
        assert_eq!(transcode("a   b"), "⠁   ⠃");
        assert_eq!(transcode("   "), "   ");
    }

    #[test]
    fn non_latin_and_accented_dropped() {
        assert_eq!(transcode("héllo"), "⠓⠇⠇⠕");
        assert_eq!(transcode("नमस्ते"), "");
        assert_eq!(transcode("hola 👋 mundo"), "⠓⠕⠇⠁  ⠍⠥⠝⠙⠕");
    }

    #[test]
    fn tabs_and_newlines_dropped() {
        assert_eq!(transcode("a\tb\nc"), "⠁⠃⠉");
    }

    #[test]
    fn full_alphabet_maps_in_order() {
        let braille = transcode("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(braille, "⠁⠃⠉⠙⠑⠋⠛⠓⠊⠚⠅⠇⠍⠝⠕⠏⠟⠗⠎⠞⠥⠧⠺⠭⠽⠵");
    }

    #[test]
    fn glyph_table_covers_letters_then_space() {
        assert_eq!(GLYPH_TABLE.len(), 27);
        for (i, (source, _)) in GLYPH_TABLE.iter().take(26).enumerate() {
            assert_eq!(*source, char::from(b'a' + i as u8));
        }
        assert_eq!(GLYPH_TABLE[SPACE_INDEX], (' ', ' '));
    }

    #[test]
    fn glyph_table_agrees_with_lookup() {
        for (source, cell) in GLYPH_TABLE {
            assert_eq!(glyph_for(source), Some(cell), "mismatch for {source:?}");
        }
    }

    #[test]
    fn glyph_table_cells_are_distinct() {
        let mut cells: Vec<char> = GLYPH_TABLE.iter().map(|(_, cell)| *cell).collect();
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len(), 27);
    }

    #[test]
    fn letter_cells_live_in_braille_block() {
        for (_, cell) in &GLYPH_TABLE[..SPACE_INDEX] {
            assert!(('\u{2800}'..='\u{28FF}').contains(cell), "{cell:?}");
        }
    }

    #[test]
    fn is_mappable_folds_case() {
        assert!(is_mappable('Q'));
        assert!(is_mappable('q'));
        assert!(is_mappable(' '));
        assert!(!is_mappable('7'));
        assert!(!is_mappable('ß'));
    }

    #[test]
    fn non_ascii_uppercase_is_not_folded_into_table() {
        // Only ASCII folding applies; 'Ä' never becomes a table key.
        assert_eq!(glyph_for('Ä'), None);
    }

    proptest! {
        #[test]
        fn output_never_longer_than_input(s in any::<String>()) {
            prop_assert!(transcode(&s).chars().count() <= s.chars().count());
        }

        #[test]
        fn case_insensitive_for_ascii_letters(s in "[a-zA-Z ]{0,64}") {
            prop_assert_eq!(transcode(&s), transcode(&s.to_uppercase()));
            prop_assert_eq!(transcode(&s), transcode(&s.to_lowercase()));
        }

        #[test]
        fn ascii_letters_and_spaces_map_one_to_one(s in "[a-zA-Z ]{0,64}") {
            prop_assert_eq!(transcode(&s).chars().count(), s.chars().count());
        }

        #[test]
        fn unmappable_input_yields_empty(s in "[^a-zA-Z ]{0,64}") {
            prop_assert_eq!(transcode(&s), "");
            prop_assert_eq!(transcode(&transcode(&s)), "");
        }

        #[test]
        fn second_pass_keeps_only_spaces(s in any::<String>()) {
            prop_assert!(transcode(&transcode(&s)).chars().all(|c| c == ' '));
        }

        #[test]
        fn deterministic(s in any::<String>()) {
            prop_assert_eq!(transcode(&s), transcode(&s));
        }
    }
}
