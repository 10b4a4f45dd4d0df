//! Case-insensitive whole-word matching for glossary terms.
//!
//! Word boundaries are checked by explicit inspection of the adjacent
//! characters rather than regex lookaround: a match must not be preceded or
//! followed by an ASCII alphanumeric or `-`, so terms never match inside
//! larger words or hyphenated compounds.

use memchr::memmem;

/// ASCII-lowercase a string, preserving byte length so match offsets in the
/// folded text are valid offsets in the original.
pub fn fold_ascii(text: &str) -> String {
    text.to_ascii_lowercase()
}

/// A byte that can be part of a word (boundary class `[a-zA-Z0-9-]`).
#[inline]
pub fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

/// Find the first whole-word occurrence of `needle` in `folded`, returning
/// its byte range. `folded` must already be ASCII-folded; `needle` must be
/// lowercase (index match keys are).
pub fn find_whole_word(folded: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }

    let bytes = folded.as_bytes();
    for start in memmem::find_iter(bytes, needle.as_bytes()) {
        let end = start + needle.len();

        let boundary_before = start == 0 || !is_word_byte(bytes[start - 1]);
        let boundary_after = end == bytes.len() || !is_word_byte(bytes[end]);

        if boundary_before && boundary_after {
            return Some((start, end));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_simple_match() {
        assert_eq!(find_whole_word("the provider must", "provider"), Some((4, 12)));
    }

    #[test]
    fn test_case_insensitive_via_fold() {
        let folded = fold_ascii("The Provider must");
        assert_eq!(find_whole_word(&folded, "provider"), Some((4, 12)));
    }

    #[test]
    fn test_no_match_inside_word() {
        assert_eq!(find_whole_word("remodeling", "model"), None);
        assert_eq!(find_whole_word("models", "model"), None);
    }

    #[test]
    fn test_no_match_in_hyphenated_compound() {
        assert_eq!(find_whole_word("foundation-model-adjacent", "model"), None);
    }

    #[test]
    fn test_match_at_string_edges() {
        assert_eq!(find_whole_word("model", "model"), Some((0, 5)));
        assert_eq!(find_whole_word("a model", "model"), Some((2, 7)));
        assert_eq!(find_whole_word("model.", "model"), Some((0, 5)));
    }

    #[test]
    fn test_skips_bound_occurrence_finds_later_free_one() {
        // first "model" is inside "remodeling", second stands alone
        assert_eq!(find_whole_word("remodeling a model", "model"), Some((13, 18)));
    }

    #[test]
    fn test_punctuation_is_boundary() {
        assert_eq!(find_whole_word("(model)", "model"), Some((1, 6)));
        assert_eq!(find_whole_word("model, etc", "model"), Some((0, 5)));
    }

    #[test]
    fn test_multi_word_needle() {
        assert_eq!(
            find_whole_word("a foundation model here", "foundation model"),
            Some((2, 18))
        );
    }

    #[test]
    fn test_empty_needle() {
        assert_eq!(find_whole_word("anything", ""), None);
    }

    proptest! {
        #[test]
        fn prop_match_always_on_word_boundaries(
            prefix in "[a-z ,.()]{0,20}",
            suffix in "[a-z ,.()]{0,20}",
            needle in "[a-z]{2,10}",
        ) {
            let haystack = format!("{prefix}{needle}{suffix}");
            if let Some((start, end)) = find_whole_word(&haystack, &needle) {
                let bytes = haystack.as_bytes();
                prop_assert!(start == 0 || !is_word_byte(bytes[start - 1]));
                prop_assert!(end == bytes.len() || !is_word_byte(bytes[end]));
                prop_assert_eq!(&haystack[start..end], needle.as_str());
            }
        }

        #[test]
        fn prop_never_matches_inside_longer_word(
            needle in "[a-z]{2,8}",
            glue in "[a-z]{1,4}",
        ) {
            let haystack = format!("{glue}{needle}{glue}");
            prop_assert_eq!(find_whole_word(&haystack, &needle), None);
        }
    }
}
