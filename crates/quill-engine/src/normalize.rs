//! Deterministic normalization and q-gram extraction.
//!
//! Normalization is ASCII lowercasing only: it is not Unicode-aware by
//! design, since every downstream offset (segment masks, verifier match
//! positions) is computed in bytes of the normalized form and must agree
//! with indexing's byte boundaries. A Unicode-aware normalizer is a valid
//! substitute as long as it is idempotent and preserves the byte-length
//! contract callers rely on.

/// Lowercase a string. Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    text.to_ascii_lowercase()
}

/// Every length-`q` contiguous byte substring of `text`. Empty if
/// `text.len() < q`. Grams are compared/hashed as raw byte strings (never
/// re-interpreted as `str`), so a window landing in the middle of a
/// multi-byte UTF-8 sequence is still a valid gram — it just isn't valid
/// UTF-8 on its own, which is fine since nothing downstream needs it to be.
pub fn extract_grams(text: &str, q: usize) -> Vec<&[u8]> {
    let bytes = text.as_bytes();
    if bytes.len() < q || q == 0 {
        return Vec::new();
    }
    (0..=bytes.len() - q).map(|i| &bytes[i..i + q]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        let s = "BaNaNa Bread";
        assert_eq!(normalize(&normalize(s)), normalize(s));
    }

    #[test]
    fn extract_grams_banana() {
        let grams = extract_grams("banana", 3);
        let expected: Vec<&[u8]> = vec![b"ban", b"ana", b"nan", b"ana"];
        assert_eq!(grams, expected);
    }

    #[test]
    fn extract_grams_does_not_drop_multibyte_windows() {
        // "café" is 5 bytes (c-a-f-\xc3-\xa9); q=3 must yield exactly
        // len - q + 1 = 3 grams even though some windows split the 'é'.
        let grams = extract_grams("café", 3);
        assert_eq!(grams.len(), "café".len() - 3 + 1);
    }

    #[test]
    fn extract_grams_short_text_is_empty() {
        assert!(extract_grams("ba", 3).is_empty());
        assert!(extract_grams("", 3).is_empty());
    }

    #[test]
    fn extract_grams_count_matches_formula() {
        let text = "the quick brown fox";
        let grams = extract_grams(text, 3);
        assert_eq!(grams.len(), text.len() - 3 + 1);
    }
}
