//! Text normalization shared by the tag reader, filename parser and
//! playlist name comparison.

use any_ascii::any_ascii;

/// Transliterate to the closest ASCII representation and trim.
///
/// "Beyoncé" becomes "Beyonce", "Motörhead" becomes "Motorhead".
pub fn fold_ascii(text: &str) -> String {
    any_ascii(text).trim().to_string()
}

/// Comparison key: ASCII-folded and lowercased.
pub fn fold_key(text: &str) -> String {
    fold_ascii(text).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_diacritics() {
        assert_eq!(fold_ascii("Beyoncé"), "Beyonce");
        assert_eq!(fold_ascii("Motörhead"), "Motorhead");
        assert_eq!(fold_ascii("Sigur Rós"), "Sigur Ros");
    }

    #[test]
    fn test_fold_plain_ascii_is_unchanged() {
        assert_eq!(fold_ascii("Daft Punk"), "Daft Punk");
    }

    #[test]
    fn test_fold_trims() {
        assert_eq!(fold_ascii("  Café  "), "Cafe");
    }

    #[test]
    fn test_fold_key_is_case_insensitive() {
        assert_eq!(fold_key("Été Chill"), fold_key("ETE CHILL"));
    }
}
