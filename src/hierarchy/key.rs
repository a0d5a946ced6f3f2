use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Reserved key for empty or absent labels. Leading underscores are trimmed
/// during normalization, so no real label can produce this value and it
/// groups with nothing.
pub const UNMATCHED_KEY: &str = "__unmatched__";

/// Canonicalize a free-text label into a lookup key: compatibility-decompose,
/// drop combining marks, lowercase, and collapse every run of remaining
/// non-alphanumeric characters into a single `_`.
///
/// Pure and total; must be applied identically when producing group keys and
/// when looking them up. Idempotent: `normalize_key(k) == k` for any output.
pub fn normalize_key(label: Option<&str>) -> String {
    let Some(raw) = label else {
        return UNMATCHED_KEY.to_string();
    };

    let mut key = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.nfkd() {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }

    if key.is_empty() { UNMATCHED_KEY.to_string() } else { key }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_punctuation_variants_normalize_equal() {
        let a = normalize_key(Some("Madhya Pradesh"));
        let b = normalize_key(Some("MADHYA-PRADESH"));
        let c = normalize_key(Some("madhya_pradesh"));
        assert_eq!(a, "madhya_pradesh");
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn diacritics_fold_away() {
        assert_eq!(normalize_key(Some("São Tomé")), "sao_tome");
        assert_eq!(normalize_key(Some("Ōita")), "oita");
    }

    #[test]
    fn idempotent() {
        for raw in ["Madhya Pradesh", "St. Xavier's", "  a -- b  ", "é"] {
            let once = normalize_key(Some(raw));
            assert_eq!(normalize_key(Some(&once)), once);
        }
    }

    #[test]
    fn edge_separators_trimmed() {
        assert_eq!(normalize_key(Some("--Delhi--")), "delhi");
        assert_eq!(normalize_key(Some(" (North) ")), "north");
    }

    #[test]
    fn empty_and_absent_map_to_reserved_key() {
        assert_eq!(normalize_key(None), UNMATCHED_KEY);
        assert_eq!(normalize_key(Some("")), UNMATCHED_KEY);
        assert_eq!(normalize_key(Some("--- ")), UNMATCHED_KEY);
    }

    #[test]
    fn reserved_key_unreachable_from_real_labels() {
        assert_ne!(normalize_key(Some(UNMATCHED_KEY)), UNMATCHED_KEY);
        assert_eq!(normalize_key(Some(UNMATCHED_KEY)), "unmatched");
    }
}
