//! Identifier sanitization for raw schema names.

/// Converts a raw (wire) name into an identifier-safe clean name.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, a leading digit is
/// prefixed with `_` and an empty name becomes `_`.
///
/// ## Examples
///
/// ```
/// use accessory_define::clean_name;
///
/// assert_eq!(clean_name("tag-list"), "tag_list");
/// assert_eq!(clean_name("1st"), "_1st");
/// assert_eq!(clean_name("id"), "id");
/// assert_eq!(clean_name(""), "_");
/// ```
pub fn clean_name(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if out.is_empty() {
        return "_".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Returns `true` if the raw name is already a valid clean name.
pub fn is_clean(raw: &str) -> bool {
    clean_name(raw) == raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_illegal_characters() {
        assert_eq!(clean_name("ns:item.name"), "ns_item_name");
        assert_eq!(clean_name("a b"), "a_b");
        assert_eq!(clean_name("héllo"), "h_llo");
    }

    #[test]
    fn prefixes_leading_digit() {
        assert_eq!(clean_name("3d"), "_3d");
        assert_eq!(clean_name("_3d"), "_3d");
    }

    #[test]
    fn clean_names_are_stable() {
        for raw in ["tag-list", "9lives", "", "ok_name"] {
            let once = clean_name(raw);
            assert_eq!(clean_name(&once), once);
            assert!(is_clean(&once));
        }
        assert!(!is_clean("tag-list"));
    }
}
