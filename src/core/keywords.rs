//! # Recent Keywords
//!
//! Bounded, de-duplicated search history, most recent first.
//! Both operations are pure: they return the new list and leave persisting
//! it to the caller (see `Effect::SaveKeywords`).

/// Maximum number of recent keywords kept.
pub const MAX_RECENT_KEYWORDS: usize = 10;

/// Records `keyword` as the most recent search.
///
/// An existing entry moves to the front. A new entry is prepended; when the
/// list is already full, the least recent entry (the tail) is dropped first.
pub fn record_keyword(current: &[String], keyword: &str) -> Vec<String> {
    let mut list = current.to_vec();
    if let Some(idx) = list.iter().position(|k| k == keyword) {
        list.remove(idx);
    } else if list.len() >= MAX_RECENT_KEYWORDS {
        list.truncate(MAX_RECENT_KEYWORDS - 1);
    }
    list.insert(0, keyword.to_string());
    list
}

/// Removes the first occurrence of `keyword`.
///
/// Returns `None` when the keyword is absent, so callers can skip persisting.
pub fn remove_keyword(current: &[String], keyword: &str) -> Option<Vec<String>> {
    let idx = current.iter().position(|k| k == keyword)?;
    let mut list = current.to_vec();
    list.remove(idx);
    Some(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn full_list() -> Vec<String> {
        (0..MAX_RECENT_KEYWORDS).map(|i| format!("k{i}")).collect()
    }

    #[test]
    fn test_record_new_keyword_prepends() {
        for len in 0..MAX_RECENT_KEYWORDS {
            let current: Vec<String> = (0..len).map(|i| format!("k{i}")).collect();
            let next = record_keyword(&current, "new");
            assert_eq!(next.len(), len + 1);
            assert_eq!(next[0], "new");
            assert_eq!(&next[1..], &current[..]);
        }
    }

    #[test]
    fn test_record_existing_keyword_moves_to_front() {
        let next = record_keyword(&list(&["a", "b", "c"]), "b");
        assert_eq!(next, list(&["b", "a", "c"]));
    }

    #[test]
    fn test_record_front_keyword_is_unchanged() {
        let current = list(&["a", "b", "c"]);
        assert_eq!(record_keyword(&current, "a"), current);
    }

    #[test]
    fn test_record_into_full_list_drops_least_recent() {
        let current = full_list();
        let next = record_keyword(&current, "new");
        assert_eq!(next.len(), MAX_RECENT_KEYWORDS);
        assert_eq!(next[0], "new");
        assert_eq!(&next[1..], &current[..9]);
        assert!(!next.contains(&"k9".to_string()));
    }

    #[test]
    fn test_record_existing_in_full_list_keeps_length() {
        let current = full_list();
        let next = record_keyword(&current, "k7");
        assert_eq!(next.len(), MAX_RECENT_KEYWORDS);
        assert_eq!(next[0], "k7");
        assert!(next.contains(&"k9".to_string()));
    }

    #[test]
    fn test_record_never_duplicates() {
        let mut current = Vec::new();
        for kw in ["a", "b", "a", "c", "b", "a"] {
            current = record_keyword(&current, kw);
        }
        assert_eq!(current, list(&["a", "b", "c"]));
    }

    #[test]
    fn test_remove_absent_keyword_is_noop() {
        assert_eq!(remove_keyword(&list(&["a", "b"]), "z"), None);
    }

    #[test]
    fn test_remove_present_keyword() {
        let next = remove_keyword(&list(&["a", "b", "c"]), "b").unwrap();
        assert_eq!(next, list(&["a", "c"]));
    }

    #[test]
    fn test_remove_only_first_occurrence() {
        // Lists built elsewhere may carry duplicates; only one goes.
        let next = remove_keyword(&list(&["a", "b", "a"]), "a").unwrap();
        assert_eq!(next, list(&["b", "a"]));
    }
}
