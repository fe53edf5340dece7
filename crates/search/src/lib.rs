//! `search` crate — the debounce policy for text-driven searches.
//!
//! Reusable by any search input: the debouncer decides *when* to dispatch,
//! [`exclude_present`] decides *what* of the result set is worth showing.

pub mod debounce;

pub use debounce::{SearchDebouncer, DEFAULT_DELAY};

/// Drop candidates already present in the caller's current selection.
///
/// Search result sets are post-filtered against the "already selected" set
/// before display; `key` extracts the identity to compare on.
pub fn exclude_present<T, K, F>(candidates: Vec<T>, present: &[K], key: F) -> Vec<T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    candidates
        .into_iter()
        .filter(|candidate| !present.contains(&key(candidate)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_entries_are_dropped_in_order() {
        let candidates = vec![("a", 1), ("b", 2), ("c", 3), ("d", 4)];
        let present = [2, 4];
        let kept = exclude_present(candidates, &present, |c| c.1);
        assert_eq!(kept, vec![("a", 1), ("c", 3)]);
    }

    #[test]
    fn empty_present_set_keeps_everything() {
        let kept = exclude_present(vec![1, 2, 3], &[], |c| *c);
        assert_eq!(kept, vec![1, 2, 3]);
    }
}
