//! Filter-query strings for flat list reads and searches.
//!
//! Grammar: `<entity-set>?$filter=<expr>&$select=<fields>[&$orderby=...][&$top=N]`.
//! String literals are single-quoted; doubling the quote is the only escape
//! the grammar has, and every interpolated literal goes through
//! [`escape_quotes`] before it reaches an expression.

use model::codes::{ACTIVE_SOLUTION, DEFAULT_SOLUTION};

/// Result cap for user and team searches.
const PRINCIPAL_TOP: u32 = 10;
/// Result cap for solution searches.
const SOLUTION_TOP: u32 = 20;

/// Escape a string literal for interpolation into a filter expression.
pub fn escape_quotes(raw: &str) -> String {
    raw.replace('\'', "''")
}

/// Listing query for solutions: visible, matching the managed flag, default
/// solution excluded, newest first.
pub fn solutions_filter(managed: bool) -> String {
    format!(
        "solutions?$filter=(isvisible eq true) and ismanaged eq {managed} \
         and uniquename ne '{DEFAULT_SOLUTION}'\
         &$select=friendlyname,uniquename,solutionid,ismanaged\
         &$orderby=createdon desc"
    )
}

/// What a search filter looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    User,
    Team,
    Solution,
}

/// Case-sensitive substring search, capped per kind.
///
/// Solution search additionally requires unmanaged and excludes the default
/// and "Active" pseudo-solutions.
pub fn search_filter(kind: SearchKind, raw_text: &str) -> String {
    let text = escape_quotes(raw_text);
    match kind {
        SearchKind::User => format!(
            "systemusers?$filter=contains(fullname,'{text}')\
             &$select=fullname,systemuserid&$top={PRINCIPAL_TOP}"
        ),
        SearchKind::Team => format!(
            "teams?$filter=contains(name,'{text}')\
             &$select=name,teamid&$top={PRINCIPAL_TOP}"
        ),
        SearchKind::Solution => format!(
            "solutions?$filter=ismanaged eq false \
             and (contains(friendlyname,'{text}') or contains(uniquename,'{text}')) \
             and uniquename ne '{DEFAULT_SOLUTION}' and uniquename ne '{ACTIVE_SOLUTION}'\
             &$select=friendlyname,uniquename,solutionid,ismanaged&$top={SOLUTION_TOP}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collapse doubled quotes back into a literal, the way the platform's
    /// filter parser would.
    fn unescape(escaped: &str) -> String {
        escaped.replace("''", "'")
    }

    #[test]
    fn single_quotes_are_doubled() {
        let filter = search_filter(SearchKind::User, "O'Brien");
        assert!(filter.contains("contains(fullname,'O''Brien')"));
    }

    #[test]
    fn escaped_literal_round_trips() {
        let escaped = escape_quotes("O'Brien's flow");
        assert_eq!(unescape(&escaped), "O'Brien's flow");
    }

    #[test]
    fn solutions_filter_excludes_default_for_both_managed_flags() {
        for managed in [true, false] {
            let filter = solutions_filter(managed);
            assert!(filter.contains(&format!("ismanaged eq {managed}")));
            assert!(filter.contains("uniquename ne 'Default'"));
            assert!(filter.contains("(isvisible eq true)"));
            assert!(filter.contains("$orderby=createdon desc"));
        }
    }

    #[test]
    fn principal_searches_are_capped_at_ten() {
        assert!(search_filter(SearchKind::User, "a").ends_with("&$top=10"));
        assert!(search_filter(SearchKind::Team, "a").ends_with("&$top=10"));
    }

    #[test]
    fn solution_search_is_capped_at_twenty_and_unmanaged_only() {
        let filter = search_filter(SearchKind::Solution, "crm");
        assert!(filter.ends_with("&$top=20"));
        assert!(filter.contains("ismanaged eq false"));
        assert!(filter.contains("uniquename ne 'Default'"));
        assert!(filter.contains("uniquename ne 'Active'"));
    }

    #[test]
    fn solution_search_matches_both_name_fields() {
        let filter = search_filter(SearchKind::Solution, "crm");
        assert!(filter.contains("contains(friendlyname,'crm')"));
        assert!(filter.contains("contains(uniquename,'crm')"));
    }
}
