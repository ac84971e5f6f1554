//! Property-based tests for search tokenization

use homeshare::backend::store::{search_terms, search_words};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_terms_are_lowercase_words(query in "[a-zA-Zà-ÿ0-9 ,.!?-]{0,60}") {
        for term in search_terms(&query) {
            prop_assert!(!term.is_empty());
            prop_assert!(term.chars().all(char::is_alphanumeric), "{:?}", term);
            prop_assert_eq!(&term, &term.to_lowercase());
        }
    }

    #[test]
    fn test_terms_are_unique(query in "[a-zA-Z0-9 ,.!-]{0,80}") {
        let terms = search_terms(&query);
        for (i, term) in terms.iter().enumerate() {
            prop_assert!(!terms[i + 1..].contains(term), "{:?} repeated", term);
        }
    }

    #[test]
    fn test_terms_are_searchable_words(query in "[a-zA-Z0-9 ,.!-]{0,80}") {
        let words: Vec<String> = search_words(&query).collect();
        for term in search_terms(&query) {
            prop_assert!(words.contains(&term));
        }
    }

    #[test]
    fn test_terms_ignore_case(query in "[a-zA-Z0-9 ,.!-]{0,80}") {
        prop_assert_eq!(
            search_terms(&query.to_uppercase()),
            search_terms(&query.to_lowercase())
        );
    }

    #[test]
    fn test_terms_are_stable(query in "[a-zA-Zà-ÿ0-9 ,.!?-]{0,60}") {
        let terms = search_terms(&query);
        prop_assert_eq!(search_terms(&terms.join(" ")), terms);
    }

    #[test]
    fn test_words_do_not_match_prefixes(word in "[a-z]{3,12}", suffix in "[a-z]{1,6}") {
        let terms = search_terms(&word);
        let joined = format!("{word}{suffix}");
        let words: Vec<String> = search_words(&joined).collect();
        for term in &terms {
            prop_assert!(!words.contains(term));
        }
    }
}
