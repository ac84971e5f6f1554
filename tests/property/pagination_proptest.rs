//! Property-based tests for `PageRequest`

use homeshare::shared::pagination::{PageRequest, PaginationParams, MAX_PAGE_SIZE};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_zero_page_or_limit_rejected(page in 0u32..1000, limit in 0u32..1000) {
        let request = PageRequest::new(page, limit);
        prop_assert_eq!(request.is_ok(), page > 0 && limit > 0);
    }

    #[test]
    fn test_limit_capped(page in 1u32..1000, limit in 1u32..10_000) {
        let request = PageRequest::new(page, limit).unwrap();
        prop_assert_eq!(request.page(), page);
        prop_assert_eq!(request.limit(), limit.min(MAX_PAGE_SIZE));
    }

    #[test]
    fn test_offset_skips_earlier_pages(page in 1u32..u32::MAX, limit in 1u32..=MAX_PAGE_SIZE) {
        let request = PageRequest::new(page, limit).unwrap();
        prop_assert_eq!(request.offset(), u64::from(page - 1) * u64::from(limit));
    }

    #[test]
    fn test_total_pages_is_ceiling(limit in 1u32..=MAX_PAGE_SIZE, total in 0u64..1_000_000) {
        let request = PageRequest::new(1, limit).unwrap();
        let pages = request.total_pages(total);
        let limit = u64::from(limit);

        prop_assert!(pages * limit >= total);
        if total > 0 {
            prop_assert!((pages - 1) * limit < total);
        } else {
            prop_assert_eq!(pages, 0);
        }
    }

    #[test]
    fn test_slice_is_window_of_items(
        page in 1u32..20,
        limit in 1u32..=MAX_PAGE_SIZE,
        len in 0usize..500,
    ) {
        let request = PageRequest::new(page, limit).unwrap();
        let items: Vec<usize> = (0..len).collect();

        let slice = request.slice(items.clone());

        let start = (request.offset() as usize).min(len);
        let end = (start + limit as usize).min(len);
        prop_assert_eq!(slice, items[start..end].to_vec());
    }

    #[test]
    fn test_pages_cover_every_item_once(limit in 1u32..=MAX_PAGE_SIZE, len in 0usize..300) {
        let items: Vec<usize> = (0..len).collect();
        let pages = PageRequest::new(1, limit).unwrap().total_pages(len as u64);

        let mut seen = Vec::new();
        for page in 1..=pages {
            let request = PageRequest::new(page as u32, limit).unwrap();
            seen.extend(request.slice(items.iter().copied()));
        }
        prop_assert_eq!(seen, items);
    }

    #[test]
    fn test_missing_params_use_defaults(default_limit in 1u32..=MAX_PAGE_SIZE) {
        let request = PaginationParams::default().resolve(default_limit).unwrap();
        prop_assert_eq!(request.page(), 1);
        prop_assert_eq!(request.limit(), default_limit);
    }
}
