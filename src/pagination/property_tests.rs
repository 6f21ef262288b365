//! Property-Based Tests for Cursor Pagination
//!
//! Walks static sources page by page and checks the concatenation against
//! the source itself.

use proptest::prelude::*;
use tokio_test::block_on;

use super::tests::VecSource;
use super::{paginate, Page, PageRequest};

const MAX_LIMIT: usize = 100;

/// Follows `next_cursor` until the last page, returning every page seen.
fn collect_pages(source: &VecSource, limit: usize) -> Vec<Page<u32>> {
    let mut pages = Vec::new();
    let mut request = Some(PageRequest::first(limit, MAX_LIMIT));

    while let Some(current) = request {
        let page = block_on(paginate(source, &current)).unwrap();
        request = current.next(&page);
        pages.push(page);
        assert!(pages.len() <= source.0.len() + 1, "pagination did not terminate");
    }

    pages
}

/// Source of `size` distinct ids in descending order.
fn descending(size: usize) -> VecSource {
    VecSource((1..=size as u32).rev().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Concatenated pages reproduce the source exactly, for the sizes around
    // every page boundary.
    #[test]
    fn prop_pages_cover_source_exactly_once(limit in 1usize..20, shape in 0usize..5) {
        let size = match shape {
            0 => 0,
            1 => 1,
            2 => limit,
            3 => limit + 1,
            _ => 3 * limit + 1,
        };
        let source = descending(size);

        let pages = collect_pages(&source, limit);
        let seen: Vec<u32> = pages.iter().flat_map(|page| page.items.clone()).collect();

        prop_assert_eq!(seen, source.0.clone());
    }

    // Every page respects the limit and only the last page reports no more.
    #[test]
    fn prop_has_more_only_before_last_page(limit in 1usize..20, size in 0usize..120) {
        let source = descending(size);
        let pages = collect_pages(&source, limit);
        let last = pages.len() - 1;

        for (i, page) in pages.iter().enumerate() {
            prop_assert!(page.items.len() <= limit);
            prop_assert_eq!(page.has_more, page.next_cursor.is_some());
            prop_assert_eq!(page.has_more, i != last);
        }

        let expected_pages = if size == 0 { 1 } else { size.div_ceil(limit) };
        prop_assert_eq!(pages.len(), expected_pages);
    }

    // The cursor handed out is always the id of the last item on the page.
    #[test]
    fn prop_next_cursor_names_last_item(limit in 1usize..10, size in 1usize..60) {
        let source = descending(size);

        for page in collect_pages(&source, limit) {
            if let Some(cursor) = &page.next_cursor {
                let last = page.items.last().map(|n| n.to_string());
                prop_assert_eq!(Some(cursor.clone()), last);
            }
        }
    }
}
