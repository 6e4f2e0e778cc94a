//! Fixed-size pagination.

/// One page of an ordered collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, always within `1..=total_pages`.
    pub current_page: usize,
    /// Never less than 1, even for an empty collection.
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// Number of pages for `total_items` at `page_size` (a zero size counts as 1).
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested 1-based page into `1..=total_pages`.
pub fn clamp_page(requested_page: usize, total_pages: usize) -> usize {
    requested_page.clamp(1, total_pages.max(1))
}

/// Take the `requested_page` window out of `rows`.
///
/// Out-of-range pages are clamped rather than rejected.
pub fn paginate<T>(rows: Vec<T>, page_size: usize, requested_page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = rows.len();
    let total_pages = total_pages(total_items, page_size);
    let current_page = clamp_page(requested_page, total_pages);

    let items = rows
        .into_iter()
        .skip((current_page - 1) * page_size)
        .take(page_size)
        .collect();

    Page {
        items,
        current_page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_has_one_page() {
        let page = paginate(Vec::<u32>::new(), 10, 1);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());

        let page = paginate(Vec::<u32>::new(), 10, 7);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_windows() {
        let rows: Vec<u32> = (1..=25).collect();

        let page = paginate(rows.clone(), 10, 1);
        assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(!page.has_previous());

        let page = paginate(rows.clone(), 10, 3);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert!(!page.has_next());
    }

    #[test]
    fn test_requested_page_is_clamped() {
        let rows: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(rows.clone(), 10, 0).current_page, 1);
        assert_eq!(paginate(rows.clone(), 10, 99).current_page, 3);
        assert_eq!(paginate(rows, 0, 2).items, vec![2]);
    }

    #[test]
    fn test_bounds_hold_for_many_shapes() {
        for len in 0..40usize {
            for size in 1..12usize {
                for requested in 0..8usize {
                    let page = paginate((0..len).collect::<Vec<_>>(), size, requested);
                    assert!(page.current_page >= 1);
                    assert!(page.current_page <= page.total_pages);
                    assert!(page.items.len() <= size);
                    assert_eq!(page.total_items, len);
                }
            }
        }
    }
}
