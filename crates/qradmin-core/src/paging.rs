// ── Paging and quick filter ──
//
// Presentation helpers over an already-loaded row set. Paging is pure index
// slicing; the quick filter is a case-insensitive substring match.

use crate::model::Row;

/// Offered page sizes.
pub const PAGE_SIZES: [usize; 3] = [10, 25, 50];

pub const DEFAULT_PAGE_SIZE: usize = PAGE_SIZES[0];

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Build a page request, clamping the number to at least 1 and rejecting
    /// sizes outside [`PAGE_SIZES`].
    pub fn new(number: usize, size: usize) -> Option<Self> {
        PAGE_SIZES.contains(&size).then_some(Self {
            number: number.max(1),
            size,
        })
    }
}

/// Number of pages needed for `total` rows; an empty set still has one page.
pub fn page_count(total: usize, size: usize) -> usize {
    if size == 0 {
        return 1;
    }
    total.div_ceil(size).max(1)
}

/// The rows on `page`. Out-of-range pages are empty.
pub fn slice<T>(rows: &[T], page: Page) -> &[T] {
    let start = page.number.saturating_sub(1).saturating_mul(page.size);
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(page.size).min(rows.len());
    &rows[start..end]
}

/// Rows whose searchable text contains `needle`, ignoring case. A blank
/// needle keeps every row.
pub fn search<'a, R: Row>(rows: &'a [R], needle: &str) -> Vec<&'a R> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return rows.iter().collect();
    }
    rows.iter()
        .filter(|r| r.search_text().to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qradmin_api::UserRecord;

    fn user(name: &str, email: &str) -> UserRecord {
        UserRecord {
            id: name.to_lowercase(),
            name: name.into(),
            email: email.into(),
            role: "user".into(),
            created_at: None,
        }
    }

    #[test]
    fn only_offered_sizes_are_accepted() {
        assert!(Page::new(1, 25).is_some());
        assert!(Page::new(1, 7).is_none());
        assert_eq!(Page::new(0, 10).map(|p| p.number), Some(1));
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(51, 25), 3);
    }

    #[test]
    fn slices_by_index() {
        let rows: Vec<u32> = (1..=23).collect();
        assert_eq!(slice(&rows, Page { number: 3, size: 10 }), &[21, 22, 23]);
        assert!(slice(&rows, Page { number: 4, size: 10 }).is_empty());
    }

    #[test]
    fn quick_filter_matches_any_searchable_field() {
        let rows = vec![user("Alice", "alice@example.com"), user("Bob", "bob@corp.io")];
        assert_eq!(search(&rows, "CORP").len(), 1);
        assert_eq!(search(&rows, "  ").len(), 2);
        assert!(search(&rows, "carol").is_empty());
    }
}
