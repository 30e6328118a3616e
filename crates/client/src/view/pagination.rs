//! Fallback page links for when infinite scroll is not used.

use std::fmt;

use crate::api::ProductPage;

/// Pages shown on each side of the current page.
const WINDOW: u32 = 2;

/// One element of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Previous(u32),
    Page { number: u32, current: bool },
    Gap,
    Next(u32),
}

/// Page links around the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    links: Vec<PageLink>,
}

impl Pagination {
    /// Build the bar, or `None` when everything fits on one page.
    ///
    /// Shows `current ± 2`, the first and last page with gaps where pages are
    /// skipped, and previous/next links when those pages exist.
    #[must_use]
    pub fn build(current: u32, total: u32, has_previous: bool, has_next: bool) -> Option<Self> {
        let total = total.max(current);
        if total <= 1 {
            return None;
        }

        let start = current.saturating_sub(WINDOW).max(1);
        let end = current.saturating_add(WINDOW).min(total);
        let mut links = Vec::new();

        if has_previous && current > 1 {
            links.push(PageLink::Previous(current - 1));
        }
        if start > 1 {
            links.push(PageLink::Page {
                number: 1,
                current: false,
            });
            if start > 2 {
                links.push(PageLink::Gap);
            }
        }
        for number in start..=end {
            links.push(PageLink::Page {
                number,
                current: number == current,
            });
        }
        if end < total {
            if end.saturating_add(1) < total {
                links.push(PageLink::Gap);
            }
            links.push(PageLink::Page {
                number: total,
                current: false,
            });
        }
        if has_next && let Some(next) = current.checked_add(1) {
            links.push(PageLink::Next(next));
        }

        Some(Self { links })
    }

    /// Build the bar for a loaded page.
    ///
    /// Without a reported page count, the bar ends one page past the current
    /// page when more exist.
    #[must_use]
    pub fn for_page(page: &ProductPage) -> Option<Self> {
        let total = page
            .num_pages
            .unwrap_or_else(|| page.page.saturating_add(u32::from(page.has_next)));
        Self::build(page.page, total, page.has_previous, page.has_next)
    }

    #[must_use]
    pub fn links(&self) -> &[PageLink] {
        &self.links
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for link in &self.links {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            match link {
                PageLink::Previous(_) => f.write_str("‹")?,
                PageLink::Next(_) => f.write_str("›")?,
                PageLink::Gap => f.write_str("…")?,
                PageLink::Page {
                    number,
                    current: true,
                } => write!(f, "[{number}]")?,
                PageLink::Page { number, .. } => write!(f, "{number}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page_is_hidden() {
        assert!(Pagination::build(1, 1, false, false).is_none());
        assert!(Pagination::build(1, 0, false, false).is_none());
    }

    #[test]
    fn test_window_in_the_middle() {
        let bar = Pagination::build(6, 12, true, true).unwrap();
        assert_eq!(bar.to_string(), "‹ 1 … 4 5 [6] 7 8 … 12 ›");
    }

    #[test]
    fn test_no_gap_when_adjacent_to_edges() {
        let bar = Pagination::build(3, 5, true, true).unwrap();
        assert_eq!(bar.to_string(), "‹ 1 2 [3] 4 5 ›");

        let bar = Pagination::build(4, 7, true, true).unwrap();
        assert_eq!(bar.to_string(), "‹ 1 2 3 [4] 5 6 7 ›");
    }

    #[test]
    fn test_first_and_last_page() {
        let bar = Pagination::build(1, 8, false, true).unwrap();
        assert_eq!(bar.to_string(), "[1] 2 3 … 8 ›");

        let bar = Pagination::build(8, 8, true, false).unwrap();
        assert_eq!(bar.to_string(), "‹ 1 … 6 7 [8]");
        assert_eq!(bar.links()[0], PageLink::Previous(7));
    }

    #[test]
    fn test_for_page_without_page_count() {
        let page = ProductPage {
            html: String::new(),
            filters_html: None,
            pagination_html: None,
            product_count: 60,
            page: 2,
            has_next: true,
            has_previous: true,
            num_pages: None,
            update_url: None,
        };
        let bar = Pagination::for_page(&page).unwrap();
        assert_eq!(bar.to_string(), "‹ 1 [2] 3 ›");
    }

    #[test]
    fn test_last_representable_page_does_not_overflow() {
        let page = ProductPage {
            html: String::new(),
            filters_html: None,
            pagination_html: None,
            product_count: 1,
            page: u32::MAX,
            has_next: true,
            has_previous: true,
            num_pages: None,
            update_url: None,
        };
        let bar = Pagination::for_page(&page).unwrap();
        assert_eq!(
            bar.links().last(),
            Some(&PageLink::Page {
                number: u32::MAX,
                current: true,
            })
        );
        assert_eq!(bar.links()[0], PageLink::Previous(u32::MAX - 1));
    }
}
