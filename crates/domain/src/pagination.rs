//! Pagination engine: pure page/limit arithmetic, no state, no I/O.

/// A computed pagination window. `page` and `limit` are the clamped inputs
/// so callers can echo the effective values back to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
    pub skip: u64,
    pub total_pages: u64,
}

/// Computes the window for `page`/`limit` over `total` items. Both inputs
/// are clamped to at least 1 before anything is derived from them.
pub fn paginate(page: u32, limit: u32, total: u64) -> PageWindow {
    let page = page.max(1);
    let limit = limit.max(1);
    PageWindow {
        page,
        limit,
        skip: u64::from(page - 1) * u64::from(limit),
        total_pages: total.div_ceil(u64::from(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_inputs_clamp_to_one() {
        let window = paginate(0, 0, 25);
        assert_eq!(window.page, 1);
        assert_eq!(window.limit, 1);
        assert_eq!(window.skip, 0);
        assert_eq!(window.total_pages, 25);
    }

    #[test]
    fn skip_advances_by_whole_pages() {
        let window = paginate(3, 10, 45);
        assert_eq!(window.skip, 20);
        assert_eq!(window.total_pages, 5);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(paginate(1, 3, 10).total_pages, 4);
        assert_eq!(paginate(1, 3, 9).total_pages, 3);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        assert_eq!(paginate(1, 10, 0).total_pages, 0);
    }
}
