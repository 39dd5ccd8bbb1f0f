//! Cursor pagination over any "fetch one page" capability.
//!
//! The backend only supports forward cursors, so reaching page `n` means
//! fetching pages `1..=n` in order. Every mode stops at the first error and
//! returns nothing partial.

use std::future::Future;

use tracing::debug;

/// Items requested per page.
pub const PAGE_SIZE: u32 = 100;

/// One fetched page.
#[derive(Debug, Clone)]
pub struct PageResponse<T> {
    /// Items of this page.
    pub items: Vec<T>,
    /// Cursor after the last item.
    pub end_cursor: Option<String>,
    /// Whether another page follows.
    pub has_next_page: bool,
}

/// Result of [`paginate`].
#[derive(Debug, Clone)]
pub struct PaginatedPage<T> {
    /// Items of the last fetched page.
    pub data: Vec<T>,
    /// Cursor after the last fetched page.
    pub after_cursor: Option<String>,
    /// Highest page index actually fetched.
    pub actual_page: u32,
    /// Whether the backend reported another page after `actual_page`.
    pub has_next_page: bool,
    /// Count reported by the independent total query.
    pub total: u64,
}

impl<T> PaginatedPage<T> {
    /// Whether pagination ran out before `target_page`.
    #[must_use]
    pub const fn is_beyond(&self, target_page: u32) -> bool {
        self.actual_page < target_page
    }
}

/// Fetch page `target_page` by walking the cursor from the start.
///
/// `get_total` is awaited first. Only the last fetched page's items are
/// kept; the walk stops early when the backend reports no further page.
/// A `target_page` of 0 is treated as 1.
///
/// # Errors
///
/// Returns the first error of `get_total` or `fetch_page`.
pub async fn paginate<T, E, F, Fut, G, GFut>(
    mut fetch_page: F,
    target_page: u32,
    get_total: G,
) -> Result<PaginatedPage<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<PageResponse<T>, E>>,
    G: FnOnce() -> GFut,
    GFut: Future<Output = Result<u64, E>>,
{
    let target_page = target_page.max(1);
    let total = get_total().await?;

    let mut page = PaginatedPage {
        data: Vec::new(),
        after_cursor: None,
        actual_page: 0,
        has_next_page: false,
        total,
    };

    for current_page in 1..=target_page {
        let response = fetch_page(page.after_cursor.take()).await?;
        page.data = response.items;
        page.after_cursor = response.end_cursor;
        page.has_next_page = response.has_next_page;
        page.actual_page = current_page;

        if !page.has_next_page {
            break;
        }
    }

    debug!(
        target_page,
        actual_page = page.actual_page,
        has_next_page = page.has_next_page,
        total,
        "Pagination finished"
    );
    Ok(page)
}

/// Fetch every page and concatenate the items.
///
/// # Errors
///
/// Returns the first error of `fetch_page`.
pub async fn collect_all<T, E, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<PageResponse<T>, E>>,
{
    let mut items = Vec::new();
    let mut cursor = None;

    loop {
        let response = fetch_page(cursor).await?;
        items.extend(response.items);
        cursor = response.end_cursor;

        if !response.has_next_page {
            return Ok(items);
        }
    }
}

/// Walk pages until an item matches `predicate`.
///
/// Returns `None` once pagination is exhausted without a match.
///
/// # Errors
///
/// Returns the first error of `fetch_page`.
pub async fn find_first<T, E, F, Fut, P>(mut fetch_page: F, mut predicate: P) -> Result<Option<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<PageResponse<T>, E>>,
    P: FnMut(&T) -> bool,
{
    let mut cursor = None;

    loop {
        let response = fetch_page(cursor).await?;
        if let Some(found) = response.items.into_iter().find(|item| predicate(item)) {
            return Ok(Some(found));
        }
        cursor = response.end_cursor;

        if !response.has_next_page {
            return Ok(None);
        }
    }
}
