//! Cursor-driven pagination shared by the EVM and Solana scanners.

use crate::error::NetworkError;
use std::fmt::Debug;
use std::future::Future;
use tracing::{debug, warn};

/// One page of results plus the cursor for the next page, if any.
#[derive(Debug, Clone)]
pub struct Page<T, C> {
    pub items: Vec<T>,
    pub next: Option<C>,
}

impl<T, C> Page<T, C> {
    pub fn new(items: Vec<T>, next: Option<C>) -> Self {
        Self { items, next }
    }

    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Fetch pages until no next cursor is returned, concatenating items in order.
///
/// A cursor equal to the one just used ends the loop with a warning instead
/// of requesting the same page forever. Any page error aborts the whole walk.
pub async fn collect_pages<T, C, F, Fut>(label: &str, mut fetch: F) -> Result<Vec<T>, NetworkError>
where
    C: Clone + PartialEq + Debug,
    F: FnMut(Option<C>) -> Fut,
    Fut: Future<Output = Result<Page<T, C>, NetworkError>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<C> = None;
    let mut pages = 0u32;

    loop {
        let page = fetch(cursor.clone()).await?;
        pages += 1;
        debug!("{} page {} returned {} items", label, pages, page.items.len());
        items.extend(page.items);

        match page.next {
            Some(next) if cursor.as_ref() == Some(&next) => {
                warn!("{} returned the same cursor {:?} twice, stopping", label, next);
                break;
            }
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(items)
}

/// EVM-style opaque continuation key. Empty strings mean "no more pages".
pub fn next_page_key(key: Option<String>) -> Option<String> {
    key.filter(|k| !k.is_empty())
}

/// Page-number cursor for 1-indexed APIs that signal the end with a short page.
pub fn next_page_number(page: u32, returned: usize, limit: usize) -> Option<u32> {
    if returned < limit || returned == 0 {
        None
    } else {
        Some(page + 1)
    }
}
