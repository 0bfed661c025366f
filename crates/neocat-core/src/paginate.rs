//! Forward-only cursor over the paginated page stream.

use crate::error::FetchError;
use crate::page::{PageSource, RawPage};
use crate::retry::PageFetcher;

/// Lazy, finite sequence of raw pages fetched with increasing cursors.
///
/// The stream ends when the source yields an empty page or the cursor reaches
/// the declared total page count. A fetch error propagates unchanged and
/// poisons the paginator; pages already yielded stay valid. Not restartable:
/// a fresh paginator starts over from cursor zero.
pub struct Paginator<'a, S> {
    fetcher: &'a PageFetcher<S>,
    cursor: u32,
    total_pages: Option<u32>,
    done: bool,
}

impl<'a, S: PageSource> Paginator<'a, S> {
    pub fn new(fetcher: &'a PageFetcher<S>) -> Self {
        Self {
            fetcher,
            cursor: 0,
            total_pages: None,
            done: false,
        }
    }

    /// The next raw page, or `None` once the source is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<RawPage>, FetchError> {
        if self.done {
            return Ok(None);
        }
        if let Some(total) = self.total_pages {
            if self.cursor >= total {
                self.done = true;
                return Ok(None);
            }
        }

        let page = match self.fetcher.fetch(self.cursor).await {
            Ok(page) => page,
            Err(err) => {
                self.done = true;
                return Err(err);
            }
        };

        // An empty page is the terminator, never data.
        if page.near_earth_objects.is_empty() {
            self.done = true;
            return Ok(None);
        }

        if page.page.total_pages > 0 {
            self.total_pages = Some(page.page.total_pages);
        }
        self.cursor += 1;
        Ok(Some(page))
    }

    pub const fn cursor(&self) -> u32 {
        self.cursor
    }
}
