//! The paginated submission history of one rollup, as currently displayed.

use crate::{DetailPage, Network, SubmissionRecord};
use std::collections::HashSet;

/// The default number of submissions per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// How a detail page load was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// A user initiated load, e.g. page navigation. Replaces the displayed rows.
    Foreground,
    /// A periodic refresh. Only surfaces rows not displayed yet.
    Background,
}

/// The displayed page of a rollup's submission history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// The network of the rollup.
    pub network: Network,
    /// The application id of the rollup.
    pub app_id: String,
    /// The signer address of the rollup.
    pub address: String,
    page: u32,
    page_size: u32,
    rows: Vec<SubmissionRecord>,
    total_pages: u32,
}

impl DetailView {
    /// Returns an empty view positioned on the first page.
    pub fn new(
        network: Network,
        app_id: impl Into<String>,
        address: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            network,
            app_id: app_id.into(),
            address: address.into(),
            page: 1,
            page_size: page_size.max(1),
            rows: Vec::new(),
            total_pages: 1,
        }
    }

    /// The displayed page, starting at 1.
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The number of rows per page.
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The displayed rows.
    pub fn rows(&self) -> &[SubmissionRecord] {
        &self.rows
    }

    /// The number of pages reported by the last load.
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Applies the result of loading `page`. Returns true if the displayed rows changed.
    ///
    /// Foreground loads replace the rows. Background loads prepend the rows whose transaction
    /// hash is not displayed yet and truncate back to the page size, so rows already on screen
    /// keep their relative order. Results for a page other than the displayed one are dropped.
    pub fn apply(&mut self, page: u32, result: DetailPage, mode: LoadMode) -> bool {
        if page != self.page {
            return false;
        }
        self.total_pages = result.total_pages(self.page_size);

        if mode == LoadMode::Foreground || self.rows.is_empty() {
            let changed = self.rows != result.data;
            self.rows = result.data;
            return changed;
        }

        let fresh = {
            let displayed =
                self.rows.iter().map(|row| row.tx_hash.as_deref()).collect::<HashSet<_>>();
            result
                .data
                .into_iter()
                .filter(|row| !displayed.contains(&row.tx_hash.as_deref()))
                .collect::<Vec<_>>()
        };
        if fresh.is_empty() {
            return false;
        }

        let mut rows = fresh;
        rows.append(&mut self.rows);
        rows.truncate(self.page_size as usize);
        self.rows = rows;
        true
    }

    /// Moves to `page`, clamped to the known page range. Returns true if the page changed, in
    /// which case the caller must issue a foreground load.
    pub fn go_to(&mut self, page: u32) -> bool {
        let page = page.clamp(1, self.total_pages.max(1));
        if page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Moves to the next page.
    pub fn next_page(&mut self) -> bool {
        self.go_to(self.page.saturating_add(1))
    }

    /// Moves to the previous page.
    pub fn previous_page(&mut self) -> bool {
        self.go_to(self.page.saturating_sub(1))
    }

    /// Moves to the first page.
    pub fn first_page(&mut self) -> bool {
        self.go_to(1)
    }

    /// Moves to the last page.
    pub fn last_page(&mut self) -> bool {
        self.go_to(self.total_pages)
    }
}
