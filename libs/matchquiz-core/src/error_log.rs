//! Wrong-answer history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One incorrect drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongLogEntry {
    pub subtopic_name: String,
    pub dropped_into: String,
    pub correct_topic: String,
    pub timestamp: DateTime<Utc>,
}

/// A row of a rendered page. `label` is the 1-based position of the entry
/// in logging order, so the Nth error keeps label N on every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRow<'a> {
    pub label: usize,
    pub entry: &'a WrongLogEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogPage<'a> {
    pub rows: Vec<LogRow<'a>>,
    pub page: usize,
    pub total_pages: usize,
}

/// Append-only log, cleared only by a quiz reset.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Vec<WrongLogEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: WrongLogEntry) {
        self.entries.push(entry);
    }

    /// Entries in logging order.
    pub fn entries(&self) -> &[WrongLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn total_pages(&self, page_size: usize) -> usize {
        self.entries.len().div_ceil(page_size.max(1))
    }

    /// Newest-first page `page_number` (1-based). Out-of-range pages are empty.
    pub fn page(&self, page_number: usize, page_size: usize) -> LogPage<'_> {
        let page_size = page_size.max(1);
        let total = self.entries.len();
        let total_pages = self.total_pages(page_size);

        let rows = if page_number == 0 || page_number > total_pages {
            Vec::new()
        } else {
            let start = (page_number - 1) * page_size;
            let end = (start + page_size).min(total);
            (start..end)
                .map(|reversed| LogRow {
                    label: total - reversed,
                    entry: &self.entries[total - 1 - reversed],
                })
                .collect()
        };

        LogPage {
            rows,
            page: page_number,
            total_pages,
        }
    }
}

/// Tracks which log page is showing.
#[derive(Debug, Clone)]
pub struct LogPager {
    current: usize,
    page_size: usize,
}

impl LogPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Move to page `n`. Returns false and stays put when `n` is out of range.
    pub fn change_page(&mut self, n: usize, log: &ErrorLog) -> bool {
        if n < 1 || n > log.total_pages(self.page_size) {
            return false;
        }
        self.current = n;
        true
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    pub fn page<'a>(&self, log: &'a ErrorLog) -> LogPage<'a> {
        log.page(self.current, self.page_size)
    }
}

impl Default for LogPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
