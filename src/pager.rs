//! Cursor over the raw rows of a filtered table.

use crate::table::{TripRecord, TripTable};

pub const PAGE_SIZE: usize = 5;

/// Hands out consecutive windows of rows in table order.
///
/// The cursor only moves forward. Once the table is exhausted every call
/// returns an empty page.
#[derive(Debug)]
pub struct RowPager<'a> {
    table: &'a TripTable,
    cursor: usize,
    page_size: usize,
}

impl<'a> RowPager<'a> {
    pub fn new(table: &'a TripTable) -> Self {
        Self::with_page_size(table, PAGE_SIZE)
    }

    /// A page size of zero is treated as one.
    pub fn with_page_size(table: &'a TripTable, page_size: usize) -> Self {
        RowPager {
            table,
            cursor: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn next_page(&mut self) -> Vec<TripRecord> {
        let end = self.cursor.saturating_add(self.page_size).min(self.table.len());
        let page = (self.cursor..end)
            .filter_map(|i| self.table.record(i))
            .collect();
        self.cursor = self.cursor.saturating_add(self.page_size);
        page
    }

    /// Index of the first row of the next page.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.table.len()
    }
}
