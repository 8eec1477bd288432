// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PageSize {
    Five,
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [Self; 5] = [
        Self::Five,
        Self::Ten,
        Self::TwentyFive,
        Self::Fifty,
        Self::Hundred,
    ];

    pub const fn get(self) -> usize {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }

    pub fn from_len(value: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.get() == value)
    }

    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|size| *size == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::Ten
    }
}

/// Page window over a filtered sequence. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: usize,
    page_size: PageSize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl Pagination {
    pub const fn new(page_size: PageSize) -> Self {
        Self { page: 1, page_size }
    }

    /// Builds a pagination at `page`; a zero page is raised to 1.
    pub fn at(page: usize, page_size: PageSize) -> Self {
        Self {
            page: page.max(1),
            page_size,
        }
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size.get()).max(1)
    }

    pub fn range(&self, len: usize) -> std::ops::Range<usize> {
        let size = self.page_size.get();
        let start = (self.page - 1).saturating_mul(size).min(len);
        let end = self.page.saturating_mul(size).min(len);
        start..end
    }

    /// Rows of the current page. Empty when `page` is past the last page;
    /// narrowing a filter does not move `page` back into range.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }

    pub fn is_past_end(&self, len: usize) -> bool {
        self.page > self.total_pages(len)
    }

    /// Advances one page; returns false when already on the last page.
    pub fn next(&mut self, len: usize) -> bool {
        let total = self.total_pages(len);
        if self.page >= total {
            self.page = self.page.min(total);
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev(&mut self, len: usize) -> bool {
        let total = self.total_pages(len);
        if self.page > total {
            self.page = total;
            return true;
        }
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn go_to(&mut self, page: usize, len: usize) -> usize {
        self.page = page.clamp(1, self.total_pages(len));
        self.page
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }
}
