// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

/// Selected row ids, scoped to the visible page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet<Id: Ord> {
    ids: BTreeSet<Id>,
}

impl<Id: Ord> Default for SelectionSet<Id> {
    fn default() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }
}

impl<Id: Ord + Copy> SelectionSet<Id> {
    /// Flips membership of `id`; returns whether it is now selected.
    pub fn toggle_one(&mut self, id: Id) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Selects exactly `page_ids`, or clears when that is already the
    /// selection. Returns whether anything is selected afterwards.
    pub fn toggle_all<I>(&mut self, page_ids: I) -> bool
    where
        I: IntoIterator<Item = Id>,
    {
        let page: BTreeSet<Id> = page_ids.into_iter().collect();
        if !page.is_empty() && self.ids == page {
            self.ids.clear();
        } else {
            self.ids = page;
        }
        !self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn remove(&mut self, id: Id) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.ids.iter().copied()
    }

    pub fn covers<I>(&self, page_ids: I) -> bool
    where
        I: IntoIterator<Item = Id>,
    {
        let mut any = false;
        for id in page_ids {
            any = true;
            if !self.ids.contains(&id) {
                return false;
            }
        }
        any
    }
}
