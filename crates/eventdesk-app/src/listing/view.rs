// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt::Debug;

use super::{FilterField, FilterState, Filterable, PageSize, Pagination, SelectionSet};

/// Rows with a stable identity.
pub trait Keyed {
    type Key: Copy + Ord + Debug;

    fn key(&self) -> Self::Key;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand<K> {
    SetTerm(String),
    PushTermChar(char),
    PopTermChar,
    Select(FilterField, Option<String>),
    /// Steps the selector through the values present in the collection,
    /// then back to "any".
    CycleSelection(FilterField),
    ClearFilters,
    NextPage,
    PrevPage,
    GoToPage(usize),
    SetPageSize(PageSize),
    CyclePageSize,
    MoveCursor(isize),
    ToggleRow(K),
    ToggleCursorRow,
    ToggleAllOnPage,
    ClearSelection,
}

impl<K> ListCommand<K> {
    /// Re-keys the command for another collection. `None` when the row key
    /// does not belong to it.
    pub fn map_key<U>(self, map: impl FnOnce(K) -> Option<U>) -> Option<ListCommand<U>> {
        Some(match self {
            Self::SetTerm(term) => ListCommand::SetTerm(term),
            Self::PushTermChar(ch) => ListCommand::PushTermChar(ch),
            Self::PopTermChar => ListCommand::PopTermChar,
            Self::Select(field, value) => ListCommand::Select(field, value),
            Self::CycleSelection(field) => ListCommand::CycleSelection(field),
            Self::ClearFilters => ListCommand::ClearFilters,
            Self::NextPage => ListCommand::NextPage,
            Self::PrevPage => ListCommand::PrevPage,
            Self::GoToPage(page) => ListCommand::GoToPage(page),
            Self::SetPageSize(size) => ListCommand::SetPageSize(size),
            Self::CyclePageSize => ListCommand::CyclePageSize,
            Self::MoveCursor(delta) => ListCommand::MoveCursor(delta),
            Self::ToggleRow(key) => ListCommand::ToggleRow(map(key)?),
            Self::ToggleCursorRow => ListCommand::ToggleCursorRow,
            Self::ToggleAllOnPage => ListCommand::ToggleAllOnPage,
            Self::ClearSelection => ListCommand::ClearSelection,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    FilterChanged { matched: usize },
    PageChanged { page: usize, total: usize },
    PageSizeChanged(PageSize),
    SelectionChanged { selected: usize },
    CursorMoved(usize),
    Unchanged,
}

/// Full in-memory collection plus the state that derives the visible rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<T: Keyed> {
    items: Vec<T>,
    filter: FilterState,
    pagination: Pagination,
    selection: SelectionSet<T::Key>,
    cursor: usize,
}

impl<T: Keyed> Default for ListView<T> {
    fn default() -> Self {
        Self::new(Vec::new(), PageSize::default())
    }
}

impl<T: Keyed> ListView<T> {
    pub fn new(items: Vec<T>, page_size: PageSize) -> Self {
        Self {
            items,
            filter: FilterState::default(),
            pagination: Pagination::new(page_size),
            selection: SelectionSet::default(),
            cursor: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn selection(&self) -> &SelectionSet<T::Key> {
        &self.selection
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, key: T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.selection.clear();
        self.cursor = 0;
    }

    /// Drops the row with `key` by rebuilding the collection without it.
    pub fn remove(&mut self, key: T::Key) -> Option<T> {
        let mut removed = None;
        let items = std::mem::take(&mut self.items);
        self.items = items
            .into_iter()
            .filter_map(|item| {
                if removed.is_none() && item.key() == key {
                    removed = Some(item);
                    None
                } else {
                    Some(item)
                }
            })
            .collect();
        self.selection.remove(key);
        removed
    }

    /// Swaps in `updated` for the row with the same key.
    pub fn replace(&mut self, updated: T) -> bool
    where
        T: Clone,
    {
        let key = updated.key();
        let mut found = false;
        let items = std::mem::take(&mut self.items);
        self.items = items
            .into_iter()
            .map(|item| {
                if item.key() == key {
                    found = true;
                    updated.clone()
                } else {
                    item
                }
            })
            .collect();
        found
    }
}

impl<T: Keyed + Filterable> ListView<T> {
    pub fn filtered(&self) -> Vec<&T> {
        super::apply_filter(&self.items, &self.filter)
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.filtered_count())
    }

    pub fn page_rows(&self) -> Vec<&T> {
        let filtered = self.filtered();
        self.pagination.window(&filtered).to_vec()
    }

    pub fn page_keys(&self) -> Vec<T::Key> {
        self.page_rows().into_iter().map(Keyed::key).collect()
    }

    pub fn cursor_row(&self) -> Option<&T> {
        self.page_rows().get(self.cursor).copied()
    }

    pub fn selected_rows(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| self.selection.contains(item.key()))
            .collect()
    }

    /// Distinct values of `field` in collection order.
    pub fn category_values(&self, field: FilterField) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for item in &self.items {
            if let Some(value) = item.category(field)
                && !values.iter().any(|known| known.as_str() == &*value)
            {
                values.push(value.into_owned());
            }
        }
        values
    }

    pub fn apply(&mut self, command: ListCommand<T::Key>) -> Vec<ListEvent> {
        match command {
            ListCommand::SetTerm(term) => {
                if self.filter.term == term {
                    return vec![ListEvent::Unchanged];
                }
                self.filter.term = term;
                self.filter_changed()
            }
            ListCommand::PushTermChar(ch) => {
                self.filter.term.push(ch);
                self.filter_changed()
            }
            ListCommand::PopTermChar => {
                if self.filter.term.pop().is_none() {
                    return vec![ListEvent::Unchanged];
                }
                self.filter_changed()
            }
            ListCommand::Select(field, value) => {
                self.filter.set_selection(field, value);
                self.filter_changed()
            }
            ListCommand::CycleSelection(field) => {
                let values = self.category_values(field);
                let next = match self.filter.selection(field) {
                    None => values.first().cloned(),
                    Some(current) => values
                        .iter()
                        .position(|value| value == current)
                        .and_then(|index| values.get(index + 1))
                        .cloned(),
                };
                self.filter.set_selection(field, next);
                self.filter_changed()
            }
            ListCommand::ClearFilters => {
                if self.filter.is_empty() {
                    return vec![ListEvent::Unchanged];
                }
                self.filter.clear();
                self.filter_changed()
            }
            ListCommand::NextPage => {
                let len = self.filtered_count();
                if !self.pagination.next(len) {
                    return vec![ListEvent::Unchanged];
                }
                self.page_changed(len)
            }
            ListCommand::PrevPage => {
                let len = self.filtered_count();
                if !self.pagination.prev(len) {
                    return vec![ListEvent::Unchanged];
                }
                self.page_changed(len)
            }
            ListCommand::GoToPage(page) => {
                let len = self.filtered_count();
                let before = self.pagination.page();
                if self.pagination.go_to(page, len) == before {
                    return vec![ListEvent::Unchanged];
                }
                self.page_changed(len)
            }
            ListCommand::SetPageSize(size) => self.page_size_changed(size),
            ListCommand::CyclePageSize => {
                let size = self.pagination.page_size().next();
                self.page_size_changed(size)
            }
            ListCommand::MoveCursor(delta) => {
                let rows = self.page_rows().len();
                if rows == 0 {
                    self.cursor = 0;
                    return vec![ListEvent::Unchanged];
                }
                let max = rows as isize - 1;
                self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
                vec![ListEvent::CursorMoved(self.cursor)]
            }
            ListCommand::ToggleRow(key) => {
                if !self.page_keys().contains(&key) {
                    return vec![ListEvent::Unchanged];
                }
                self.selection.toggle_one(key);
                vec![ListEvent::SelectionChanged {
                    selected: self.selection.len(),
                }]
            }
            ListCommand::ToggleCursorRow => match self.cursor_row().map(Keyed::key) {
                Some(key) => {
                    self.selection.toggle_one(key);
                    vec![ListEvent::SelectionChanged {
                        selected: self.selection.len(),
                    }]
                }
                None => vec![ListEvent::Unchanged],
            },
            ListCommand::ToggleAllOnPage => {
                let keys = self.page_keys();
                self.selection.toggle_all(keys);
                vec![ListEvent::SelectionChanged {
                    selected: self.selection.len(),
                }]
            }
            ListCommand::ClearSelection => {
                if self.selection.is_empty() {
                    return vec![ListEvent::Unchanged];
                }
                self.selection.clear();
                vec![ListEvent::SelectionChanged { selected: 0 }]
            }
        }
    }

    /// Drops filter and selection, used when leaving the tab.
    pub fn reset_filters(&mut self) {
        self.filter.clear();
        self.selection.clear();
        self.cursor = 0;
    }

    fn filter_changed(&mut self) -> Vec<ListEvent> {
        self.cursor = 0;
        let mut events = vec![ListEvent::FilterChanged {
            matched: self.filtered_count(),
        }];
        events.extend(self.drop_selection());
        events
    }

    fn page_changed(&mut self, len: usize) -> Vec<ListEvent> {
        self.cursor = 0;
        let mut events = vec![ListEvent::PageChanged {
            page: self.pagination.page(),
            total: self.pagination.total_pages(len),
        }];
        events.extend(self.drop_selection());
        events
    }

    fn page_size_changed(&mut self, size: PageSize) -> Vec<ListEvent> {
        self.pagination.set_page_size(size);
        self.cursor = 0;
        let mut events = vec![ListEvent::PageSizeChanged(size)];
        events.extend(self.drop_selection());
        events
    }

    fn drop_selection(&mut self) -> Option<ListEvent> {
        if self.selection.is_empty() {
            return None;
        }
        self.selection.clear();
        Some(ListEvent::SelectionChanged { selected: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::{Keyed, ListCommand, ListEvent, ListView};
    use crate::listing::{FilterField, Filterable, PageSize};
    use std::borrow::Cow;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        id: i64,
        name: String,
        group: Option<&'static str>,
    }

    impl Keyed for Row {
        type Key = i64;

        fn key(&self) -> i64 {
            self.id
        }
    }

    impl Filterable for Row {
        fn search_fields(&self) -> Vec<Cow<'_, str>> {
            vec![Cow::Borrowed(self.name.as_str())]
        }

        fn category(&self, field: FilterField) -> Option<Cow<'_, str>> {
            match field {
                FilterField::Activity => self.group.map(Cow::Borrowed),
                _ => None,
            }
        }
    }

    fn view(count: i64) -> ListView<Row> {
        let rows = (1..=count)
            .map(|id| Row {
                id,
                name: format!("row {id}"),
                group: if id % 2 == 0 { Some("even") } else { Some("odd") },
            })
            .collect();
        ListView::new(rows, PageSize::Five)
    }

    #[test]
    fn page_change_clears_selection() {
        let mut view = view(12);
        view.apply(ListCommand::ToggleAllOnPage);
        assert_eq!(view.selection().len(), 5);

        let events = view.apply(ListCommand::NextPage);
        assert_eq!(
            events,
            vec![
                ListEvent::PageChanged { page: 2, total: 3 },
                ListEvent::SelectionChanged { selected: 0 },
            ]
        );
        assert!(view.selection().is_empty());
    }

    #[test]
    fn filter_change_clears_selection_and_keeps_page() {
        let mut view = view(12);
        view.apply(ListCommand::GoToPage(3));
        view.apply(ListCommand::ToggleCursorRow);
        assert_eq!(view.selection().len(), 1);

        view.apply(ListCommand::SetTerm("row 1".to_owned()));
        assert!(view.selection().is_empty());
        assert_eq!(view.pagination().page(), 3);
        assert!(view.page_rows().is_empty());
        assert_eq!(view.total_pages(), 1);
    }

    #[test]
    fn toggle_row_ignores_rows_off_the_page() {
        let mut view = view(12);
        assert_eq!(view.apply(ListCommand::ToggleRow(9)), vec![ListEvent::Unchanged]);
        view.apply(ListCommand::ToggleRow(2));
        assert!(view.selection().contains(2));
    }

    #[test]
    fn cycle_selection_walks_values_then_clears() {
        let mut view = view(4);
        view.apply(ListCommand::CycleSelection(FilterField::Activity));
        assert_eq!(view.filter().selection(FilterField::Activity), Some("odd"));
        view.apply(ListCommand::CycleSelection(FilterField::Activity));
        assert_eq!(view.filter().selection(FilterField::Activity), Some("even"));
        view.apply(ListCommand::CycleSelection(FilterField::Activity));
        assert_eq!(view.filter().selection(FilterField::Activity), None);
    }

    #[test]
    fn cursor_is_clamped_to_page_rows() {
        let mut view = view(7);
        view.apply(ListCommand::MoveCursor(20));
        assert_eq!(view.cursor(), 4);
        view.apply(ListCommand::NextPage);
        assert_eq!(view.cursor(), 0);
        view.apply(ListCommand::MoveCursor(20));
        assert_eq!(view.cursor(), 1);
        view.apply(ListCommand::MoveCursor(-9));
        assert_eq!(view.cursor(), 0);
    }

    #[test]
    fn remove_and_replace_rebuild_collection() {
        let mut view = view(3);
        view.apply(ListCommand::ToggleRow(2));
        let removed = view.remove(2).expect("row 2 exists");
        assert_eq!(removed.id, 2);
        assert_eq!(view.items().len(), 2);
        assert!(!view.selection().contains(2));
        assert!(view.remove(2).is_none());

        let mut updated = view.get(3).cloned().expect("row 3 exists");
        updated.name = "renamed".to_owned();
        assert!(view.replace(updated));
        assert_eq!(view.get(3).map(|row| row.name.as_str()), Some("renamed"));
    }

    #[test]
    fn page_size_cycle_resets_to_first_page() {
        let mut view = view(30);
        view.apply(ListCommand::GoToPage(2));
        let events = view.apply(ListCommand::CyclePageSize);
        assert_eq!(events, vec![ListEvent::PageSizeChanged(PageSize::Ten)]);
        assert_eq!(view.pagination().page(), 1);
        assert_eq!(view.page_rows().len(), 10);
    }
}
