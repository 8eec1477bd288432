// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterField {
    Activity,
    Standing,
    Connection,
    Signature,
    Checking,
    InviteKind,
    InviteStatus,
}

impl FilterField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Standing => "standing",
            Self::Connection => "connection",
            Self::Signature => "signature",
            Self::Checking => "checking",
            Self::InviteKind => "kind",
            Self::InviteStatus => "status",
        }
    }
}

/// Rows that can be narrowed by a [`FilterState`].
pub trait Filterable {
    /// Text fields the free-text term is matched against. Derived text such
    /// as a full name is returned owned.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Value of a categorical field, `None` when the row has no value for it.
    fn category(&self, field: FilterField) -> Option<Cow<'_, str>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub term: String,
    pub selections: BTreeMap<FilterField, String>,
}

impl FilterState {
    pub fn with_term(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            selections: BTreeMap::new(),
        }
    }

    pub fn select(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.set_selection(field, Some(value.into()));
        self
    }

    pub fn set_selection(&mut self, field: FilterField, value: Option<String>) {
        match value {
            Some(value) if !value.trim().is_empty() => {
                self.selections.insert(field, value);
            }
            _ => {
                self.selections.remove(&field);
            }
        }
    }

    pub fn selection(&self, field: FilterField) -> Option<&str> {
        self.selections
            .get(&field)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.term.trim().is_empty() && self.selections.values().all(|v| v.trim().is_empty())
    }

    pub fn clear(&mut self) {
        self.term.clear();
        self.selections.clear();
    }

    /// True iff `item` satisfies every non-blank field of this filter.
    pub fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        let needle = self.term.trim().to_lowercase();
        if !needle.is_empty()
            && !item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        {
            return false;
        }

        self.selections.iter().all(|(field, wanted)| {
            if wanted.trim().is_empty() {
                return true;
            }
            item.category(*field)
                .is_some_and(|value| &*value == wanted.as_str())
        })
    }
}

/// Filtered view over `items`, preserving input order.
pub fn apply_filter<'a, T: Filterable>(items: &'a [T], filter: &FilterState) -> Vec<&'a T> {
    if filter.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| filter.matches(*item)).collect()
}
