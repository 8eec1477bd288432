// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Dialog visibility plus the entity it targets. Open iff a target is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal<T> {
    target: Option<T>,
}

impl<T> Default for Modal<T> {
    fn default() -> Self {
        Self { target: None }
    }
}

impl<T> Modal<T> {
    /// Opens on `target`, replacing any previous one.
    pub fn open(&mut self, target: T) -> Option<T> {
        self.target.replace(target)
    }

    pub fn close(&mut self) -> Option<T> {
        self.target.take()
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }
}
