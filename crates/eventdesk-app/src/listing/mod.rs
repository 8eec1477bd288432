// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Client-side list state: filter, paginate, select.
//!
//! A collection flows through [`FilterState::matches`], then a
//! [`Pagination`] window, and finally into rendered rows. Selection and modal
//! state sit on top of the window and never change which rows are derived.

mod filter;
mod modal;
mod paging;
mod selection;
mod view;

pub use filter::*;
pub use modal::*;
pub use paging::*;
pub use selection::*;
pub use view::*;
