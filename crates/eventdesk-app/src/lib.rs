// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod checkout;
pub mod confirm;
pub mod export;
pub mod forms;
pub mod ids;
pub mod listing;
pub mod model;
pub mod state;
pub mod survey;
pub mod validation;

pub use checkout::*;
pub use confirm::*;
pub use export::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use state::*;
pub use survey::*;
