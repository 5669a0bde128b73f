pub use warrant_types::prelude::*;

pub use crate::view::PermView;

// vim: ts=4
