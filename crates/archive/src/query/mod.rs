//! Query API for archive views
//!
//! Pure functions that turn a store snapshot and a [`QuerySpec`] into the
//! ordered list shown to the user.

mod engine;
mod parser;
mod spec;

pub use engine::{matches_spec, run_query, sort_messages};
pub use parser::{parse_query, parse_query_with};
pub use spec::{QuerySpec, SortKey, StarFilter};
