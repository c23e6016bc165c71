//! Page-level primitives
//!
//! Built on [`PageDriver`](crate::driver::PageDriver):
//! 1. navigation - navigate, history moves, reload, stop, each followed by an event wait
//! 2. query - history entries, location, title
//! 3. location waits - poll until the location leaves a given value

mod location;
mod navigate;
mod query;

pub use location::*;
pub use navigate::*;
pub use query::*;
