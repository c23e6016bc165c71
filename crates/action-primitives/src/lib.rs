//! Action primitives - cancellable coordination of browser actions
//!
//! This crate provides the building blocks that drive actions against a page:
//! - `ExecScope`: hierarchical cancellation with inherited deadlines
//! - `wait_one_of`: race N actions, keep the first, cancel and join the rest
//! - `wait_until` / `interval_run`: sequential polling and periodic loops
//! - `wait_event`: block until an event satisfies a predicate
//! - navigation and query primitives over an abstract `PageDriver`

pub mod action;
pub mod config;
pub mod driver;
pub mod errors;
pub mod events;
pub mod outcome;
mod primitives;
pub mod race;
pub mod scope;
pub mod slot;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod waiting;

pub use action::*;
pub use config::*;
pub use driver::*;
pub use errors::*;
pub use events::*;
pub use outcome::*;
pub use primitives::*;
pub use race::*;
pub use scope::*;
pub use slot::*;
pub use waiting::*;
