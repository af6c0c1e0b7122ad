//! Comparison engine: exact equality, containment and function identity.
//!
//! Both [`equal`] and [`contains`] satisfy [`CompareFn`], so the case runner
//! can use either interchangeably.
//!
//! Diff text symbols:
//! - `-` marks the actual (container) side, or a subset value missing from it
//! - `+` marks the expected side, or a value only the container has

mod access;
mod contains;
mod diff;
mod exact;
mod funcs;
mod render;

pub use access::{allow_unexported, AccessGrant};
pub use contains::contains;
pub use diff::{is_equal, render as render_diff, Diff};
pub use exact::equal;
pub use funcs::cmp_funcs;
pub use render::string_diff;

use crate::value::Value;

/// The comparator contract: `(actual, expected) -> (equal, differences)`.
pub type CompareFn = fn(&Value, &Value) -> (bool, String);
