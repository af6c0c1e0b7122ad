pub use crate::compare::{cmp_funcs, contains, equal, CompareFn, Diff};
pub use crate::errors::HarnessError;
pub use crate::trial::{Case, Cases, Trial};
pub use crate::value::{Reflect, Value};

pub mod compare;
pub mod errors;
pub mod trial;
pub mod value;
