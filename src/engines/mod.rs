//! Engine catalog module
//!
//! Defines the Engine type and the fixed, ordered catalog of known engines.

mod builtin;
mod catalog;

pub use builtin::builtin_engines;
pub use catalog::*;
