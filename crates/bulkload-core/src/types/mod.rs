//! Core types for Bulkload

mod import;
mod preview;
mod source;

pub use import::*;
pub use preview::*;
pub use source::*;
