//! Report module for RackCarbon
//!
//! Typed savings reports and their text/JSON/CSV renderers.

mod summary;

pub use summary::*;
