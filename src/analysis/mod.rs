//! Analysis modules.
//!
//! Group-by aggregation and threshold filtering over a loaded dataset.

pub mod aggregator;
pub mod filter;

pub use aggregator::*;
pub use filter::*;
