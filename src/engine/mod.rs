pub mod recompute;
pub mod topology;
#[cfg(test)]
pub mod integration_tests;

pub use recompute::{merge_incomers, RecomputeEngine, RecomputeReport, Signature, TableOutcome};
pub use topology::{table_order, TableOrder};
