//! Repository methods, implemented as `impl CirculationService` blocks
//! grouped by entity.

pub mod audit;
pub mod borrow;
pub mod donation;
pub mod history;
