//! Per-page view state.

pub mod filter;
pub mod gender;
pub mod randomizer;
pub mod types;

pub use filter::{Baseline, FilterScope, FilterState};
pub use gender::GenderPage;
pub use randomizer::{Randomizer, SpinConfig, SpinError, SpinStep};
pub use types::TypePage;

#[cfg(test)]
pub(crate) mod testing;
