pub mod allocation;
pub mod effort;
pub mod engine;
pub mod formula;
pub mod kdd;
pub mod scope;

pub use crate::domain::model::{EffortResult, ScopeResult};
pub use crate::domain::ports::ScopeLookup;
pub use crate::utils::error::Result;
