pub mod adapters;
pub mod catalog;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::EngagementConfig;

pub use adapters::form_intake::FormSubmission;
pub use catalog::Catalog;
pub use core::engine::{EngagementEstimate, ScopingEngine};
pub use domain::model::{ScopeAnswer, Submission};
pub use utils::error::{Result, ScopingError};
