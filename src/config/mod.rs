#[cfg(feature = "cli")]
pub mod cli;
pub mod engagement;

#[cfg(feature = "cli")]
pub use cli::{CliArgs, LogFormat};
pub use engagement::{EngagementConfig, EngagementInfo};
