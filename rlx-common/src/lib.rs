// rlx-common/src/lib.rs
pub mod app_file;
pub mod config;
pub mod error;
pub mod model;
pub mod term;

// Re-export key types
pub use config::{Config, ReleaseConfig, ResolveInputs};
pub use error::{Result, RlxError};
pub use model::{AppDescriptor, AppRegistry, Goal, Vsn};
