// src/model/mod.rs
// Declares the modules within the model directory.
pub mod app;
pub mod goal;
pub mod registry;
pub mod version;

// Re-export
pub use app::AppDescriptor;
pub use goal::Goal;
pub use registry::AppRegistry;
pub use version::Vsn;
