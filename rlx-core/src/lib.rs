// rlx-core/src/lib.rs

// Declare the top-level modules within the library crate
pub mod locate;
pub mod release;
pub mod resolve;
pub mod system_path;

// Re-export key types for easier use by the CLI crate
pub use locate::{locate, LookupContext};
pub use release::{find_erts, resolve_release, Erts, Release};
pub use resolve::{resolve, DependencyResolver};
pub use system_path::{NoSystemPath, RootLibDirs, SystemPathRegistry};
