/// YAML fixture loading.
pub mod fixtures;
pub mod workspace;

pub use fixtures::{Fixtures, LoadError};
pub use workspace::{Loaded, Unloaded, Workspace, WorkspaceError};
