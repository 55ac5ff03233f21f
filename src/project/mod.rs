/// Project management module
///
/// Project, unit and task records and their storage in the hosted data service.

pub mod storage;
pub mod types;

pub use storage::ProjectStorage;
pub use types::{NewProject, Project, ProjectOverview, ProjectPatch, ProjectStatus, Task, Unit};
