mod milestone;
mod project;
mod task;

pub use milestone::Milestone;
pub use project::{Project, ProjectStatus};
pub use task::{DateEdge, SuggestedTask, Task};
