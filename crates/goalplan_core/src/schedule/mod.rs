//! Milestone scheduling: the initial partition and every later edit.

pub mod adjust;
pub mod partition;

pub use adjust::{
    add_task, locate_milestone, locate_task, remove_task, reorder, reorder_task, retitle_task,
    set_milestone_date_direct, set_task_date, toggle_task_completion,
};
pub use partition::{ScheduleConfig, partition};
