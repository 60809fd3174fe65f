//! Completion roll-ups. Always recomputed from scratch.

use crate::model::{Milestone, Task};

/// `round(100 * part / whole)` with halves rounding up; 0 when `whole` is 0.
fn rounded_percent(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let percent = (200 * part + whole) / (2 * whole);
    percent.min(100) as u8
}

/// Share of completed tasks, 0..=100.
pub fn milestone_progress(tasks: &[Task]) -> u8 {
    let completed = tasks.iter().filter(|task| task.completed).count();
    rounded_percent(completed as u64, tasks.len() as u64)
}

/// Average of the milestones' own progress values, each milestone weighted
/// equally regardless of how many tasks it holds.
pub fn project_progress(milestones: &[Milestone]) -> u8 {
    let total: u64 = milestones
        .iter()
        .map(|milestone| u64::from(milestone.progress))
        .sum();
    rounded_percent(total, 100 * milestones.len() as u64)
}
