//! Edits applied to a partitioned schedule.
//!
//! Every function takes the current milestones by reference and returns a
//! fresh vector. Callers keep the old value for undo or change detection.
//! Indices are trusted: an out-of-range index is a caller bug and panics.

use crate::model::{DateEdge, Milestone, Task};
use time::Date;

/// Move one edge of a task, then refit the owning milestone to its tasks.
///
/// No `start <= end` check is made; an inverted task is stored as given.
///
/// # Panics
///
/// Panics if `milestone_index` or `task_index` is out of range.
pub fn set_task_date(
    milestones: &[Milestone],
    milestone_index: usize,
    task_index: usize,
    edge: DateEdge,
    date: Date,
) -> Vec<Milestone> {
    let mut updated = milestones.to_vec();
    let milestone = &mut updated[milestone_index];
    let task = &mut milestone.tasks[task_index];

    match edge {
        DateEdge::Start => task.start_date = date,
        DateEdge::End => task.end_date = date,
    }
    tracing::debug!(milestone = %milestone.id, task = %task.id, ?edge, %date, "task date changed");

    milestone.recompute();
    updated
}

/// Legacy edit that sets a milestone's own date and leaves its tasks alone.
///
/// The milestone can end up disagreeing with its tasks until the next task
/// edit refits it.
///
/// # Panics
///
/// Panics if `milestone_index` is out of range.
pub fn set_milestone_date_direct(
    milestones: &[Milestone],
    milestone_index: usize,
    edge: DateEdge,
    date: Date,
) -> Vec<Milestone> {
    let mut updated = milestones.to_vec();
    let milestone = &mut updated[milestone_index];

    match edge {
        DateEdge::Start => milestone.start_date = date,
        DateEdge::End => milestone.end_date = date,
    }
    tracing::debug!(milestone = %milestone.id, ?edge, %date, "milestone date set directly");

    updated
}

/// Flip a task's completion flag. Unknown ids leave the schedule unchanged.
pub fn toggle_task_completion(milestones: &[Milestone], milestone_id: &str, task_id: &str) -> Vec<Milestone> {
    milestones
        .iter()
        .map(|milestone| {
            if milestone.id != milestone_id {
                return milestone.clone();
            }

            let mut milestone = milestone.clone();
            for task in &mut milestone.tasks {
                if task.id == task_id {
                    task.completed = !task.completed;
                }
            }
            milestone.refresh_progress();
            milestone
        })
        .collect()
}

/// Move the element at `old_index` to `new_index`, shifting the rest.
///
/// # Panics
///
/// Panics if either index is out of range.
pub fn reorder<T: Clone>(items: &[T], old_index: usize, new_index: usize) -> Vec<T> {
    assert!(
        new_index < items.len(),
        "reorder target {new_index} out of range for {} items",
        items.len()
    );
    let mut reordered = items.to_vec();
    let moved = reordered.remove(old_index);
    reordered.insert(new_index, moved);
    reordered
}

/// Reorder a task inside whichever milestone owns it. Dates are untouched.
///
/// # Panics
///
/// Panics if the task exists but `new_index` is out of range for its milestone.
pub fn reorder_task(milestones: &[Milestone], task_id: &str, new_index: usize) -> Vec<Milestone> {
    let Some((milestone_index, task_index)) = locate_task(milestones, task_id) else {
        return milestones.to_vec();
    };

    let mut updated = milestones.to_vec();
    let milestone = &mut updated[milestone_index];
    milestone.tasks = reorder(&milestone.tasks, task_index, new_index);
    updated
}

/// Append a task to a milestone and refit it.
///
/// # Panics
///
/// Panics if `milestone_index` is out of range.
pub fn add_task(milestones: &[Milestone], milestone_index: usize, task: Task) -> Vec<Milestone> {
    let mut updated = milestones.to_vec();
    let milestone = &mut updated[milestone_index];
    tracing::debug!(milestone = %milestone.id, task = %task.id, "task added");
    milestone.tasks.push(task);
    milestone.recompute();
    updated
}

/// Drop a task by id. An emptied milestone keeps its last dates.
pub fn remove_task(milestones: &[Milestone], task_id: &str) -> Vec<Milestone> {
    milestones
        .iter()
        .map(|milestone| {
            if !milestone.tasks.iter().any(|task| task.id == task_id) {
                return milestone.clone();
            }

            let mut milestone = milestone.clone();
            milestone.tasks.retain(|task| task.id != task_id);
            milestone.recompute();
            milestone
        })
        .collect()
}

pub fn retitle_task(milestones: &[Milestone], task_id: &str, title: &str) -> Vec<Milestone> {
    let mut updated = milestones.to_vec();
    for task in updated.iter_mut().flat_map(|milestone| milestone.tasks.iter_mut()) {
        if task.id == task_id {
            task.title = title.to_string();
        }
    }
    updated
}

/// `(milestone_index, task_index)` of the first task with `task_id`.
pub fn locate_task(milestones: &[Milestone], task_id: &str) -> Option<(usize, usize)> {
    milestones.iter().enumerate().find_map(|(milestone_index, milestone)| {
        milestone
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .map(|task_index| (milestone_index, task_index))
    })
}

pub fn locate_milestone(milestones: &[Milestone], milestone_id: &str) -> Option<usize> {
    milestones.iter().position(|milestone| milestone.id == milestone_id)
}
