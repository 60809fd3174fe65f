use super::task::Task;
use crate::progress::milestone_progress;
use serde::{Deserialize, Serialize};
use time::Date;

/// A time-bounded group of tasks.
///
/// Once it has tasks, the date span is derived from them; call
/// [`Milestone::recompute`] after changing dates or membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub start_date: Date,
    pub end_date: Date,
    pub color: String,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Milestone {
    /// Stretch the span to the union of the task spans. No-op without tasks.
    pub fn fit_to_tasks(&mut self) {
        let earliest = self.tasks.iter().map(|task| task.start_date).min();
        let latest = self.tasks.iter().map(|task| task.end_date).max();

        if let (Some(start), Some(end)) = (earliest, latest) {
            self.start_date = start;
            self.end_date = end;
        }
    }

    pub fn refresh_progress(&mut self) {
        self.progress = milestone_progress(&self.tasks);
    }

    pub fn recompute(&mut self) {
        self.fit_to_tasks();
        self.refresh_progress();
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }
}
