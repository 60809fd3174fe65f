//! Static task suggestions offered before a goal is scheduled.

use crate::error::AppError;
use crate::model::SuggestedTask;
use crate::schedule::reorder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BASE_STEPS: [&str; 5] = [
    "Break the goal into small steps",
    "Set a deadline for each step",
    "Review progress regularly",
    "Ask for help when you get stuck",
    "Make time to celebrate wins",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Personal,
    Work,
    Learning,
    Health,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Personal, Self::Work, Self::Learning, Self::Health];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Work => "work",
            Self::Learning => "learning",
            Self::Health => "health",
        }
    }

    fn extra_steps(&self) -> [&'static str; 2] {
        match self {
            Self::Personal => ["Clarify personal priorities", "Build a daily habit"],
            Self::Work => ["Share the goal with your team", "Schedule regular progress check-ins"],
            Self::Learning => ["Collect learning resources", "Review what you learned regularly"],
            Self::Health => ["Plan an exercise routine", "Keep a food journal"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "work" => Ok(Self::Work),
            "learning" | "study" => Ok(Self::Learning),
            "health" | "fitness" => Ok(Self::Health),
            _ => {
                let known: Vec<&str> = Self::ALL.iter().map(Category::as_str).collect();
                Err(AppError::invalid_input(format!(
                    "unknown category '{}', expected one of {}",
                    raw.trim(),
                    known.join(", ")
                )))
            }
        }
    }
}

/// The base steps, followed by the category's own steps when there is one.
pub fn suggestions_for(category: Option<Category>) -> Vec<SuggestedTask> {
    let extra = category.map(|category| category.extra_steps());

    BASE_STEPS
        .iter()
        .chain(extra.iter().flatten())
        .enumerate()
        .map(|(index, title)| SuggestedTask {
            id: format!("task-{}", index + 1),
            title: title.to_string(),
            selected: false,
        })
        .collect()
}

pub fn toggle_suggestion(tasks: &[SuggestedTask], id: &str) -> Vec<SuggestedTask> {
    tasks
        .iter()
        .map(|task| SuggestedTask {
            selected: if task.id == id { !task.selected } else { task.selected },
            ..task.clone()
        })
        .collect()
}

/// Rename a suggestion. Blank titles are ignored.
pub fn retitle_suggestion(tasks: &[SuggestedTask], id: &str, title: &str) -> Vec<SuggestedTask> {
    let trimmed = title.trim();
    tasks
        .iter()
        .map(|task| {
            if task.id == id && !trimmed.is_empty() {
                SuggestedTask {
                    title: trimmed.to_string(),
                    ..task.clone()
                }
            } else {
                task.clone()
            }
        })
        .collect()
}

/// Append a user-written task, already selected. Blank titles are ignored.
pub fn add_suggestion(tasks: &[SuggestedTask], title: &str) -> Vec<SuggestedTask> {
    let mut updated = tasks.to_vec();
    let trimmed = title.trim();
    if !trimmed.is_empty() {
        updated.push(SuggestedTask {
            id: format!("task-{}", tasks.len() + 1),
            title: trimmed.to_string(),
            selected: true,
        });
    }
    updated
}

/// # Panics
///
/// Panics if either index is out of range.
pub fn reorder_suggestions(tasks: &[SuggestedTask], old_index: usize, new_index: usize) -> Vec<SuggestedTask> {
    reorder(tasks, old_index, new_index)
}

/// Titles of the selected suggestions, in list order, ready for partitioning.
pub fn accepted_titles(tasks: &[SuggestedTask]) -> Vec<String> {
    tasks
        .iter()
        .filter(|task| task.selected)
        .map(|task| task.title.clone())
        .collect()
}
