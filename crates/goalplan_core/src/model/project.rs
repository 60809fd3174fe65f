use super::milestone::Milestone;
use super::task::Task;
use crate::error::AppError;
use crate::progress::project_progress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::Date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Struggling,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Struggling => "struggling",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "not-started" | "new" => Ok(Self::NotStarted),
            "in-progress" | "active" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            "struggling" => Ok(Self::Struggling),
            _ => Err(AppError::invalid_input(format!("unknown status '{}'", raw.trim()))),
        }
    }
}

/// A goal with its milestone schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub deadline: Date,
    pub start_date: Date,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    pub created_at: String,
}

impl Project {
    /// Average of milestone progress values.
    pub fn progress(&self) -> u8 {
        project_progress(&self.milestones)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.milestones.iter().flat_map(|milestone| milestone.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.tasks().count()
    }

    /// Titles in display order, used when re-partitioning.
    pub fn task_titles(&self) -> Vec<String> {
        self.tasks().map(|task| task.title.clone()).collect()
    }
}
