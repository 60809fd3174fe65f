use serde::{Deserialize, Serialize};
use time::Date;

/// A schedulable unit of work inside a milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, start_date: Date, end_date: Date) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_date,
            end_date,
            completed: false,
        }
    }
}

/// Candidate task shown before a schedule exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedTask {
    pub id: String,
    pub title: String,
    pub selected: bool,
}

/// Which end of a date span an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateEdge {
    Start,
    End,
}
