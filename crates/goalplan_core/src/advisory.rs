//! Rule-based notes about a project's schedule.

use crate::dates::{add_days, days_between, format_date};
use crate::model::{Project, ProjectStatus};
use serde::Serialize;
use time::Date;

pub const DEFAULT_HORIZON_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// Status implied by the schedule as of `today`.
pub fn derive_status(project: &Project, today: Date) -> ProjectStatus {
    let total = project.task_count();
    let completed = project.tasks().filter(|task| task.completed).count();

    if total > 0 && completed == total {
        return ProjectStatus::Completed;
    }

    let overdue = project
        .tasks()
        .any(|task| !task.completed && task.end_date < today);
    if overdue {
        return ProjectStatus::Struggling;
    }

    if completed > 0 || today >= project.start_date {
        ProjectStatus::InProgress
    } else {
        ProjectStatus::NotStarted
    }
}

pub fn advisories(project: &Project, today: Date, horizon_days: i64) -> Vec<Advisory> {
    let mut notes = Vec::new();
    let horizon = add_days(today, horizon_days);

    for task in project.tasks().filter(|task| !task.completed) {
        if task.end_date < today {
            notes.push(Advisory {
                kind: AdvisoryKind::Warning,
                title: format!("'{}' is overdue", task.title),
                detail: format!(
                    "It was due {} ({} days ago). Reschedule it or mark it done.",
                    format_date(task.end_date),
                    days_between(task.end_date, today)
                ),
                task_id: Some(task.id.clone()),
            });
        } else if task.end_date <= horizon {
            notes.push(Advisory {
                kind: AdvisoryKind::Warning,
                title: format!("'{}' is due soon", task.title),
                detail: format!(
                    "Due {}, {} days left. Check its progress.",
                    format_date(task.end_date),
                    days_between(today, task.end_date)
                ),
                task_id: Some(task.id.clone()),
            });
        }
    }

    let open = project.tasks().filter(|task| !task.completed).count();
    if project.deadline < today && open > 0 {
        notes.push(Advisory {
            kind: AdvisoryKind::Warning,
            title: "Deadline has passed".to_string(),
            detail: format!(
                "The goal was due {} with {open} task(s) still open. Consider replanning.",
                format_date(project.deadline)
            ),
            task_id: None,
        });
    }

    if project.task_count() > 0 && open == 0 {
        notes.push(Advisory {
            kind: AdvisoryKind::Info,
            title: "All tasks complete".to_string(),
            detail: format!("Every task for '{}' is done.", project.title),
            task_id: None,
        });
    }

    notes
}
