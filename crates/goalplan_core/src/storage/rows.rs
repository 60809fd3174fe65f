//! Mapping between [`Project`] and the flat `projects`/`tasks` rows of a
//! relational backend.
//!
//! Milestones are stored as task rows without a parent; their tasks point
//! back at them through `parent_task_id`.

use crate::dates::{format_date, parse_date};
use crate::error::AppError;
use crate::model::{Milestone, Project, ProjectStatus, Task};
use crate::schedule::ScheduleConfig;
use serde::{Deserialize, Serialize};
use time::Date;

const STATUS_COMPLETED: &str = "completed";
const STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: String,
    pub user_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub status: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: String,
    pub project_id: Option<String>,
    pub parent_task_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_start: Option<String>,
    pub scheduled_end: Option<String>,
    pub status: String,
}

pub fn to_rows(project: &Project, user_id: Option<&str>) -> (ProjectRow, Vec<TaskRow>) {
    let project_row = ProjectRow {
        id: project.id.clone(),
        user_id: user_id.map(str::to_string),
        title: project.title.clone(),
        description: Some(project.description.clone()).filter(|text| !text.is_empty()),
        deadline: Some(format_date(project.deadline)),
        status: project.status.as_str().to_string(),
        created_at: Some(project.created_at.clone()),
    };

    let mut task_rows = Vec::with_capacity(project.milestones.len() + project.task_count());
    for milestone in &project.milestones {
        let milestone_done = !milestone.tasks.is_empty() && milestone.progress == 100;
        task_rows.push(TaskRow {
            id: milestone.id.clone(),
            project_id: Some(project.id.clone()),
            parent_task_id: None,
            title: milestone.title.clone(),
            description: None,
            scheduled_start: Some(format_date(milestone.start_date)),
            scheduled_end: Some(format_date(milestone.end_date)),
            status: status_label(milestone_done).to_string(),
        });

        for task in &milestone.tasks {
            task_rows.push(TaskRow {
                id: task.id.clone(),
                project_id: Some(project.id.clone()),
                parent_task_id: Some(milestone.id.clone()),
                title: task.title.clone(),
                description: None,
                scheduled_start: Some(format_date(task.start_date)),
                scheduled_end: Some(format_date(task.end_date)),
                status: status_label(task.completed).to_string(),
            });
        }
    }

    (project_row, task_rows)
}

/// Rebuild a project from its rows.
///
/// Row order is kept. Colors come from `config` by milestone position and
/// progress is recomputed, so neither needs to be stored. Rows that belong
/// to another project are skipped.
pub fn from_rows(
    project_row: &ProjectRow,
    task_rows: &[TaskRow],
    config: &ScheduleConfig,
) -> Result<Project, AppError> {
    let deadline = required_date(project_row.deadline.as_deref(), "deadline", &project_row.id)?;
    let status = project_row
        .status
        .parse::<ProjectStatus>()
        .map_err(|err| AppError::invalid_data(format!("project {}: {}", project_row.id, err.message())))?;

    let own_rows: Vec<&TaskRow> = task_rows
        .iter()
        .filter(|row| match row.project_id.as_deref() {
            Some(project_id) if project_id != project_row.id => {
                tracing::warn!(row = %row.id, project = %project_id, "skipping row of another project");
                false
            }
            _ => true,
        })
        .collect();

    let mut milestones = Vec::new();
    for row in own_rows.iter().filter(|row| row.parent_task_id.is_none()) {
        let index = milestones.len();
        milestones.push(Milestone {
            id: row.id.clone(),
            title: row.title.clone(),
            start_date: required_date(row.scheduled_start.as_deref(), "scheduled_start", &row.id)?,
            end_date: required_date(row.scheduled_end.as_deref(), "scheduled_end", &row.id)?,
            color: config.color_for(index),
            progress: 0,
            tasks: Vec::new(),
        });
    }

    for row in own_rows.iter().filter(|row| row.parent_task_id.is_some()) {
        let parent_id = row.parent_task_id.as_deref().unwrap_or_default();
        let milestone = milestones
            .iter_mut()
            .find(|milestone| milestone.id == parent_id)
            .ok_or_else(|| {
                AppError::invalid_data(format!("task {} has unknown parent {}", row.id, parent_id))
            })?;

        let mut task = Task::new(
            row.id.clone(),
            row.title.clone(),
            required_date(row.scheduled_start.as_deref(), "scheduled_start", &row.id)?,
            required_date(row.scheduled_end.as_deref(), "scheduled_end", &row.id)?,
        );
        task.completed = row.status == STATUS_COMPLETED;
        milestone.tasks.push(task);
    }

    for milestone in &mut milestones {
        milestone.refresh_progress();
    }

    let created_at = project_row.created_at.clone().unwrap_or_default();
    let start_date = milestones
        .iter()
        .map(|milestone| milestone.start_date)
        .min()
        .or_else(|| parse_date(&created_at).ok())
        .unwrap_or(deadline);

    Ok(Project {
        id: project_row.id.clone(),
        title: project_row.title.clone(),
        description: project_row.description.clone().unwrap_or_default(),
        deadline,
        start_date,
        category: None,
        status,
        milestones,
        created_at,
    })
}

fn status_label(completed: bool) -> &'static str {
    if completed { STATUS_COMPLETED } else { STATUS_PENDING }
}

fn required_date(raw: Option<&str>, field: &str, row_id: &str) -> Result<Date, AppError> {
    let raw = raw.ok_or_else(|| AppError::invalid_data(format!("{row_id}: {field} is missing")))?;
    parse_date(raw).map_err(|err| AppError::invalid_data(format!("{row_id}: {field}: {}", err.message())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{partition, toggle_task_completion};
    use pretty_assertions::assert_eq;
    use time::macros::date;

    fn project() -> Project {
        let titles: Vec<String> = ["Research", "Outline", "Draft", "Revise", "Submit"]
            .iter()
            .map(|title| title.to_string())
            .collect();
        let milestones = partition(
            &titles,
            date!(2026 - 01 - 11),
            date!(2026 - 01 - 01),
            &ScheduleConfig::default(),
        );
        let milestones = toggle_task_completion(&milestones, "milestone-1", "task-0-1");

        Project {
            id: "project-1".to_string(),
            title: "Thesis".to_string(),
            description: String::new(),
            deadline: date!(2026 - 01 - 11),
            start_date: date!(2026 - 01 - 01),
            category: None,
            status: ProjectStatus::InProgress,
            milestones,
            created_at: "2025-12-20T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn milestones_become_parentless_rows() {
        let (project_row, rows) = to_rows(&project(), Some("user-7"));

        assert_eq!(project_row.user_id.as_deref(), Some("user-7"));
        assert_eq!(project_row.deadline.as_deref(), Some("2026-01-11"));
        assert_eq!(project_row.description, None);
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].parent_task_id, None);
        assert_eq!(rows[1].parent_task_id.as_deref(), Some("milestone-1"));
        assert_eq!(rows[2].status, "completed");
        assert_eq!(rows[0].status, "pending");
    }

    #[test]
    fn rows_rebuild_the_same_project() {
        let original = project();
        let (project_row, rows) = to_rows(&original, None);

        let rebuilt = from_rows(&project_row, &rows, &ScheduleConfig::default()).unwrap();

        assert_eq!(rebuilt, original);
    }

    #[test]
    fn colors_follow_the_configured_palette() {
        let (project_row, rows) = to_rows(&project(), None);
        let config = ScheduleConfig {
            palette: vec!["red".to_string(), "teal".to_string()],
            ..ScheduleConfig::default()
        };

        let rebuilt = from_rows(&project_row, &rows, &config).unwrap();
        let colors: Vec<_> = rebuilt.milestones.iter().map(|m| m.color.as_str()).collect();

        assert_eq!(colors, vec!["red", "teal", "red"]);
    }

    #[test]
    fn rows_of_other_projects_are_skipped() {
        let (project_row, mut rows) = to_rows(&project(), None);
        rows.push(TaskRow {
            id: "stray".to_string(),
            project_id: Some("project-9".to_string()),
            parent_task_id: None,
            title: "stray".to_string(),
            description: None,
            scheduled_start: None,
            scheduled_end: None,
            status: "pending".to_string(),
        });

        let rebuilt = from_rows(&project_row, &rows, &ScheduleConfig::default()).unwrap();
        assert_eq!(rebuilt.milestones.len(), 3);
    }

    #[test]
    fn unknown_parent_is_invalid_data() {
        let (project_row, mut rows) = to_rows(&project(), None);
        rows[1].parent_task_id = Some("milestone-404".to_string());

        let err = from_rows(&project_row, &rows, &ScheduleConfig::default()).unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn missing_or_bad_dates_are_invalid_data() {
        let (project_row, mut rows) = to_rows(&project(), None);
        rows[3].scheduled_end = None;
        let err = from_rows(&project_row, &rows, &ScheduleConfig::default()).unwrap_err();
        assert_eq!(err.code(), "invalid_data");
        assert!(err.message().contains("scheduled_end is missing"));

        let (mut project_row, rows) = to_rows(&project(), None);
        project_row.deadline = Some("soon".to_string());
        let err = from_rows(&project_row, &rows, &ScheduleConfig::default()).unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn project_without_tasks_starts_at_creation() {
        let row = ProjectRow {
            id: "project-2".to_string(),
            user_id: None,
            title: "Empty".to_string(),
            description: Some("nothing yet".to_string()),
            deadline: Some("2026-05-01".to_string()),
            status: "not-started".to_string(),
            created_at: Some("2026-02-01".to_string()),
        };

        let rebuilt = from_rows(&row, &[], &ScheduleConfig::default()).unwrap();

        assert_eq!(rebuilt.start_date, date!(2026 - 02 - 01));
        assert_eq!(rebuilt.description, "nothing yet");
        assert!(rebuilt.milestones.is_empty());
    }
}
