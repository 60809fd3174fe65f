use crate::advisory::{self, Advisory};
use crate::dates::{self, format_date};
use crate::error::AppError;
use crate::model::{DateEdge, Project, ProjectStatus, Task};
use crate::schedule::{self, ScheduleConfig};
use crate::storage::json_store::{self, ProjectState};
use crate::suggest::Category;
use serde::Serialize;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub deadline: Date,
    /// Defaults to today.
    pub start_date: Option<Date>,
    pub category: Option<Category>,
    pub task_titles: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub projects: Vec<Project>,
    pub active_project_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    /// Defaults to the last milestone.
    pub milestone_id: Option<String>,
    pub title: String,
    /// Both default to the milestone's own span.
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Advice {
    pub project_id: String,
    pub stored_status: ProjectStatus,
    pub derived_status: ProjectStatus,
    pub progress: u8,
    pub advisories: Vec<Advisory>,
}

pub fn create_project(input: NewProject, config: &ScheduleConfig) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    create_project_with_path(&path, input, config)
}

pub fn list_projects() -> Result<ListResult, AppError> {
    let path = json_store::store_path()?;
    list_projects_with_path(&path)
}

pub fn get_project(project_id: Option<&str>) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    get_project_with_path(&path, project_id)
}

pub fn delete_project(project_id: &str) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    delete_project_with_path(&path, project_id)
}

pub fn set_active_project(project_id: &str) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    set_active_project_with_path(&path, project_id)
}

/// Move a task's start and/or end in one edit; its milestone is refitted.
pub fn set_task_dates(
    project_id: Option<&str>,
    task_id: &str,
    start: Option<Date>,
    end: Option<Date>,
) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    set_task_dates_with_path(&path, project_id, task_id, start, end)
}

pub fn set_milestone_dates(
    project_id: Option<&str>,
    milestone_id: &str,
    start: Option<Date>,
    end: Option<Date>,
) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    set_milestone_dates_with_path(&path, project_id, milestone_id, start, end)
}

pub fn toggle_task(project_id: Option<&str>, task_id: &str) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    toggle_task_with_path(&path, project_id, task_id)
}

pub fn add_task(project_id: Option<&str>, input: NewTask) -> Result<(Project, Task), AppError> {
    let path = json_store::store_path()?;
    add_task_with_path(&path, project_id, input)
}

pub fn remove_task(project_id: Option<&str>, task_id: &str) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    remove_task_with_path(&path, project_id, task_id)
}

pub fn move_task(project_id: Option<&str>, task_id: &str, new_index: usize) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    move_task_with_path(&path, project_id, task_id, new_index)
}

pub fn retitle_task(project_id: Option<&str>, task_id: &str, title: &str) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    retitle_task_with_path(&path, project_id, task_id, title)
}

/// Store `status`, or the status derived from the schedule when `None`.
pub fn set_status(project_id: Option<&str>, status: Option<ProjectStatus>) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    set_status_with_path(&path, project_id, status, dates::today())
}

pub fn replan(
    project_id: Option<&str>,
    deadline: Option<Date>,
    start_date: Option<Date>,
    config: &ScheduleConfig,
) -> Result<Project, AppError> {
    let path = json_store::store_path()?;
    replan_with_path(&path, project_id, deadline, start_date, config)
}

pub fn advise(project_id: Option<&str>, horizon_days: i64) -> Result<Advice, AppError> {
    let path = json_store::store_path()?;
    advise_with_path(&path, project_id, dates::today(), horizon_days)
}

fn create_project_with_path(
    path: &Path,
    input: NewProject,
    config: &ScheduleConfig,
) -> Result<Project, AppError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }

    let titles: Vec<String> = input
        .task_titles
        .iter()
        .map(|title| title.trim())
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect();
    let start_date = input.start_date.unwrap_or_else(dates::today);
    if input.deadline <= start_date {
        tracing::warn!(
            deadline = %format_date(input.deadline),
            start = %format_date(start_date),
            "deadline is not after the start date"
        );
    }

    let project = Project {
        id: new_id("project"),
        title: title.to_string(),
        description: input.description.trim().to_string(),
        deadline: input.deadline,
        start_date,
        category: input.category.map(|category| category.as_str().to_string()),
        status: ProjectStatus::NotStarted,
        milestones: schedule::partition(&titles, input.deadline, start_date, config),
        created_at: now_rfc3339()?,
    };

    let mut state = json_store::load_state(path)?;
    state.projects.push(project.clone());
    state.active_project_id = Some(project.id.clone());
    json_store::save_state(path, &state)?;

    tracing::debug!(project = %project.id, milestones = project.milestones.len(), "project created");
    Ok(project)
}

fn list_projects_with_path(path: &Path) -> Result<ListResult, AppError> {
    let state = json_store::load_state(path)?;
    Ok(ListResult {
        projects: state.projects,
        active_project_id: state.active_project_id,
    })
}

fn get_project_with_path(path: &Path, project_id: Option<&str>) -> Result<Project, AppError> {
    let state = json_store::load_state(path)?;
    let index = resolve_project(&state, project_id)?;
    Ok(state.projects[index].clone())
}

fn delete_project_with_path(path: &Path, project_id: &str) -> Result<Project, AppError> {
    let trimmed_id = required_id(project_id)?;
    let mut state = json_store::load_state(path)?;
    let index = state
        .position(trimmed_id)
        .ok_or_else(|| AppError::invalid_input("project not found"))?;

    let removed = state.projects.remove(index);
    if state.active_project_id.as_deref() == Some(trimmed_id) {
        state.active_project_id = None;
    }
    json_store::save_state(path, &state)?;

    Ok(removed)
}

fn set_active_project_with_path(path: &Path, project_id: &str) -> Result<Project, AppError> {
    let trimmed_id = required_id(project_id)?;
    let mut state = json_store::load_state(path)?;
    let project = state
        .find(trimmed_id)
        .cloned()
        .ok_or_else(|| AppError::invalid_input("project not found"))?;

    state.active_project_id = Some(project.id.clone());
    json_store::save_state(path, &state)?;

    Ok(project)
}

fn set_task_dates_with_path(
    path: &Path,
    project_id: Option<&str>,
    task_id: &str,
    start: Option<Date>,
    end: Option<Date>,
) -> Result<Project, AppError> {
    let task_id = required_id(task_id)?;
    let edges = date_edges(start, end)?;
    update_project(path, project_id, |project| {
        let (milestone_index, task_index) = find_task(project, task_id)?;
        let milestones = edges.iter().fold(project.milestones.clone(), |milestones, &(edge, date)| {
            schedule::set_task_date(&milestones, milestone_index, task_index, edge, date)
        });
        Ok(Project {
            milestones,
            ..project.clone()
        })
    })
}

fn set_milestone_dates_with_path(
    path: &Path,
    project_id: Option<&str>,
    milestone_id: &str,
    start: Option<Date>,
    end: Option<Date>,
) -> Result<Project, AppError> {
    let milestone_id = required_id(milestone_id)?;
    let edges = date_edges(start, end)?;
    update_project(path, project_id, |project| {
        let milestone_index = find_milestone(project, milestone_id)?;
        let milestones = edges.iter().fold(project.milestones.clone(), |milestones, &(edge, date)| {
            schedule::set_milestone_date_direct(&milestones, milestone_index, edge, date)
        });
        Ok(Project {
            milestones,
            ..project.clone()
        })
    })
}

fn toggle_task_with_path(path: &Path, project_id: Option<&str>, task_id: &str) -> Result<Project, AppError> {
    let task_id = required_id(task_id)?;
    update_project(path, project_id, |project| {
        let (milestone_index, _) = find_task(project, task_id)?;
        let milestone_id = &project.milestones[milestone_index].id;
        Ok(Project {
            milestones: schedule::toggle_task_completion(&project.milestones, milestone_id, task_id),
            ..project.clone()
        })
    })
}

fn add_task_with_path(
    path: &Path,
    project_id: Option<&str>,
    input: NewTask,
) -> Result<(Project, Task), AppError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }

    let mut added = None;
    let project = update_project(path, project_id, |project| {
        let milestone_index = match input.milestone_id.as_deref().map(str::trim) {
            Some(milestone_id) if !milestone_id.is_empty() => find_milestone(project, milestone_id)?,
            _ => project
                .milestones
                .len()
                .checked_sub(1)
                .ok_or_else(|| AppError::invalid_input("project has no milestones"))?,
        };

        let milestone = &project.milestones[milestone_index];
        let task = Task::new(
            new_id("task"),
            title,
            input.start_date.unwrap_or(milestone.start_date),
            input.end_date.unwrap_or(milestone.end_date),
        );
        added = Some(task.clone());

        Ok(Project {
            milestones: schedule::add_task(&project.milestones, milestone_index, task),
            ..project.clone()
        })
    })?;

    let task = added.ok_or_else(|| AppError::invalid_data("task was not added"))?;
    Ok((project, task))
}

fn remove_task_with_path(path: &Path, project_id: Option<&str>, task_id: &str) -> Result<Project, AppError> {
    let task_id = required_id(task_id)?;
    update_project(path, project_id, |project| {
        find_task(project, task_id)?;
        Ok(Project {
            milestones: schedule::remove_task(&project.milestones, task_id),
            ..project.clone()
        })
    })
}

fn move_task_with_path(
    path: &Path,
    project_id: Option<&str>,
    task_id: &str,
    new_index: usize,
) -> Result<Project, AppError> {
    let task_id = required_id(task_id)?;
    update_project(path, project_id, |project| {
        let (milestone_index, _) = find_task(project, task_id)?;
        if new_index >= project.milestones[milestone_index].tasks.len() {
            return Err(AppError::invalid_input("index out of range"));
        }
        Ok(Project {
            milestones: schedule::reorder_task(&project.milestones, task_id, new_index),
            ..project.clone()
        })
    })
}

fn retitle_task_with_path(
    path: &Path,
    project_id: Option<&str>,
    task_id: &str,
    title: &str,
) -> Result<Project, AppError> {
    let task_id = required_id(task_id)?;
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }

    update_project(path, project_id, |project| {
        find_task(project, task_id)?;
        Ok(Project {
            milestones: schedule::retitle_task(&project.milestones, task_id, title),
            ..project.clone()
        })
    })
}

fn set_status_with_path(
    path: &Path,
    project_id: Option<&str>,
    status: Option<ProjectStatus>,
    today: Date,
) -> Result<Project, AppError> {
    update_project(path, project_id, |project| {
        Ok(Project {
            status: status.unwrap_or_else(|| advisory::derive_status(project, today)),
            ..project.clone()
        })
    })
}

/// Re-partition the project's current task titles over its (possibly new)
/// date range. Completion carries over to the first unclaimed task with the
/// same title; task ids are regenerated.
fn replan_with_path(
    path: &Path,
    project_id: Option<&str>,
    deadline: Option<Date>,
    start_date: Option<Date>,
    config: &ScheduleConfig,
) -> Result<Project, AppError> {
    update_project(path, project_id, |project| {
        let deadline = deadline.unwrap_or(project.deadline);
        let start_date = start_date.unwrap_or(project.start_date);
        let mut completed_titles: Vec<&str> = project
            .tasks()
            .filter(|task| task.completed)
            .map(|task| task.title.as_str())
            .collect();

        let mut milestones = schedule::partition(&project.task_titles(), deadline, start_date, config);
        for milestone in &mut milestones {
            for task in &mut milestone.tasks {
                if let Some(position) = completed_titles.iter().position(|title| *title == task.title) {
                    completed_titles.swap_remove(position);
                    task.completed = true;
                }
            }
            milestone.refresh_progress();
        }

        Ok(Project {
            deadline,
            start_date,
            milestones,
            ..project.clone()
        })
    })
}

fn advise_with_path(
    path: &Path,
    project_id: Option<&str>,
    today: Date,
    horizon_days: i64,
) -> Result<Advice, AppError> {
    let project = get_project_with_path(path, project_id)?;
    Ok(Advice {
        project_id: project.id.clone(),
        stored_status: project.status,
        derived_status: advisory::derive_status(&project, today),
        progress: project.progress(),
        advisories: advisory::advisories(&project, today, horizon_days),
    })
}

/// Load the store, replace one project with `apply`'s result and save.
fn update_project(
    path: &Path,
    project_id: Option<&str>,
    apply: impl FnOnce(&Project) -> Result<Project, AppError>,
) -> Result<Project, AppError> {
    let mut state = json_store::load_state(path)?;
    let index = resolve_project(&state, project_id)?;
    let updated = apply(&state.projects[index])?;

    state.projects[index] = updated.clone();
    json_store::save_state(path, &state)?;

    tracing::debug!(project = %updated.id, "project updated");
    Ok(updated)
}

fn resolve_project(state: &ProjectState, project_id: Option<&str>) -> Result<usize, AppError> {
    let requested = project_id.map(str::trim).filter(|id| !id.is_empty());
    let id = match requested {
        Some(id) => id,
        None => state
            .active_project_id
            .as_deref()
            .ok_or_else(|| AppError::invalid_input("no active project"))?,
    };

    state
        .position(id)
        .ok_or_else(|| AppError::invalid_input("project not found"))
}

fn find_task(project: &Project, task_id: &str) -> Result<(usize, usize), AppError> {
    schedule::locate_task(&project.milestones, task_id)
        .ok_or_else(|| AppError::invalid_input("task not found"))
}

fn find_milestone(project: &Project, milestone_id: &str) -> Result<usize, AppError> {
    schedule::locate_milestone(&project.milestones, milestone_id)
        .ok_or_else(|| AppError::invalid_input("milestone not found"))
}

fn date_edges(start: Option<Date>, end: Option<Date>) -> Result<Vec<(DateEdge, Date)>, AppError> {
    let edges: Vec<_> = [(DateEdge::Start, start), (DateEdge::End, end)]
        .into_iter()
        .filter_map(|(edge, date)| date.map(|date| (edge, date)))
        .collect();
    if edges.is_empty() {
        return Err(AppError::invalid_input("a start or end date is required"));
    }
    Ok(edges)
}

fn required_id(id: &str) -> Result<&str, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    Ok(trimmed)
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", OffsetDateTime::now_utc().unix_timestamp_nanos())
}

fn now_rfc3339() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
