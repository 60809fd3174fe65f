//! Text and JSON views of projects for the command line.

use goalplan_core::advisory::AdvisoryKind;
use goalplan_core::config::Palette;
use goalplan_core::dates::{Interval, end_of_month, format_date, is_weekend, start_of_month};
use goalplan_core::error::AppError;
use goalplan_core::gantt::{
    GanttConfig, RowKind, Unit, chart_width, day_headers, group_by_month, group_by_year,
    layout_rows, visible_window,
};
use goalplan_core::model::{Project, SuggestedTask};
use goalplan_core::project_api::Advice;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const LABEL_WIDTH: usize = 28;
const MIN_CHART_COLUMNS: usize = 10;
const MAX_CHART_COLUMNS: usize = 1000;

#[derive(Tabled)]
struct ProjectLine {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

#[derive(Tabled)]
struct ScheduleLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Done")]
    done: &'static str,
}

#[derive(Tabled)]
struct SuggestionLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Suggested task")]
    title: String,
}

pub fn project_json(project: &Project) -> Result<serde_json::Value, AppError> {
    let mut value =
        serde_json::to_value(project).map_err(|err| AppError::invalid_data(err.to_string()))?;
    if let Some(object) = value.as_object_mut() {
        object.insert("progress".to_string(), json!(project.progress()));
    }
    Ok(value)
}

pub fn project_list_json(projects: &[Project], active_project_id: Option<&str>) -> serde_json::Value {
    let entries: Vec<_> = projects
        .iter()
        .map(|project| {
            json!({
                "id": project.id,
                "title": project.title,
                "deadline": format_date(project.deadline),
                "status": project.status,
                "progress": project.progress(),
                "active": active_project_id == Some(project.id.as_str()),
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}

pub fn project_table(projects: &[Project], active_project_id: Option<&str>) -> String {
    if projects.is_empty() {
        return "No projects yet. Create one with `goalplan new`.".to_string();
    }

    let lines = projects.iter().map(|project| ProjectLine {
        marker: if active_project_id == Some(project.id.as_str()) { "*" } else { "" },
        id: project.id.clone(),
        title: project.title.clone(),
        deadline: format_date(project.deadline),
        status: project.status.to_string(),
        progress: format!("{}%", project.progress()),
    });
    Table::new(lines).with(Style::modern()).to_string()
}

pub fn project_detail(project: &Project, palette: &Palette) -> String {
    let mut out = String::new();
    out.push_str(&palette.accentize(&format!(
        "{} ({}) [{}] {}%",
        project.title,
        project.id,
        project.status,
        project.progress()
    )));
    out.push('\n');

    let mut facts = format!(
        "Start {}, deadline {}",
        format_date(project.start_date),
        format_date(project.deadline)
    );
    if let Some(category) = project.category.as_deref() {
        facts.push_str(&format!(", category {category}"));
    }
    out.push_str(&palette.mutedize(&facts));
    out.push('\n');

    if !project.description.is_empty() {
        out.push_str(&project.description);
        out.push('\n');
    }

    if project.milestones.is_empty() {
        out.push_str("No milestones scheduled.");
        return out;
    }

    let mut lines = Vec::new();
    for milestone in &project.milestones {
        lines.push(ScheduleLine {
            id: milestone.id.clone(),
            title: format!("{} ({}%)", milestone.title, milestone.progress),
            start: format_date(milestone.start_date),
            end: format_date(milestone.end_date),
            done: "",
        });
        for task in &milestone.tasks {
            lines.push(ScheduleLine {
                id: task.id.clone(),
                title: format!("  {}", task.title),
                start: format_date(task.start_date),
                end: format_date(task.end_date),
                done: if task.completed { "[x]" } else { "[ ]" },
            });
        }
    }
    out.push_str(&Table::new(lines).with(Style::modern()).to_string());
    out
}

pub fn suggestion_table(suggestions: &[SuggestedTask]) -> String {
    let lines = suggestions.iter().map(|task| SuggestionLine {
        id: task.id.clone(),
        title: task.title.clone(),
    });
    Table::new(lines).with(Style::modern()).to_string()
}

/// Fixed day-width geometry for a graphical front end.
pub fn gantt_json(project: &Project, config: &GanttConfig) -> serde_json::Value {
    let window = chart_window(project, config);
    let days = day_headers(window);
    let weekends: Vec<String> = days
        .iter()
        .copied()
        .filter(|day| is_weekend(*day))
        .map(format_date)
        .collect();

    json!({
        "project_id": project.id,
        "window": window,
        "day_width": config.day_width,
        "chart_width": chart_width(window, config.day_width),
        "months": group_by_month(&days),
        "years": group_by_year(&days),
        "weekends": weekends,
        "rows": layout_rows(&project.milestones, window, Unit::DayWidth(config.day_width)),
    })
}

/// Percentage-projected chart scaled to `columns` characters.
///
/// Milestones draw as `=`, open tasks as `-` and completed tasks as `#`.
/// `columns` is clamped to 10..=1000.
pub fn text_gantt(project: &Project, config: &GanttConfig, columns: usize, palette: &Palette) -> String {
    if project.milestones.is_empty() {
        return "No milestones scheduled.".to_string();
    }

    let columns = columns.clamp(MIN_CHART_COLUMNS, MAX_CHART_COLUMNS);
    let window = chart_window(project, config);
    let mut out = String::new();

    out.push_str(&" ".repeat(LABEL_WIDTH + 1));
    out.push_str(&palette.mutedize(&month_ruler(window, columns)));
    out.push('\n');

    for row in layout_rows(&project.milestones, window, Unit::Percentage) {
        let label = match row.kind {
            RowKind::Milestone => row.title.clone(),
            RowKind::Task => format!("  {}", row.title),
        };
        let fill = match row.kind {
            RowKind::Milestone => '=',
            RowKind::Task if row.completed => '#',
            RowKind::Task => '-',
        };

        let start = scale(row.projection.offset, columns).min(columns - 1);
        let width = scale(row.projection.length, columns).max(1).min(columns - start);
        let mut bar = " ".repeat(start);
        bar.extend(std::iter::repeat_n(fill, width));
        bar.push_str(&" ".repeat(columns - start - width));

        let bar = if row.kind == RowKind::Milestone { palette.accentize(&bar) } else { bar };
        out.push_str(&format!(
            "{} {} {}..{}\n",
            fit_label(&label),
            bar,
            format_date(row.interval.start),
            format_date(row.interval.end)
        ));
    }

    out.truncate(out.trim_end().len());
    out
}

pub fn advice_text(advice: &Advice) -> String {
    let mut out = format!(
        "Status: {} (schedule suggests {}), progress {}%",
        advice.stored_status, advice.derived_status, advice.progress
    );

    if advice.advisories.is_empty() {
        out.push_str("\nNothing needs attention.");
    }
    for note in &advice.advisories {
        let tag = match note.kind {
            AdvisoryKind::Warning => "WARNING",
            AdvisoryKind::Info => "INFO",
        };
        out.push_str(&format!("\n{tag}: {}\n  {}", note.title, note.detail));
    }
    out
}

fn chart_window(project: &Project, config: &GanttConfig) -> Interval {
    visible_window(
        &project.milestones,
        Interval::new(project.start_date, project.deadline),
        config.pad_days,
    )
}

/// Month initials laid out over the whole-month range the percentage
/// projection uses.
fn month_ruler(window: Interval, columns: usize) -> String {
    let days = day_headers(Interval::new(start_of_month(window.start), end_of_month(window.end)));
    let total = days.len().max(1);
    let mut ruler = vec![' '; columns];
    let mut next_free = 0;
    let mut elapsed = 0;

    for band in group_by_month(&days) {
        let column = elapsed * columns / total;
        elapsed += band.span_days;
        if column < next_free {
            continue;
        }
        for (offset, ch) in band.label.chars().enumerate() {
            if let Some(cell) = ruler.get_mut(column + offset) {
                *cell = ch;
            }
        }
        next_free = column + band.label.chars().count() + 1;
    }

    ruler.into_iter().collect()
}

fn scale(percent: f64, columns: usize) -> usize {
    (percent.max(0.0) / 100.0 * columns as f64).round() as usize
}

fn fit_label(label: &str) -> String {
    let count = label.chars().count();
    if count <= LABEL_WIDTH {
        format!("{label:<width$}", width = LABEL_WIDTH)
    } else {
        let mut cut: String = label.chars().take(LABEL_WIDTH - 3).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalplan_core::config::palette_for_theme;
    use goalplan_core::model::ProjectStatus;
    use goalplan_core::schedule::{ScheduleConfig, partition, toggle_task_completion};
    use time::macros::date;

    fn project() -> Project {
        let titles: Vec<String> = ["Research", "Outline", "Draft"].iter().map(|t| t.to_string()).collect();
        let milestones = partition(&titles, date!(2026 - 03 - 31), date!(2026 - 01 - 01), &ScheduleConfig::default());
        Project {
            id: "project-1".to_string(),
            title: "Thesis".to_string(),
            description: String::new(),
            deadline: date!(2026 - 03 - 31),
            start_date: date!(2026 - 01 - 01),
            category: Some("learning".to_string()),
            status: ProjectStatus::InProgress,
            milestones: toggle_task_completion(&milestones, "milestone-1", "task-0-0"),
            created_at: "2025-12-20T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn text_gantt_has_header_and_one_line_per_row() {
        let chart = text_gantt(&project(), &GanttConfig::default(), 40, &palette_for_theme(None));
        let lines: Vec<_> = chart.lines().collect();

        assert_eq!(lines.len(), 1 + 2 + 3);
        assert!(lines[0].contains("Dec"));
        assert!(lines[1].starts_with("Milestone 1"));
        assert!(lines[2].contains('#'));
        assert!(lines[3].contains('-'));
        assert!(lines[4].ends_with("2026-03-31"));
        assert!(lines[5].ends_with("2026-03-07"));
    }

    #[test]
    fn text_gantt_clamps_huge_widths() {
        let chart = text_gantt(&project(), &GanttConfig::default(), usize::MAX, &palette_for_theme(None));
        let ruler = chart.lines().next().unwrap();

        assert_eq!(ruler.chars().count(), LABEL_WIDTH + 1 + MAX_CHART_COLUMNS);
        assert_eq!(chart.lines().count(), 6);
    }

    #[test]
    fn text_gantt_without_milestones() {
        let mut empty = project();
        empty.milestones.clear();
        assert_eq!(
            text_gantt(&empty, &GanttConfig::default(), 40, &palette_for_theme(None)),
            "No milestones scheduled."
        );
    }

    #[test]
    fn gantt_json_uses_fixed_width_rows() {
        let config = GanttConfig { day_width: 10.0, pad_days: 0 };
        let value = gantt_json(&project(), &config);

        assert_eq!(value["window"]["start"], "2026-01-01");
        assert_eq!(value["rows"].as_array().map(Vec::len), Some(5));
        assert_eq!(value["rows"][0]["projection"]["offset"], 0.0);
        assert_eq!(value["chart_width"], 900.0);
        assert_eq!(value["months"][0]["label"], "Jan");
    }

    #[test]
    fn project_json_includes_progress() {
        let value = project_json(&project()).unwrap();
        assert_eq!(value["progress"], 25);
        assert_eq!(value["status"], "in-progress");
    }

    #[test]
    fn project_table_marks_active_project() {
        let table = project_table(&[project()], Some("project-1"));
        assert!(table.contains('*'));
        assert!(table.contains("Thesis"));
        assert!(project_table(&[], None).starts_with("No projects"));
    }

    #[test]
    fn long_labels_are_cut() {
        let label = fit_label(&"x".repeat(40));
        assert_eq!(label.chars().count(), LABEL_WIDTH);
        assert!(label.ends_with("..."));
    }
}
