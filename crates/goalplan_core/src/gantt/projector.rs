use crate::dates::{Interval, add_days, days_between, end_of_month, start_of_month};
use crate::model::Milestone;
use serde::Serialize;

/// Pixels per day on the fixed-width chart.
pub const DAY_WIDTH: f64 = 40.0;
/// Days of empty timeline shown before the first bar and after the last.
pub const PAD_DAYS: i64 = 30;
/// Visual gap trimmed off every fixed-width bar.
pub const BAR_GAP: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GanttConfig {
    pub day_width: f64,
    pub pad_days: i64,
}

impl Default for GanttConfig {
    fn default() -> Self {
        Self {
            day_width: DAY_WIDTH,
            pad_days: PAD_DAYS,
        }
    }
}

/// Coordinate system for [`project`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unit {
    /// Absolute units, `width` per day, measured from the window start.
    DayWidth(f64),
    /// Percent of the window widened to whole months.
    Percentage,
}

/// Bar placement along the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub offset: f64,
    pub length: f64,
}

/// Map `interval` onto the chart spanned by `window`.
///
/// Fixed-width bars are never narrower than one day, even for an inverted
/// interval.
pub fn project(interval: Interval, window: Interval, unit: Unit) -> Projection {
    match unit {
        Unit::DayWidth(width) => {
            let offset = days_between(window.start, interval.start) as f64 * width;
            let length = (interval.len_days() as f64 * width - BAR_GAP).max(width);
            Projection { offset, length }
        }
        Unit::Percentage => {
            let range_start = start_of_month(window.start);
            let range = Interval::new(range_start, end_of_month(window.end));
            let total = range.len_days().max(1) as f64;
            let start_index = days_between(range_start, interval.start) as f64;
            let end_index = days_between(range_start, interval.end) as f64;

            Projection {
                offset: start_index / total * 100.0,
                length: (end_index - start_index + 1.0) / total * 100.0,
            }
        }
    }
}

/// Padded date range the chart shows: every milestone and task plus `bounds`
/// (usually the project start and deadline), widened by `pad_days` each side.
pub fn visible_window(milestones: &[Milestone], bounds: Interval, pad_days: i64) -> Interval {
    let starts = milestones
        .iter()
        .flat_map(|milestone| {
            std::iter::once(milestone.start_date)
                .chain(milestone.tasks.iter().map(|task| task.start_date))
        });
    let ends = milestones
        .iter()
        .flat_map(|milestone| {
            std::iter::once(milestone.end_date).chain(milestone.tasks.iter().map(|task| task.end_date))
        });

    let earliest = starts.fold(bounds.start, |earliest, date| earliest.min(date));
    let latest = ends.fold(bounds.end, |latest, date| latest.max(date));

    Interval::new(add_days(earliest, -pad_days), add_days(latest, pad_days))
}

/// Total chart width for a fixed-width layout.
pub fn chart_width(window: Interval, day_width: f64) -> f64 {
    window.len_days().max(0) as f64 * day_width
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Milestone,
    Task,
}

/// One chart row, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttRow {
    pub kind: RowKind,
    pub id: String,
    pub title: String,
    pub color: String,
    pub interval: Interval,
    pub completed: bool,
    pub projection: Projection,
}

/// Each milestone row followed by its task rows, in display order.
pub fn layout_rows(milestones: &[Milestone], window: Interval, unit: Unit) -> Vec<GanttRow> {
    let mut rows = Vec::new();

    for milestone in milestones {
        let interval = Interval::new(milestone.start_date, milestone.end_date);
        rows.push(GanttRow {
            kind: RowKind::Milestone,
            id: milestone.id.clone(),
            title: milestone.title.clone(),
            color: milestone.color.clone(),
            interval,
            completed: !milestone.tasks.is_empty() && milestone.progress == 100,
            projection: project(interval, window, unit),
        });

        for task in &milestone.tasks {
            let interval = Interval::new(task.start_date, task.end_date);
            rows.push(GanttRow {
                kind: RowKind::Task,
                id: task.id.clone(),
                title: task.title.clone(),
                color: milestone.color.clone(),
                interval,
                completed: task.completed,
                projection: project(interval, window, unit),
            });
        }
    }

    rows
}
