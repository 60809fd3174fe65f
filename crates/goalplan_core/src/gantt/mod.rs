//! Gantt chart geometry: where bars go and how the date header is banded.

mod header;
mod projector;

pub use header::{HeaderBand, day_headers, group_by_month, group_by_year};
pub use projector::{
    BAR_GAP, DAY_WIDTH, GanttConfig, GanttRow, PAD_DAYS, Projection, RowKind, Unit, chart_width,
    layout_rows, project, visible_window,
};
