use crate::dates::{add_days, days_between};
use crate::model::{Milestone, Task};
use time::Date;

pub const MAX_MILESTONES: usize = 3;
pub const TASKS_PER_MILESTONE: usize = 2;
pub const DEFAULT_MILESTONE_LABEL: &str = "Milestone";
pub const DEFAULT_PALETTE: [&str; 6] = ["blue", "green", "yellow", "purple", "pink", "indigo"];

/// Knobs for [`partition`]. Defaults match the stock planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub max_milestones: usize,
    pub tasks_per_milestone: usize,
    pub milestone_label: String,
    pub palette: Vec<String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            max_milestones: MAX_MILESTONES,
            tasks_per_milestone: TASKS_PER_MILESTONE,
            milestone_label: DEFAULT_MILESTONE_LABEL.to_string(),
            palette: DEFAULT_PALETTE.iter().map(|color| color.to_string()).collect(),
        }
    }
}

impl ScheduleConfig {
    /// Palette entry for the milestone at `index`, wrapping around.
    pub fn color_for(&self, index: usize) -> String {
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()].to_string();
        }
        self.palette[index % self.palette.len()].clone()
    }

    pub fn milestone_title(&self, index: usize) -> String {
        format!("{} {}", self.milestone_label, index + 1)
    }
}

/// Split an ordered list of task titles into milestones spread across
/// `[reference_start, deadline]`.
///
/// At most `max_milestones` milestones are produced, nominally
/// `tasks_per_milestone` tasks each. Titles past that capacity are folded
/// into the last milestone. A deadline on or before `reference_start` still
/// yields a result; its spans are simply collapsed.
pub fn partition(
    titles: &[String],
    deadline: Date,
    reference_start: Date,
    config: &ScheduleConfig,
) -> Vec<Milestone> {
    if titles.is_empty() {
        return Vec::new();
    }

    let per_milestone = config.tasks_per_milestone.max(1);
    let cap = config.max_milestones.max(1);
    let milestone_count = titles.len().div_ceil(per_milestone).min(cap);
    let total_days = days_between(reference_start, deadline).max(1);
    let span = total_days / milestone_count as i64;

    tracing::debug!(
        tasks = titles.len(),
        milestone_count,
        total_days,
        "partitioning tasks into milestones"
    );

    (0..milestone_count)
        .map(|index| {
            let is_last = index + 1 == milestone_count;
            let start_date = add_days(reference_start, span * index as i64);
            let end_date = if is_last {
                deadline
            } else {
                add_days(reference_start, span * (index as i64 + 1) - 1).max(start_date)
            };

            let first = index * per_milestone;
            let last = if is_last {
                titles.len()
            } else {
                (first + per_milestone).min(titles.len())
            };
            let chunk = &titles[first..last];

            Milestone {
                id: format!("milestone-{}", index + 1),
                title: config.milestone_title(index),
                start_date,
                end_date,
                color: config.color_for(index),
                progress: 0,
                tasks: spread_tasks(index, chunk, start_date, end_date, span, per_milestone),
            }
        })
        .collect()
}

/// Lay `titles` back to back inside a milestone, one equal slot each.
fn spread_tasks(
    milestone_index: usize,
    titles: &[String],
    start_date: Date,
    end_date: Date,
    span: i64,
    per_milestone: usize,
) -> Vec<Task> {
    let slot = span / titles.len().max(per_milestone) as i64;
    let limit = end_date.max(start_date);

    titles
        .iter()
        .enumerate()
        .map(|(task_index, title)| {
            let k = task_index as i64;
            let task_start = add_days(start_date, slot * k).min(limit);
            let task_end = add_days(start_date, slot * (k + 1) - 1)
                .max(task_start)
                .min(limit);

            Task::new(
                format!("task-{milestone_index}-{task_index}"),
                title.clone(),
                task_start,
                task_end,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{MAX_MILESTONES, ScheduleConfig, partition};
    use crate::dates::add_days;
    use pretty_assertions::assert_eq;
    use time::Date;
    use time::macros::date;

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn spans(milestones: &[crate::model::Milestone]) -> Vec<(Date, Date)> {
        milestones
            .iter()
            .map(|milestone| (milestone.start_date, milestone.end_date))
            .collect()
    }

    #[test]
    fn empty_titles_produce_no_milestones() {
        let result = partition(&[], date!(2026 - 02 - 01), date!(2026 - 01 - 01), &ScheduleConfig::default());
        assert!(result.is_empty());
    }

    #[test]
    fn five_tasks_over_ten_days_tile_the_window() {
        let start = date!(2026 - 01 - 01);
        let deadline = add_days(start, 10);
        let result = partition(
            &titles(&["A", "B", "C", "D", "E"]),
            deadline,
            start,
            &ScheduleConfig::default(),
        );

        assert_eq!(result.len(), 3);
        assert_eq!(
            result.iter().map(|m| m.tasks.len()).collect::<Vec<_>>(),
            vec![2, 2, 1]
        );
        assert_eq!(
            spans(&result),
            vec![
                (start, add_days(start, 2)),
                (add_days(start, 3), add_days(start, 5)),
                (add_days(start, 6), deadline),
            ]
        );
        for pair in result.windows(2) {
            assert_eq!(add_days(pair[0].end_date, 1), pair[1].start_date);
        }
    }

    #[test]
    fn tasks_split_their_milestone_in_order() {
        let start = date!(2026 - 01 - 01);
        let result = partition(
            &titles(&["A", "B", "C", "D", "E", "F"]),
            add_days(start, 60),
            start,
            &ScheduleConfig::default(),
        );

        let first = &result[0];
        assert_eq!(first.tasks[0].id, "task-0-0");
        assert_eq!(first.tasks[0].title, "A");
        assert_eq!((first.tasks[0].start_date, first.tasks[0].end_date), (start, add_days(start, 9)));
        assert_eq!(
            (first.tasks[1].start_date, first.tasks[1].end_date),
            (add_days(start, 10), add_days(start, 19))
        );
        assert_eq!(result[2].tasks[1].title, "F");
        assert!(result.iter().all(|milestone| milestone.progress == 0));
        assert!(result.iter().flat_map(|m| &m.tasks).all(|task| !task.completed));
    }

    #[test]
    fn milestone_count_never_exceeds_cap() {
        let start = date!(2026 - 01 - 01);
        for count in 1usize..=20 {
            let names: Vec<String> = (0..count).map(|i| format!("task {i}")).collect();
            let result = partition(&names, add_days(start, 90), start, &ScheduleConfig::default());
            assert!(result.len() <= MAX_MILESTONES);
            assert_eq!(result.len(), count.div_ceil(2).min(3));
        }
    }

    #[test]
    fn overflow_titles_fold_into_last_milestone() {
        let start = date!(2026 - 01 - 01);
        let names = titles(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        let result = partition(&names, add_days(start, 30), start, &ScheduleConfig::default());

        assert_eq!(result.len(), 3);
        let last = &result[2];
        assert_eq!(
            last.tasks.iter().map(|task| task.title.as_str()).collect::<Vec<_>>(),
            vec!["E", "F", "G", "H"]
        );
        let scheduled: usize = result.iter().map(|m| m.tasks.len()).sum();
        assert_eq!(scheduled, names.len());
        for task in &last.tasks {
            assert!(task.start_date >= last.start_date && task.end_date <= last.end_date);
        }
    }

    #[test]
    fn spans_stay_inside_window_and_sorted() {
        let start = date!(2026 - 03 - 10);
        for horizon in 0..40 {
            for count in 1..9 {
                let names: Vec<String> = (0..count).map(|i| format!("t{i}")).collect();
                let deadline = add_days(start, horizon);
                let result = partition(&names, deadline, start, &ScheduleConfig::default());

                for milestone in &result {
                    assert!(milestone.start_date >= start, "horizon {horizon} count {count}");
                    assert!(milestone.end_date <= deadline, "horizon {horizon} count {count}");
                    assert!(milestone.start_date <= milestone.end_date);
                    for task in &milestone.tasks {
                        assert!(task.start_date >= start && task.end_date <= deadline);
                        assert!(task.start_date <= task.end_date);
                    }
                }
                for pair in result.windows(2) {
                    assert!(pair[0].start_date <= pair[1].start_date);
                }
            }
        }
    }

    #[test]
    fn past_deadline_is_degenerate_but_defined() {
        let start = date!(2026 - 05 - 01);
        let deadline = date!(2026 - 04 - 20);
        let result = partition(&titles(&["A", "B", "C"]), deadline, start, &ScheduleConfig::default());

        assert_eq!(result.len(), 2);
        assert_eq!(result[1].end_date, deadline);
        assert_eq!(result.iter().map(|m| m.tasks.len()).sum::<usize>(), 3);
    }

    #[test]
    fn colors_and_titles_come_from_config() {
        let config = ScheduleConfig {
            max_milestones: 4,
            tasks_per_milestone: 1,
            milestone_label: "Intermediate Goal".to_string(),
            palette: vec!["red".to_string(), "teal".to_string()],
        };
        let start = date!(2026 - 01 - 01);
        let result = partition(&titles(&["A", "B", "C", "D"]), add_days(start, 40), start, &config);

        assert_eq!(
            result.iter().map(|m| m.color.as_str()).collect::<Vec<_>>(),
            vec!["red", "teal", "red", "teal"]
        );
        assert_eq!(result[3].title, "Intermediate Goal 4");
        assert_eq!(result[3].id, "milestone-4");
    }
}
