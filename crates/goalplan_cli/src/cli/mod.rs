use clap::{Parser, Subcommand};
use goalplan_core::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Project to operate on (defaults to the active project)
    #[arg(long, value_name = "ID", global = true)]
    pub project: Option<String>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show suggested tasks for a goal category
    ///
    /// Example: goalplan suggest --category learning
    Suggest {
        #[arg(long)]
        category: Option<String>,
    },
    /// Create a goal and schedule its tasks into milestones
    ///
    /// Example: goalplan new "Thesis" --deadline 2026-06-30 --task "Research" --task "Draft"
    /// Example: goalplan new "Run a 10k" --deadline 2026-05-01 --category health --suggested
    New {
        title: String,
        #[arg(long)]
        deadline: String,
        /// Reference start date (defaults to today)
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Task title, repeatable
        #[arg(long = "task", value_name = "TITLE")]
        tasks: Vec<String>,
        /// Also schedule every suggested task for the category
        #[arg(long)]
        suggested: bool,
    },
    /// List projects
    ///
    /// Example: goalplan list
    List,
    /// Show a project's milestones and tasks
    ///
    /// Example: goalplan show
    Show,
    /// Draw the project as a Gantt chart
    ///
    /// Example: goalplan gantt --width 80
    Gantt {
        /// Chart width in columns
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u16).range(10..=1000))]
        width: u16,
    },
    /// Make a project the active one
    ///
    /// Example: goalplan use project-1
    Use {
        id: String,
    },
    /// Toggle a task's completion
    ///
    /// Example: goalplan done task-0-1
    Done {
        task_id: String,
    },
    /// Change a task's dates; its milestone is refitted
    ///
    /// Example: goalplan date task-0-1 --end 2026-02-14
    Date {
        task_id: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Set a milestone's own dates, leaving its tasks alone
    ///
    /// Example: goalplan milestone-date milestone-2 --start 2026-02-01
    MilestoneDate {
        milestone_id: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Add a task to a milestone (the last one by default)
    ///
    /// Example: goalplan add-task "Book a venue" --milestone milestone-1
    AddTask {
        title: String,
        #[arg(long)]
        milestone: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Remove a task
    ///
    /// Example: goalplan remove-task task-1-0
    RemoveTask {
        task_id: String,
    },
    /// Move a task to another position within its milestone
    ///
    /// Example: goalplan move-task task-1-1 0
    MoveTask {
        task_id: String,
        index: usize,
    },
    /// Rename a task
    ///
    /// Example: goalplan rename-task task-0-0 "Read five papers"
    RenameTask {
        task_id: String,
        title: String,
    },
    /// Set the project status, or derive it from the schedule when omitted
    ///
    /// Example: goalplan status in-progress
    /// Example: goalplan status
    Status {
        status: Option<String>,
    },
    /// Re-spread the current tasks over the (optionally new) date range
    ///
    /// Example: goalplan replan --deadline 2026-08-31
    Replan {
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        start: Option<String>,
    },
    /// Show schedule warnings
    ///
    /// Example: goalplan advise --horizon 14
    Advise {
        /// Days ahead that count as "due soon"
        #[arg(long, default_value_t = goalplan_core::advisory::DEFAULT_HORIZON_DAYS)]
        horizon: i64,
    },
    /// Delete a project
    ///
    /// Example: goalplan delete project-1
    Delete {
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    DayWidth,
    PadDays,
    MaxMilestones,
    TasksPerMilestone,
    MilestoneLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let canonical_field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match canonical_field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "day_width" => ConfigOverrideTarget::DayWidth,
        "pad_days" => ConfigOverrideTarget::PadDays,
        "max_milestones" => ConfigOverrideTarget::MaxMilestones,
        "tasks_per_milestone" => ConfigOverrideTarget::TasksPerMilestone,
        "milestone_label" => ConfigOverrideTarget::MilestoneLabel,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Fold every `--config-override` into one set; later values win.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::DayWidth => {
                overrides.day_width = Some(parse_number(&parsed.value, "day_width")?)
            }
            ConfigOverrideTarget::PadDays => {
                overrides.pad_days = Some(parse_number(&parsed.value, "pad_days")?)
            }
            ConfigOverrideTarget::MaxMilestones => {
                overrides.max_milestones = Some(parse_number(&parsed.value, "max_milestones")?)
            }
            ConfigOverrideTarget::TasksPerMilestone => {
                overrides.tasks_per_milestone =
                    Some(parse_number(&parsed.value, "tasks_per_milestone")?)
            }
            ConfigOverrideTarget::MilestoneLabel => {
                if parsed.value.is_empty() {
                    return Err("milestone_label cannot be empty".to_string());
                }
                overrides.milestone_label = Some(parsed.value)
            }
        }
    }

    Ok(overrides)
}

fn parse_number<T: std::str::FromStr>(value: &str, field: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{field} must be a non-negative integer, got '{value}'"))
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
