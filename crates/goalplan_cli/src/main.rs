use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use goalplan_cli::cli::{Cli, Command, collect_config_overrides};
use goalplan_cli::render;
use goalplan_core::config::{self, Config, palette_for_theme};
use goalplan_core::dates::parse_date;
use goalplan_core::error::AppError;
use goalplan_core::model::{Project, ProjectStatus};
use goalplan_core::project_api::{self, NewProject, NewTask};
use goalplan_core::suggest::{self, Category};
use std::io::{self, BufRead};
use time::Date;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "GOALPLAN_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_base_config() -> Config {
    let load = config::load_config_with_fallback();
    if let Some(err) = load.error {
        tracing::warn!(error = %err, "config not loaded, using defaults");
    }
    load.config
}

fn print_json(value: &serde_json::Value) {
    println!("{}", value);
}

fn print_project(project: &Project, json: bool, summary: &str) -> Result<(), AppError> {
    if json {
        print_json(&render::project_json(project)?);
    } else {
        println!("{summary}: {} ({})", project.title, project.id);
    }
    Ok(())
}

fn parse_category(raw: Option<&str>) -> Option<Category> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<Category>() {
        Ok(category) => Some(category),
        Err(err) => {
            tracing::warn!(error = %err, "showing general suggestions");
            None
        }
    }
}

fn parse_optional_date(raw: Option<&str>) -> Result<Option<Date>, AppError> {
    raw.map(parse_date).transpose()
}

/// Accepted titles for a new project: every suggestion for the category when
/// `suggested` is set, followed by the hand-written tasks.
fn selected_titles(category: Option<Category>, suggested: bool, tasks: &[String]) -> Vec<String> {
    let mut list = if suggested {
        suggest::suggestions_for(category)
    } else {
        Vec::new()
    };
    let ids: Vec<String> = list.iter().map(|task| task.id.clone()).collect();
    for id in &ids {
        list = suggest::toggle_suggestion(&list, id);
    }
    for title in tasks {
        list = suggest::add_suggestion(&list, title);
    }
    suggest::accepted_titles(&list)
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(cli: Cli, base_config: &Config) -> Result<(), AppError> {
    let overrides =
        collect_config_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    let config = config::merge_overrides(base_config, &overrides);
    let schedule_config = config.schedule_config();
    let gantt_config = config.gantt_config();
    let palette = palette_for_theme(config.theme.as_deref());
    let project_id = cli.project.as_deref();

    match cli.command {
        Command::Suggest { category } => {
            let suggestions = suggest::suggestions_for(parse_category(category.as_deref()));
            if cli.json {
                print_json(&serde_json::json!(suggestions));
            } else {
                println!("{}", render::suggestion_table(&suggestions));
            }
        }
        Command::New {
            title,
            deadline,
            start,
            description,
            category,
            tasks,
            suggested,
        } => {
            let category = parse_category(category.as_deref());
            let task_titles = selected_titles(category, suggested, &tasks);
            if task_titles.is_empty() {
                return Err(AppError::invalid_input(
                    "at least one task is required (use --task or --suggested)",
                ));
            }

            let project = project_api::create_project(
                NewProject {
                    title,
                    description: description.unwrap_or_default(),
                    deadline: parse_date(&deadline)?,
                    start_date: parse_optional_date(start.as_deref())?,
                    category,
                    task_titles,
                },
                &schedule_config,
            )?;
            if cli.json {
                print_json(&render::project_json(&project)?);
            } else {
                println!("Created project: {} ({})", project.title, project.id);
                println!("{}", render::project_detail(&project, &palette));
            }
        }
        Command::List => {
            let result = project_api::list_projects()?;
            let active = result.active_project_id.as_deref();
            if cli.json {
                print_json(&render::project_list_json(&result.projects, active));
            } else {
                println!("{}", render::project_table(&result.projects, active));
            }
        }
        Command::Show => {
            let project = project_api::get_project(project_id)?;
            if cli.json {
                print_json(&render::project_json(&project)?);
            } else {
                println!("{}", render::project_detail(&project, &palette));
            }
        }
        Command::Gantt { width } => {
            let project = project_api::get_project(project_id)?;
            if cli.json {
                print_json(&render::gantt_json(&project, &gantt_config));
            } else {
                println!("{}", render::text_gantt(&project, &gantt_config, usize::from(width), &palette));
            }
        }
        Command::Use { id } => {
            let project = project_api::set_active_project(&id)?;
            print_project(&project, cli.json, "Active project")?;
        }
        Command::Done { task_id } => {
            let project = project_api::toggle_task(project_id, &task_id)?;
            if cli.json {
                print_json(&render::project_json(&project)?);
            } else {
                let completed = project
                    .tasks()
                    .find(|task| task.id == task_id.trim())
                    .is_some_and(|task| task.completed);
                let verb = if completed { "Completed" } else { "Reopened" };
                println!("{verb} task {} ({}% overall)", task_id.trim(), project.progress());
            }
        }
        Command::Date { task_id, start, end } => {
            let project = project_api::set_task_dates(
                project_id,
                &task_id,
                parse_optional_date(start.as_deref())?,
                parse_optional_date(end.as_deref())?,
            )?;
            print_project(&project, cli.json, "Rescheduled task in")?;
        }
        Command::MilestoneDate {
            milestone_id,
            start,
            end,
        } => {
            let project = project_api::set_milestone_dates(
                project_id,
                &milestone_id,
                parse_optional_date(start.as_deref())?,
                parse_optional_date(end.as_deref())?,
            )?;
            print_project(&project, cli.json, "Moved milestone in")?;
        }
        Command::AddTask {
            title,
            milestone,
            start,
            end,
        } => {
            let (project, task) = project_api::add_task(
                project_id,
                NewTask {
                    milestone_id: milestone,
                    title,
                    start_date: parse_optional_date(start.as_deref())?,
                    end_date: parse_optional_date(end.as_deref())?,
                },
            )?;
            if cli.json {
                print_json(&serde_json::json!({
                    "task": task,
                    "project": render::project_json(&project)?,
                }));
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        Command::RemoveTask { task_id } => {
            let project = project_api::remove_task(project_id, &task_id)?;
            print_project(&project, cli.json, "Removed task from")?;
        }
        Command::MoveTask { task_id, index } => {
            let project = project_api::move_task(project_id, &task_id, index)?;
            print_project(&project, cli.json, "Moved task in")?;
        }
        Command::RenameTask { task_id, title } => {
            let project = project_api::retitle_task(project_id, &task_id, &title)?;
            print_project(&project, cli.json, "Renamed task in")?;
        }
        Command::Status { status } => {
            let status = status
                .as_deref()
                .map(str::parse::<ProjectStatus>)
                .transpose()?;
            let project = project_api::set_status(project_id, status)?;
            if cli.json {
                print_json(&render::project_json(&project)?);
            } else {
                println!("Status of {} ({}): {}", project.title, project.id, project.status);
            }
        }
        Command::Replan { deadline, start } => {
            let project = project_api::replan(
                project_id,
                parse_optional_date(deadline.as_deref())?,
                parse_optional_date(start.as_deref())?,
                &schedule_config,
            )?;
            if cli.json {
                print_json(&render::project_json(&project)?);
            } else {
                println!("Replanned project: {} ({})", project.title, project.id);
                println!("{}", render::project_detail(&project, &palette));
            }
        }
        Command::Advise { horizon } => {
            let advice = project_api::advise(project_id, horizon)?;
            if cli.json {
                print_json(&serde_json::json!(advice));
            } else {
                println!("{}", render::advice_text(&advice));
            }
        }
        Command::Delete { id } => {
            let project = project_api::delete_project(&id)?;
            print_project(&project, cli.json, "Deleted project")?;
        }
    }

    Ok(())
}

fn run_interactive(base_config: &Config) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("goalplan".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, base_config) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    init_tracing();
    let base_config = load_base_config();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(&base_config) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, &base_config) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
