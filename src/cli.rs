use crate::types::{
    NewTask, Priority, Recurrence, SortKey, StatusFilter, TaskCommand, TaskError, TaskFilter,
    TaskUpdate,
};
use crate::utils::{is_clear_keyword, parse_due_date, parse_id, parse_tags};
use chrono::NaiveDate;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::str::FromStr;

const UPDATE_USAGE: &str = "update <id> [--title <text>] [--desc <text>] [--due <date|none>] \
[--priority <p|none>] [--tags <a,b|none>] [--recur <r|none>]";

/// Process-level options.
#[derive(Debug, Clone, Default)]
pub struct AppArgs {
    pub db_path: Option<PathBuf>,
    pub no_color: bool,
}

pub fn build_cli() -> Command {
    Command::new("todo-console")
        .about("Interactive task tracker with due dates, priorities, tags and recurrence")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("db")
                .long("db")
                .env("TODO_DB")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Keep tasks in a SQLite file instead of memory only"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable coloured output")
                .action(ArgAction::SetTrue),
        )
}

pub fn parse_args() -> AppArgs {
    let matches = build_cli().get_matches();
    AppArgs {
        db_path: matches.get_one::<PathBuf>("db").cloned(),
        no_color: matches.get_flag("no-color"),
    }
}

fn repl_command(name: &'static str) -> Command {
    Command::new(name)
        .no_binary_name(true)
        .disable_version_flag(true)
        .help_template("{about}\n\n{usage-heading} {usage}\n\n{all-args}")
}

fn text_arg(id: &'static str, long: &'static str, value_name: &'static str) -> Arg {
    Arg::new(id)
        .long(long)
        .num_args(1..)
        .value_name(value_name)
}

fn add_command() -> Command {
    repl_command("add")
        .about("Add a task")
        .arg(
            Arg::new("title")
                .help("Task title")
                .required(true)
                .num_args(1..)
                .value_name("TITLE"),
        )
        .arg(text_arg("desc", "desc", "TEXT").short('d').help("Description"))
        .arg(
            Arg::new("due")
                .long("due")
                .value_name("DATE")
                .allow_hyphen_values(true)
                .help("Due date (today, tomorrow, 3d, 2w or YYYY-MM-DD)"),
        )
        .arg(
            Arg::new("priority")
                .short('p')
                .long("priority")
                .value_name("PRIORITY")
                .help("high, medium or low"),
        )
        .arg(
            Arg::new("tags")
                .short('t')
                .long("tags")
                .value_name("TAG[,TAG...]")
                .help("Comma separated tags"),
        )
        .arg(
            Arg::new("recur")
                .short('r')
                .long("recur")
                .value_name("FREQUENCY")
                .help("daily, weekly or monthly"),
        )
}

fn list_command() -> Command {
    repl_command("list")
        .about("List tasks (alias: ls)")
        .arg(
            Arg::new("all")
                .short('a')
                .long("all")
                .help("Show every task (default)")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["pending", "done"]),
        )
        .arg(
            Arg::new("pending")
                .long("pending")
                .help("Only incomplete tasks")
                .action(ArgAction::SetTrue)
                .conflicts_with("done"),
        )
        .arg(
            Arg::new("done")
                .long("done")
                .help("Only completed tasks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("overdue")
                .long("overdue")
                .help("Only incomplete tasks past their due date")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("tag").long("tag").value_name("TAG").help("Only tasks with this tag"))
        .arg(
            Arg::new("priority")
                .short('p')
                .long("priority")
                .value_name("PRIORITY")
                .help("Only tasks with this priority"),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .value_name("KEY")
                .value_parser(["id", "due", "priority"])
                .help("Sort order"),
        )
}

fn update_command() -> Command {
    repl_command("update")
        .about("Change fields of a task; 'none' clears optional fields")
        .arg(Arg::new("id").required(true).value_name("ID"))
        .arg(text_arg("title", "title", "TEXT").help("New title"))
        .arg(text_arg("desc", "desc", "TEXT").short('d').help("New description"))
        .arg(
            Arg::new("due")
                .long("due")
                .value_name("DATE")
                .allow_hyphen_values(true)
                .help("New due date"),
        )
        .arg(
            Arg::new("priority")
                .short('p')
                .long("priority")
                .value_name("PRIORITY")
                .help("New priority"),
        )
        .arg(
            Arg::new("tags")
                .short('t')
                .long("tags")
                .value_name("TAG[,TAG...]")
                .help("Replace tags"),
        )
        .arg(
            Arg::new("recur")
                .short('r')
                .long("recur")
                .value_name("FREQUENCY")
                .help("New recurrence"),
        )
}

fn complete_command() -> Command {
    repl_command("complete")
        .about("Mark a task as done (alias: done)")
        .arg(Arg::new("id").required(true).value_name("ID"))
        .arg(
            Arg::new("undo")
                .long("undo")
                .help("Mark the task as pending again")
                .action(ArgAction::SetTrue),
        )
}

/// All console commands, used to render `help`.
pub fn build_repl() -> Command {
    Command::new("todo")
        .no_binary_name(true)
        .disable_help_subcommand(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .subcommand_value_name("COMMAND")
        .subcommand_help_heading("Commands")
        .subcommand(add_command())
        .subcommand(list_command())
        .subcommand(
            repl_command("show")
                .about("Show every field of a task")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(update_command())
        .subcommand(complete_command())
        .subcommand(
            repl_command("delete")
                .about("Delete a task (alias: rm)")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(repl_command("help").about("Show this help"))
        .subcommand(repl_command("exit").about("Leave the program (alias: quit)"))
}

/// Turns one whitespace-tokenized console line into a command. The first
/// token picks the command, case-insensitively.
pub fn parse_line(tokens: &[&str], today: NaiveDate) -> Result<TaskCommand, TaskError> {
    let Some((head, rest)) = tokens.split_first() else {
        return Err(TaskError::UnknownCommand(String::new()));
    };

    match head.to_lowercase().as_str() {
        "add" => parse_add(rest, today),
        "list" | "ls" => parse_list(rest),
        "show" => single_id("show", rest).map(|id| TaskCommand::Show { id }),
        "update" | "edit" => parse_update(rest, today),
        "complete" | "done" => parse_complete(rest),
        "delete" | "rm" => single_id("delete", rest).map(|id| TaskCommand::Delete { id }),
        "help" => Ok(TaskCommand::Help),
        "exit" | "quit" => Ok(TaskCommand::Exit),
        _ => Err(TaskError::UnknownCommand(head.to_string())),
    }
}

fn single_id(name: &str, rest: &[&str]) -> Result<u32, TaskError> {
    match rest {
        [raw] => parse_id(raw),
        _ => Err(TaskError::Usage(format!("{} <id>", name))),
    }
}

fn parse_add(rest: &[&str], today: NaiveDate) -> Result<TaskCommand, TaskError> {
    let matches = add_command().try_get_matches_from(rest)?;

    Ok(TaskCommand::Add(NewTask {
        title: joined(&matches, "title").unwrap_or_default(),
        description: joined(&matches, "desc"),
        due_date: value(&matches, "due")
            .map(|raw| parse_due_date(raw, today))
            .transpose()?,
        priority: value(&matches, "priority").map(parse_enum).transpose()?,
        tags: value(&matches, "tags").map(parse_tags).unwrap_or_default(),
        recurrence: value(&matches, "recur").map(parse_enum).transpose()?,
    }))
}

fn parse_list(rest: &[&str]) -> Result<TaskCommand, TaskError> {
    let matches = list_command().try_get_matches_from(rest)?;

    let status = if matches.get_flag("pending") {
        StatusFilter::PendingOnly
    } else if matches.get_flag("done") {
        StatusFilter::DoneOnly
    } else {
        StatusFilter::All
    };

    Ok(TaskCommand::List(TaskFilter {
        status,
        overdue_only: matches.get_flag("overdue"),
        tag: value(&matches, "tag").and_then(|t| parse_tags(t).into_iter().next()),
        priority: value(&matches, "priority").map(parse_enum).transpose()?,
        sort: value(&matches, "sort")
            .map(parse_enum::<SortKey>)
            .transpose()?
            .unwrap_or_default(),
    }))
}

fn parse_update(rest: &[&str], today: NaiveDate) -> Result<TaskCommand, TaskError> {
    if rest.is_empty() {
        return Err(TaskError::Usage(UPDATE_USAGE.to_string()));
    }
    let matches = update_command().try_get_matches_from(rest)?;
    let id = parse_id(value(&matches, "id").unwrap_or_default())?;

    let update = TaskUpdate {
        title: joined(&matches, "title"),
        description: joined(&matches, "desc").map(|d| (!is_clear_keyword(&d)).then_some(d)),
        due_date: value(&matches, "due")
            .map(|raw| clearable(raw).map(|raw| parse_due_date(raw, today)).transpose())
            .transpose()?,
        priority: value(&matches, "priority")
            .map(|raw| clearable(raw).map(parse_enum::<Priority>).transpose())
            .transpose()?,
        tags: value(&matches, "tags").map(|raw| match clearable(raw) {
            Some(raw) => parse_tags(raw),
            None => Vec::new(),
        }),
        recurrence: value(&matches, "recur")
            .map(|raw| clearable(raw).map(parse_enum::<Recurrence>).transpose())
            .transpose()?,
    };

    if update.is_empty() {
        return Err(TaskError::Usage(UPDATE_USAGE.to_string()));
    }
    Ok(TaskCommand::Update { id, update })
}

fn parse_complete(rest: &[&str]) -> Result<TaskCommand, TaskError> {
    if rest.is_empty() {
        return Err(TaskError::Usage("complete <id> [--undo]".to_string()));
    }
    let matches = complete_command().try_get_matches_from(rest)?;
    let id = parse_id(value(&matches, "id").unwrap_or_default())?;
    Ok(TaskCommand::Complete {
        id,
        undo: matches.get_flag("undo"),
    })
}

fn value<'a>(matches: &'a ArgMatches, id: &str) -> Option<&'a str> {
    matches.get_one::<String>(id).map(String::as_str)
}

fn joined(matches: &ArgMatches, id: &str) -> Option<String> {
    matches
        .get_many::<String>(id)
        .map(|vals| vals.map(String::as_str).collect::<Vec<_>>().join(" "))
        .filter(|s| !s.trim().is_empty())
}

/// `None` when the value asks for the field to be cleared.
fn clearable(raw: &str) -> Option<&str> {
    (!is_clear_keyword(raw)).then_some(raw)
}

fn parse_enum<T: FromStr<Err = String>>(raw: &str) -> Result<T, TaskError> {
    T::from_str(raw).map_err(TaskError::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(line: &str) -> Result<TaskCommand, TaskError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        parse_line(&tokens, date(2024, 5, 10))
    }

    #[test]
    fn add_with_every_flag() {
        let cmd = parse(
            "add Water the plants --desc balcony ones --due tomorrow -p high \
             --tags Home,garden --recur weekly",
        )
        .unwrap();

        assert_eq!(
            cmd,
            TaskCommand::Add(NewTask {
                title: "Water the plants".into(),
                description: Some("balcony ones".into()),
                due_date: Some(date(2024, 5, 11)),
                priority: Some(Priority::High),
                tags: vec!["home".into(), "garden".into()],
                recurrence: Some(Recurrence::Weekly),
            })
        );
    }

    #[test]
    fn add_requires_title_and_valid_values() {
        assert!(matches!(parse("add"), Err(TaskError::Cli(_))));
        assert!(matches!(
            parse("add x --due someday"),
            Err(TaskError::InvalidDate(_))
        ));
        assert!(matches!(
            parse("add x --due -1d").unwrap(),
            TaskCommand::Add(NewTask { due_date: Some(d), .. }) if d == date(2024, 5, 9)
        ));
        assert!(matches!(
            parse("add x --priority urgent"),
            Err(TaskError::InvalidInput(_))
        ));
    }

    #[test]
    fn commands_are_case_insensitive_with_aliases() {
        assert_eq!(parse("EXIT").unwrap(), TaskCommand::Exit);
        assert_eq!(parse("quit").unwrap(), TaskCommand::Exit);
        assert_eq!(parse("Help").unwrap(), TaskCommand::Help);
        assert_eq!(parse("rm 3").unwrap(), TaskCommand::Delete { id: 3 });
        assert_eq!(
            parse("done 4").unwrap(),
            TaskCommand::Complete { id: 4, undo: false }
        );
        assert_eq!(
            parse("complete 4 --undo").unwrap(),
            TaskCommand::Complete { id: 4, undo: true }
        );
    }

    #[test]
    fn unknown_command_and_bad_ids() {
        assert!(matches!(
            parse("frobnicate"),
            Err(TaskError::UnknownCommand(c)) if c == "frobnicate"
        ));
        assert!(matches!(parse("delete abc"), Err(TaskError::InvalidId(_))));
        assert!(matches!(parse("delete"), Err(TaskError::Usage(_))));
        assert!(matches!(parse("delete 1 2"), Err(TaskError::Usage(_))));
        assert!(matches!(parse("complete x"), Err(TaskError::InvalidId(_))));
    }

    #[test]
    fn list_filters() {
        assert_eq!(parse("list").unwrap(), TaskCommand::List(TaskFilter::default()));
        assert_eq!(
            parse("ls --pending --overdue --tag Work --sort due").unwrap(),
            TaskCommand::List(TaskFilter {
                status: StatusFilter::PendingOnly,
                overdue_only: true,
                tag: Some("work".into()),
                priority: None,
                sort: SortKey::Due,
            })
        );
        assert_eq!(
            parse("list -p High").unwrap(),
            TaskCommand::List(TaskFilter {
                priority: Some(Priority::High),
                ..Default::default()
            })
        );
        assert!(matches!(
            parse("list --priority urgent"),
            Err(TaskError::InvalidInput(_))
        ));
        assert!(matches!(parse("list --pending --done"), Err(TaskError::Cli(_))));
    }

    #[test]
    fn update_sets_and_clears() {
        let cmd = parse("update 2 --title New name --due none -p low --tags none --recur monthly")
            .unwrap();
        assert_eq!(
            cmd,
            TaskCommand::Update {
                id: 2,
                update: TaskUpdate {
                    title: Some("New name".into()),
                    description: None,
                    due_date: Some(None),
                    priority: Some(Some(Priority::Low)),
                    tags: Some(Vec::new()),
                    recurrence: Some(Some(Recurrence::Monthly)),
                },
            }
        );

        assert_eq!(
            parse("update 2 --desc none").unwrap(),
            TaskCommand::Update {
                id: 2,
                update: TaskUpdate {
                    description: Some(None),
                    ..Default::default()
                },
            }
        );
    }

    #[test]
    fn update_needs_a_field() {
        assert!(matches!(parse("update"), Err(TaskError::Usage(_))));
        assert!(matches!(parse("update 1"), Err(TaskError::Usage(_))));
        assert!(matches!(parse("update one --title x"), Err(TaskError::InvalidId(_))));
    }

    #[test]
    fn repl_help_mentions_every_command() {
        let help = build_repl().render_help().to_string();
        for name in ["add", "list", "show", "update", "complete", "delete", "help", "exit"] {
            assert!(help.contains(name), "missing {name}");
        }
    }
}
