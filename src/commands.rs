use crate::display::{paint_task_line, print_task_details};
use crate::help::help_text;
use crate::manager::TaskManager;
use crate::types::{NewTask, TaskCommand, TaskError, TaskFilter, TaskUpdate};
use chrono::NaiveDate;
use colored::*;
use std::io::Write;

/// What the console should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The collection changed and should be saved if a store is attached.
    Changed,
    Unchanged,
    Exit,
}

pub fn execute_command(
    manager: &mut TaskManager,
    command: TaskCommand,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<Outcome, TaskError> {
    match command {
        TaskCommand::Add(new) => handle_add(manager, new, today, out),

        TaskCommand::List(filter) => handle_list(manager, &filter, today, out),

        TaskCommand::Show { id } => handle_show(manager, id, today, out),

        TaskCommand::Update { id, update } => handle_update(manager, id, update, today, out),

        TaskCommand::Complete { id, undo: false } => handle_complete(manager, id, today, out),

        TaskCommand::Complete { id, undo: true } => handle_reopen(manager, id, today, out),

        TaskCommand::Delete { id } => handle_delete(manager, id, out),

        TaskCommand::Help => {
            writeln!(out, "{}", help_text())?;
            Ok(Outcome::Unchanged)
        }

        TaskCommand::Exit => Ok(Outcome::Exit),
    }
}

fn handle_add(
    manager: &mut TaskManager,
    new: NewTask,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<Outcome, TaskError> {
    let task = manager.add(new, today)?;
    writeln!(out, "{}", format!("Task {} added.", task.id).bright_green())?;
    writeln!(out, "{}", paint_task_line(task, today))?;
    Ok(Outcome::Changed)
}

fn handle_list(
    manager: &TaskManager,
    filter: &TaskFilter,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<Outcome, TaskError> {
    let tasks = manager.list(filter, today);

    if tasks.is_empty() {
        writeln!(out, "{}", "no tasks found".dimmed())?;
        return Ok(Outcome::Unchanged);
    }

    for task in &tasks {
        writeln!(out, "{}", paint_task_line(task, today))?;
    }

    let pending = tasks.iter().filter(|t| !t.completed).count();
    writeln!(
        out,
        "{}",
        format!("{} shown, {} pending", tasks.len(), pending).dimmed()
    )?;
    Ok(Outcome::Unchanged)
}

fn handle_show(
    manager: &TaskManager,
    id: u32,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<Outcome, TaskError> {
    let task = manager.get(id).ok_or(TaskError::NotFound(id))?;
    print_task_details(task, today, out)?;
    Ok(Outcome::Unchanged)
}

fn handle_update(
    manager: &mut TaskManager,
    id: u32,
    update: TaskUpdate,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<Outcome, TaskError> {
    let task = manager.update(id, update)?;
    writeln!(out, "{}", format!("Task {} updated.", id).bright_green())?;
    writeln!(out, "{}", paint_task_line(task, today))?;
    Ok(Outcome::Changed)
}

fn handle_complete(
    manager: &mut TaskManager,
    id: u32,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<Outcome, TaskError> {
    let completion = manager.complete(id, today)?;
    writeln!(out, "{}", format!("Task {} completed.", id).bright_green())?;

    if let Some(next) = completion.successor {
        writeln!(
            out,
            "{}",
            format!("Next occurrence scheduled as task {}:", next.id).bright_magenta()
        )?;
        writeln!(out, "{}", paint_task_line(&next, today))?;
    }
    Ok(Outcome::Changed)
}

fn handle_reopen(
    manager: &mut TaskManager,
    id: u32,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<Outcome, TaskError> {
    let task = manager.reopen(id)?;
    writeln!(out, "{}", format!("Task {} marked as pending.", id).bright_yellow())?;
    writeln!(out, "{}", paint_task_line(task, today))?;
    Ok(Outcome::Changed)
}

fn handle_delete(
    manager: &mut TaskManager,
    id: u32,
    out: &mut impl Write,
) -> Result<Outcome, TaskError> {
    let task = manager.delete(id)?;
    writeln!(
        out,
        "{}",
        format!("Task {} deleted: {}", task.id, task.title).bright_green()
    )?;
    Ok(Outcome::Changed)
}
