use crate::dates::DueStatus;
use crate::types::{Priority, Recurrence, Task};
use chrono::NaiveDate;
use colored::*;
use std::io::{self, Write};
use terminal_size::{Width, terminal_size};
use textwrap::wrap;

const TITLE_WIDTH: usize = 43;
const TITLE_KEEP: usize = 40;
const DONE_GLYPH: char = '✔';
const PENDING_GLYPH: char = ' ';
const RECUR_GLYPH: char = '↻';
const WRAP_COLUMN: usize = 80;
const MIN_DESCRIPTION_INDENT: usize = 3;
const DETAIL_PAD: usize = 9;

enum Annotation {
    Priority(Priority),
    Due(DueStatus),
    Recur(Recurrence),
    Tags(String),
}

impl Annotation {
    fn plain(&self) -> String {
        match self {
            Annotation::Priority(p) => p.short_code().to_string(),
            Annotation::Due(status) => status.to_string(),
            Annotation::Recur(r) => format!("{} {}", RECUR_GLYPH, r),
            Annotation::Tags(tags) => format!("[{}]", tags),
        }
    }

    fn painted(&self) -> ColoredString {
        let text = self.plain();
        match self {
            Annotation::Priority(Priority::High) => text.bright_red().bold(),
            Annotation::Priority(Priority::Medium) => text.bright_yellow(),
            Annotation::Priority(Priority::Low) => text.bright_blue(),
            Annotation::Due(DueStatus::Overdue(_)) => text.bright_red(),
            Annotation::Due(DueStatus::Today) => text.bright_yellow(),
            Annotation::Due(DueStatus::Upcoming(_)) => text.dimmed(),
            Annotation::Recur(_) => text.bright_magenta(),
            Annotation::Tags(_) => text.cyan(),
        }
    }
}

/// Pieces of a task's summary line, shared by the plain and coloured
/// renderings.
struct LineParts<'a> {
    id: u32,
    completed: bool,
    title: String,
    annotations: Vec<Annotation>,
    description: Option<&'a str>,
}

impl<'a> LineParts<'a> {
    fn of(task: &'a Task, today: NaiveDate) -> Self {
        let mut annotations = Vec::new();
        if let Some(p) = task.priority {
            annotations.push(Annotation::Priority(p));
        }
        if let Some(due) = task.due_date {
            annotations.push(Annotation::Due(DueStatus::of(due, today)));
        }
        if let Some(r) = task.recurrence {
            annotations.push(Annotation::Recur(r));
        }
        if !task.tags.is_empty() {
            annotations.push(Annotation::Tags(task.tags.join(",")));
        }

        LineParts {
            id: task.id,
            completed: task.completed,
            title: truncate_with_dots(&task.title),
            annotations,
            description: task.description.as_deref(),
        }
    }

    fn glyph(&self) -> char {
        if self.completed {
            DONE_GLYPH
        } else {
            PENDING_GLYPH
        }
    }

    fn padded_title(&self) -> String {
        if self.annotations.is_empty() {
            self.title.clone()
        } else {
            format!("{:<width$}", self.title, width = TITLE_WIDTH)
        }
    }
}

/// `  3 | ✔ | Title ... [H] (due in 2 days) ↻ weekly [home]`, plus an
/// indented description line when the task has one.
pub fn format_task_line(task: &Task, today: NaiveDate) -> String {
    let parts = LineParts::of(task, today);

    let mut line = format!(
        "{:>3} | {} | {}",
        parts.id,
        parts.glyph(),
        parts.padded_title()
    );
    for annotation in &parts.annotations {
        line.push(' ');
        line.push_str(&annotation.plain());
    }
    if let Some(desc) = parts.description {
        line.push_str(&format!("\n    - {}", desc));
    }
    line
}

pub fn paint_task_line(task: &Task, today: NaiveDate) -> String {
    let parts = LineParts::of(task, today);

    let glyph = if parts.completed {
        parts.glyph().to_string().bright_green()
    } else {
        parts.glyph().to_string().normal()
    };
    let title = if parts.completed {
        parts.padded_title().dimmed()
    } else {
        parts.padded_title().bright_white()
    };

    let mut line = format!(
        "{} {} {} {}",
        format!("{:>3}", parts.id).bright_black(),
        "|".bright_black(),
        glyph,
        "|".bright_black(),
    );
    line.push(' ');
    line.push_str(&title.to_string());
    for annotation in &parts.annotations {
        line.push(' ');
        line.push_str(&annotation.painted().to_string());
    }
    if let Some(desc) = parts.description {
        line.push_str(&format!("\n    - {}", desc.dimmed()));
    }
    line
}

fn truncate_with_dots(s: &str) -> String {
    if s.chars().count() <= TITLE_WIDTH {
        return s.to_string();
    }

    let truncated: String = s.chars().take(TITLE_KEEP).collect();
    format!("{}...", truncated)
}

pub fn print_task_details(task: &Task, today: NaiveDate, out: &mut impl Write) -> io::Result<()> {
    let pad = DETAIL_PAD;
    writeln!(out, "{:<pad$} {}", "id".dimmed(), task.id.to_string().bright_white())?;
    writeln!(out, "{:<pad$} {}", "title".dimmed(), task.title.bold())?;
    print_task_description(task, pad, out)?;
    writeln!(out, "{:<pad$} {}", "created".dimmed(), task.created_at.format("%Y-%m-%d"))?;

    if let Some(due) = task.due_date {
        let status = Annotation::Due(DueStatus::of(due, today)).painted();
        writeln!(
            out,
            "{:<pad$} {} {}",
            "due".dimmed(),
            due.format("%Y-%m-%d"),
            status
        )?;
    }
    if let Some(p) = task.priority {
        writeln!(
            out,
            "{:<pad$} {}",
            "priority".dimmed(),
            Annotation::Priority(p).painted()
        )?;
    }
    if !task.tags.is_empty() {
        writeln!(out, "{:<pad$} {}", "tags".dimmed(), task.tags.join(", ").cyan())?;
    }
    if let Some(r) = task.recurrence {
        writeln!(out, "{:<pad$} {}", "repeats".dimmed(), Annotation::Recur(r).painted())?;
    }

    let status = if task.completed {
        "done".bright_green()
    } else {
        "pending".bright_yellow()
    };
    writeln!(out, "{:<pad$} {}", "status".dimmed(), status)
}

fn print_task_description(task: &Task, pad: usize, out: &mut impl Write) -> io::Result<()> {
    let Some(ref description) = task.description else {
        return Ok(());
    };

    let indent_len = (pad + 1).max(MIN_DESCRIPTION_INDENT);
    let indent = " ".repeat(indent_len);

    let term_w = term_width();
    let wrap_limit = if term_w >= WRAP_COLUMN {
        WRAP_COLUMN
    } else {
        term_w.saturating_sub(1)
    };
    let wrap_width = wrap_limit.saturating_sub(indent_len).max(10);

    let wrapped = wrap(description, wrap_width);
    if let Some((first, rest)) = wrapped.split_first() {
        writeln!(out, "{:<pad$} {}", "details".dimmed(), first.dimmed())?;
        for line in rest {
            writeln!(out, "{}{}", indent, line.dimmed())?;
        }
    }
    Ok(())
}

fn term_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(WRAP_COLUMN)
}
