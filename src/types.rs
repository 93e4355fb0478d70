use chrono::NaiveDate;
use clap::error::ErrorKind;
use colored::*;
use std::str::FromStr;
use std::{fmt, io};

#[derive(Debug)]
pub enum TaskError {
    Cli(String),
    Database(rusqlite::Error),
    InvalidDate(String),
    InvalidId(String),
    InvalidInput(String),
    Io(io::Error),
    NotFound(u32),
    UnknownCommand(String),
    Usage(String),
}

impl From<rusqlite::Error> for TaskError {
    fn from(err: rusqlite::Error) -> Self {
        TaskError::Database(err)
    }
}

impl From<io::Error> for TaskError {
    fn from(err: io::Error) -> Self {
        TaskError::Io(err)
    }
}

impl From<clap::Error> for TaskError {
    fn from(err: clap::Error) -> Self {
        let rendered = err.render().to_string();
        let text = match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => rendered.as_str(),
            // Keep the "error: ..." part, drop the usage block and footer.
            _ => ["\n\nUsage:", "\n\nFor more information"]
                .iter()
                .filter_map(|marker| rendered.find(marker))
                .min()
                .map_or(rendered.as_str(), |end| &rendered[..end]),
        };
        TaskError::Cli(text.trim_end().to_string())
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Cli(e) => write!(f, "{}", e),
            TaskError::Database(e) => write!(f, "{} {}", "Database error:".bright_red(), e),
            TaskError::Io(e) => write!(f, "{} {}", "IO error:".bright_red(), e),
            TaskError::InvalidId(_) => write!(
                f,
                "{} Please provide a number.",
                "Invalid task ID.".bright_yellow()
            ),
            TaskError::InvalidDate(e) => write!(f, "{} {}", "Invalid date:".bright_yellow(), e),
            TaskError::InvalidInput(e) => write!(f, "{} {}", "Invalid input:".bright_yellow(), e),
            TaskError::NotFound(id) => {
                write!(f, "{}", format!("Task {} not found.", id).bright_red())
            }
            TaskError::UnknownCommand(cmd) => write!(
                f,
                "Unknown command: {}. Type 'help' for available commands.",
                cmd.bright_yellow()
            ),
            TaskError::Usage(usage) => write!(f, "{} {}", "Usage:".bright_yellow(), usage),
        }
    }
}

impl std::error::Error for TaskError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn short_code(self) -> &'static str {
        match self {
            Priority::High => "[H]",
            Priority::Medium => "[M]",
            Priority::Low => "[L]",
        }
    }

    /// Sort rank, most urgent first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "h" | "high" => Ok(Priority::High),
            "m" | "med" | "medium" => Ok(Priority::Medium),
            "l" | "low" => Ok(Priority::Low),
            _ => Err(format!("Invalid priority: {} (use high, medium or low)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::Daily => write!(f, "daily"),
            Recurrence::Weekly => write!(f, "weekly"),
            Recurrence::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "daily" => Ok(Recurrence::Daily),
            "w" | "weekly" => Ok(Recurrence::Weekly),
            "m" | "monthly" => Ok(Recurrence::Monthly),
            _ => Err(format!(
                "Invalid recurrence: {} (use daily, weekly or monthly)",
                s
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub tags: Vec<String>,
    pub recurrence: Option<Recurrence>,
    pub created_at: NaiveDate,
}

/// Fields supplied by `add`; the manager assigns the id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub tags: Vec<String>,
    pub recurrence: Option<Recurrence>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial update. `None` leaves a field alone, `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Option<Priority>>,
    pub tags: Option<Vec<String>>,
    pub recurrence: Option<Option<Recurrence>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.tags.is_none()
            && self.recurrence.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    PendingOnly,
    DoneOnly,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::PendingOnly => !task.completed,
            StatusFilter::DoneOnly => task.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Id,
    Due,
    Priority,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(SortKey::Id),
            "due" => Ok(SortKey::Due),
            "priority" => Ok(SortKey::Priority),
            _ => Err(format!("Invalid sort key: {} (use id, due or priority)", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub overdue_only: bool,
    pub tag: Option<String>,
    pub priority: Option<Priority>,
    pub sort: SortKey,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        if !self.status.matches(task) {
            return false;
        }

        if self.overdue_only {
            let overdue = !task.completed
                && task
                    .due_date
                    .is_some_and(|due| crate::dates::is_overdue(due, today));
            if !overdue {
                return false;
            }
        }

        if let Some(ref tag) = self.tag {
            if !task.tags.iter().any(|t| t == tag) {
                return false;
            }
        }

        self.priority.is_none_or(|p| task.priority == Some(p))
    }
}

#[derive(Debug, PartialEq)]
pub enum TaskCommand {
    Add(NewTask),
    Complete { id: u32, undo: bool },
    Delete { id: u32 },
    Exit,
    Help,
    List(TaskFilter),
    Show { id: u32 },
    Update { id: u32, update: TaskUpdate },
}
