use crate::manager::TaskManager;
use crate::types::{Task, TaskError};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result as SqlResult, params};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";
const NEXT_ID_KEY: &str = "next_id";

/// SQLite snapshot of a `TaskManager`. The whole collection is rewritten on
/// every save.
pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    pub fn open(path: &Path) -> Result<Self, TaskError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        init_db(&conn)?;
        info!(path = %path.display(), "opened task database");
        Ok(TaskStore { conn })
    }

    pub fn open_in_memory() -> Result<Self, TaskError> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(TaskStore { conn })
    }

    pub fn load(&self) -> Result<TaskManager, TaskError> {
        let mut statement = self.conn.prepare(
            "SELECT id, title, description, completed, due_date, priority, tags, recurrence,
                    created_at
             FROM tasks ORDER BY id",
        )?;

        let rows = statement.query_map([], row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }

        let next_id: u32 = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                [NEXT_ID_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);

        debug!(count = tasks.len(), next_id, "tasks loaded");
        Ok(TaskManager::restore(tasks, next_id))
    }

    pub fn save(&mut self, manager: &TaskManager) -> Result<(), TaskError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO tasks (id, title, description, completed, due_date, priority, tags,
                                    recurrence, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for task in manager.tasks() {
                insert.execute(params![
                    task.id,
                    task.title,
                    task.description,
                    task.completed,
                    task.due_date.map(|d| d.format(DATE_FORMAT).to_string()),
                    task.priority.map(|p| p.to_string()),
                    task.tags.join(","),
                    task.recurrence.map(|r| r.to_string()),
                    task.created_at.format(DATE_FORMAT).to_string(),
                ])?;
            }
        }
        tx.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![NEXT_ID_KEY, manager.next_id().to_string()],
        )?;
        tx.commit()?;

        debug!(count = manager.len(), "tasks saved");
        Ok(())
    }
}

fn row_to_task(row: &rusqlite::Row) -> SqlResult<Task> {
    let due_date: Option<String> = row.get(4)?;
    let priority: Option<String> = row.get(5)?;
    let tags: String = row.get(6)?;
    let recurrence: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        due_date: due_date.and_then(|d| parse_date(&d)),
        priority: priority.and_then(|p| FromStr::from_str(&p).ok()),
        tags: tags
            .split(',')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        recurrence: recurrence.and_then(|r| FromStr::from_str(&r).ok()),
        created_at: parse_date(&created_at).unwrap_or_default(),
    })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

fn init_db(conn: &Connection) -> Result<(), TaskError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            completed INTEGER NOT NULL DEFAULT 0,
            due_date TEXT,
            priority TEXT,
            tags TEXT NOT NULL DEFAULT '',
            recurrence TEXT,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;
    Ok(())
}
