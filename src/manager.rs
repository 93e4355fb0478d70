use crate::types::{NewTask, SortKey, Task, TaskError, TaskFilter, TaskUpdate};
use crate::utils::{non_empty, normalize_tags, validate_title};
use chrono::NaiveDate;
use tracing::debug;

/// Result of completing a task.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub completed: Task,
    /// Next occurrence spawned by a recurring task.
    pub successor: Option<Task>,
}

#[derive(Debug)]
pub struct TaskManager {
    tasks: Vec<Task>,
    next_id: u32,
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskManager {
    pub fn new() -> Self {
        TaskManager {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuilds a manager from stored tasks. `next_id` never falls back to an
    /// id already handed out.
    pub fn restore(mut tasks: Vec<Task>, next_id: u32) -> Self {
        tasks.sort_by_key(|t| t.id);
        let after_max = tasks
            .last()
            .map(|t| t.id.saturating_add(1))
            .unwrap_or(1);
        TaskManager {
            tasks,
            next_id: next_id.max(after_max),
        }
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, new: NewTask, today: NaiveDate) -> Result<&Task, TaskError> {
        validate_title(&new.title)?;
        let id = self.allocate_id()?;

        let task = Task {
            id,
            title: new.title.trim().to_string(),
            description: non_empty(new.description),
            completed: false,
            due_date: new.due_date,
            priority: new.priority,
            tags: normalize_tags(new.tags),
            recurrence: new.recurrence,
            created_at: today,
        };
        debug!(id = task.id, title = %task.title, "task added");

        let idx = self.tasks.len();
        self.tasks.push(task);
        Ok(&self.tasks[idx])
    }

    pub fn delete(&mut self, id: u32) -> Result<Task, TaskError> {
        let idx = self.position(id)?;
        let task = self.tasks.remove(idx);
        debug!(id, "task deleted");
        Ok(task)
    }

    pub fn update(&mut self, id: u32, update: TaskUpdate) -> Result<&Task, TaskError> {
        let idx = self.position(id)?;
        if let Some(ref title) = update.title {
            validate_title(title)?;
        }

        let task = &mut self.tasks[idx];
        if let Some(title) = update.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            task.description = non_empty(description);
        }
        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(tags) = update.tags {
            task.tags = normalize_tags(tags);
        }
        if let Some(recurrence) = update.recurrence {
            task.recurrence = recurrence;
        }
        debug!(id, "task updated");
        Ok(&self.tasks[idx])
    }

    /// Marks a task done. A recurring task spawns its next occurrence, due one
    /// step after the old due date (or after `today` when it had none).
    pub fn complete(&mut self, id: u32, today: NaiveDate) -> Result<Completion, TaskError> {
        let idx = self.position(id)?;
        if self.tasks[idx].completed {
            return Err(TaskError::InvalidInput(format!(
                "Task {} is already completed",
                id
            )));
        }

        self.tasks[idx].completed = true;
        let completed = self.tasks[idx].clone();

        let successor = match completed.recurrence {
            Some(recurrence) => {
                let base = completed.due_date.unwrap_or(today);
                let next = NewTask {
                    title: completed.title.clone(),
                    description: completed.description.clone(),
                    due_date: Some(recurrence.next_due(base)),
                    priority: completed.priority,
                    tags: completed.tags.clone(),
                    recurrence: Some(recurrence),
                };
                let added = self.add(next, today).map(Task::clone);
                let task = match added {
                    Ok(task) => task,
                    Err(e) => {
                        self.tasks[idx].completed = false;
                        return Err(e);
                    }
                };
                debug!(id, successor = task.id, %recurrence, "recurring task rescheduled");
                Some(task)
            }
            None => None,
        };

        debug!(id, "task completed");
        Ok(Completion {
            completed,
            successor,
        })
    }

    /// Marks a completed task as pending again. Successors already spawned
    /// are left in place.
    pub fn reopen(&mut self, id: u32) -> Result<&Task, TaskError> {
        let idx = self.position(id)?;
        if !self.tasks[idx].completed {
            return Err(TaskError::InvalidInput(format!(
                "Task {} is not completed",
                id
            )));
        }
        self.tasks[idx].completed = false;
        debug!(id, "task reopened");
        Ok(&self.tasks[idx])
    }

    pub fn list(&self, filter: &TaskFilter, today: NaiveDate) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| filter.matches(t, today))
            .collect();

        match filter.sort {
            SortKey::Id => tasks.sort_by_key(|t| t.id),
            SortKey::Due => tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date, t.id)),
            SortKey::Priority => {
                tasks.sort_by_key(|t| (t.priority.map(|p| p.rank()).unwrap_or(u8::MAX), t.id))
            }
        }
        tasks
    }

    /// Hands out the next id. `u32::MAX` is never handed out, so it marks an
    /// exhausted counter.
    fn allocate_id(&mut self) -> Result<u32, TaskError> {
        let id = self.next_id;
        if id == u32::MAX {
            return Err(TaskError::InvalidInput(
                "No task ids left; delete the database to start over".to_string(),
            ));
        }
        self.next_id = id + 1;
        Ok(id)
    }

    fn position(&self, id: u32) -> Result<usize, TaskError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }
}
