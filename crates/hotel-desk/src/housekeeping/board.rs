use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lifecycle::{available_actions, ActionKind};
use crate::api::schema::{
    default_task_minutes, HousekeepingTask, NewTask, TaskFilter, TaskPriority, TaskStatus,
    TaskType,
};
use crate::intent::ValidationError;

/// Row of the task table as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    pub id: i64,
    pub room: String,
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub scheduled: String,
    pub assignee: String,
    pub actions: Vec<ActionKind>,
}

impl From<&HousekeepingTask> for TaskRow {
    fn from(task: &HousekeepingTask) -> Self {
        let room = task
            .room_number
            .clone()
            .unwrap_or_else(|| task.room_id.to_string());
        let scheduled = match &task.scheduled_time {
            Some(time) => format!("{} {time}", task.scheduled_date.format("%Y-%m-%d")),
            None => task.scheduled_date.format("%Y-%m-%d").to_string(),
        };
        let assignee = match (&task.assigned_to_username, task.assigned_to) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("User #{id}"),
            (None, None) => "Unassigned".to_string(),
        };
        Self {
            id: task.id,
            room: format!("Room {room}"),
            task_type: task.task_type,
            priority: task.priority,
            status: task.status,
            scheduled,
            assignee,
            actions: available_actions(task),
        }
    }
}

/// The task list as last loaded, with the filter it was loaded under.
#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    tasks: Vec<HousekeepingTask>,
    filter: TaskFilter,
}

impl TaskBoard {
    pub fn tasks(&self) -> &[HousekeepingTask] {
        &self.tasks
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn rows(&self) -> Vec<TaskRow> {
        self.tasks.iter().map(TaskRow::from).collect()
    }

    pub fn find(&self, task_id: i64) -> Option<&HousekeepingTask> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub(crate) fn find_mut(&mut self, task_id: i64) -> Option<&mut HousekeepingTask> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    pub(crate) fn load(&mut self, tasks: Vec<HousekeepingTask>, filter: TaskFilter) {
        self.tasks = tasks;
        self.filter = filter;
    }

    /// Swaps in the authoritative copy of a task, appending it when it is not listed.
    pub(crate) fn replace(&mut self, task: HousekeepingTask) {
        match self.find_mut(task.id) {
            Some(slot) => *slot = task,
            None => self.tasks.push(task),
        }
    }
}

/// Task creation input as typed by the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTaskForm {
    pub room_id: Option<i64>,
    pub task_type: String,
    #[serde(default)]
    pub priority: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub estimated_duration_minutes: Option<i64>,
}

impl NewTaskForm {
    pub fn validate(&self) -> Result<NewTask, ValidationError> {
        let room_id = self
            .room_id
            .filter(|id| *id > 0)
            .ok_or(ValidationError::Incomplete("Please select a room"))?;
        let task_type = TaskType::parse(&self.task_type).ok_or_else(|| {
            ValidationError::invalid("task_type", format!("unknown task type '{}'", self.task_type))
        })?;
        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => TaskPriority::default(),
            Some(raw) => TaskPriority::parse(raw).ok_or_else(|| {
                ValidationError::invalid("priority", format!("unknown priority '{raw}'"))
            })?,
        };
        let scheduled_date = self
            .scheduled_date
            .ok_or(ValidationError::Incomplete("Please choose a scheduled date"))?;
        let scheduled_time = match self.scheduled_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_time(raw)?),
        };
        let estimated_duration_minutes = match self.estimated_duration_minutes {
            None => default_task_minutes(),
            Some(minutes) if minutes > 0 => u32::try_from(minutes).map_err(|_| {
                ValidationError::invalid("estimated_duration_minutes", "is too large")
            })?,
            Some(minutes) => {
                return Err(ValidationError::invalid(
                    "estimated_duration_minutes",
                    format!("must be greater than zero, got {minutes}"),
                ))
            }
        };
        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);

        Ok(NewTask {
            room_id,
            task_type,
            priority,
            scheduled_date,
            scheduled_time,
            notes,
            estimated_duration_minutes,
        })
    }
}

/// Accepts `HH:MM` on a 24-hour clock.
fn parse_time(raw: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::invalid("scheduled_time", format!("expected HH:MM, got '{raw}'"));
    let (hours, minutes) = raw.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: u8 = hours.parse().map_err(|_| invalid())?;
    let minutes: u8 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    Ok(format!("{hours:02}:{minutes:02}"))
}
