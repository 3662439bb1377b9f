//! Legal status transitions of a housekeeping task.
//!
//! ```text
//! pending --start--> in_progress --complete--> completed --verify--> verified
//! ```
//!
//! `start` additionally requires an assignee. `assign` is orthogonal to status and only
//! moves `assigned_to` from empty to a user. Every check here runs before a request is sent.

use serde::{Deserialize, Serialize};

use crate::api::schema::{
    AssignRequest, CompletionRequest, HousekeepingTask, TaskStatus, VerificationRequest,
};

/// A user's request to move a task, as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TaskAction {
    Assign {
        user_id: i64,
    },
    Start,
    Complete {
        #[serde(default)]
        notes: Option<String>,
        #[serde(default)]
        actual_duration_minutes: Option<i64>,
    },
    Verify {
        #[serde(default)]
        notes: Option<String>,
    },
}

impl TaskAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Assign { .. } => ActionKind::Assign,
            Self::Start => ActionKind::Start,
            Self::Complete { .. } => ActionKind::Complete,
            Self::Verify { .. } => ActionKind::Verify,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Assign,
    Start,
    Complete,
    Verify,
    Details,
}

impl ActionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Verify => "verify",
            Self::Details => "details",
        }
    }

    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Assign => "Task assigned successfully",
            Self::Start => "Task started",
            Self::Complete => "Task completed",
            Self::Verify => "Task verified",
            Self::Details => "",
        }
    }

    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Assign => "Failed to assign task",
            Self::Start => "Failed to start task",
            Self::Complete => "Failed to complete task",
            Self::Verify => "Failed to verify task",
            Self::Details => "Failed to load task",
        }
    }
}

/// A checked transition, ready to be sent.
#[derive(Debug, Clone)]
pub enum Transition {
    Assign(AssignRequest),
    Start,
    Complete(CompletionRequest),
    Verify(VerificationRequest),
}

impl Transition {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Assign(_) => ActionKind::Assign,
            Self::Start => ActionKind::Start,
            Self::Complete(_) => ActionKind::Complete,
            Self::Verify(_) => ActionKind::Verify,
        }
    }

    /// Applies the transition to a local copy of the task.
    pub fn apply(&self, task: &mut HousekeepingTask) {
        match self {
            Self::Assign(request) => {
                task.assigned_to = Some(request.assigned_to);
            }
            Self::Start => task.status = TaskStatus::InProgress,
            Self::Complete(request) => {
                task.status = TaskStatus::Completed;
                task.completion_notes = Some(request.completion_notes.clone());
                task.actual_duration_minutes = request.actual_duration_minutes;
            }
            Self::Verify(request) => {
                task.status = TaskStatus::Verified;
                task.verification_notes = Some(request.verification_notes.clone());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("task #{task_id} must be assigned before it can be started")]
    Unassigned { task_id: i64 },
    #[error("cannot {action} task #{task_id} while it is {status}")]
    InvalidStatus {
        task_id: i64,
        action: &'static str,
        status: TaskStatus,
    },
    #[error("task #{task_id} is already assigned to user {assigned_to}")]
    AlreadyAssigned { task_id: i64, assigned_to: i64 },
    #[error("user id must be a positive number, got {0}")]
    InvalidAssignee(i64),
    #[error("actual duration must be a non-negative number of minutes, got {0}")]
    InvalidDuration(i64),
    #[error("actual duration of {minutes} minutes exceeds the limit of {max}")]
    DurationTooLong { minutes: i64, max: u32 },
}

fn require_status(
    task: &HousekeepingTask,
    action: ActionKind,
    expected: TaskStatus,
) -> Result<(), TransitionError> {
    if task.status == expected {
        Ok(())
    } else {
        Err(TransitionError::InvalidStatus {
            task_id: task.id,
            action: action.as_str(),
            status: task.status,
        })
    }
}

/// Checks `action` against the task's current state.
pub fn validate(task: &HousekeepingTask, action: TaskAction) -> Result<Transition, TransitionError> {
    match action {
        TaskAction::Assign { user_id } => {
            if user_id <= 0 {
                return Err(TransitionError::InvalidAssignee(user_id));
            }
            if let Some(assigned_to) = task.assigned_to {
                return Err(TransitionError::AlreadyAssigned {
                    task_id: task.id,
                    assigned_to,
                });
            }
            Ok(Transition::Assign(AssignRequest {
                assigned_to: user_id,
            }))
        }
        TaskAction::Start => {
            require_status(task, ActionKind::Start, TaskStatus::Pending)?;
            if task.assigned_to.is_none() {
                return Err(TransitionError::Unassigned { task_id: task.id });
            }
            Ok(Transition::Start)
        }
        TaskAction::Complete {
            notes,
            actual_duration_minutes,
        } => {
            require_status(task, ActionKind::Complete, TaskStatus::InProgress)?;
            let actual_duration_minutes = actual_duration_minutes
                .map(|minutes| match u32::try_from(minutes) {
                    Ok(minutes) => Ok(minutes),
                    Err(_) if minutes < 0 => Err(TransitionError::InvalidDuration(minutes)),
                    Err(_) => Err(TransitionError::DurationTooLong {
                        minutes,
                        max: u32::MAX,
                    }),
                })
                .transpose()?;
            Ok(Transition::Complete(CompletionRequest {
                completion_notes: notes.unwrap_or_default(),
                actual_duration_minutes,
            }))
        }
        TaskAction::Verify { notes } => {
            require_status(task, ActionKind::Verify, TaskStatus::Completed)?;
            Ok(Transition::Verify(VerificationRequest {
                verification_notes: notes.unwrap_or_default(),
            }))
        }
    }
}

/// Actions offered for a task on the board. Details is always available.
pub fn available_actions(task: &HousekeepingTask) -> Vec<ActionKind> {
    let mut actions = Vec::with_capacity(2);
    match task.status {
        TaskStatus::Pending if task.assigned_to.is_some() => actions.push(ActionKind::Start),
        TaskStatus::Pending => actions.push(ActionKind::Assign),
        TaskStatus::InProgress => actions.push(ActionKind::Complete),
        TaskStatus::Completed => actions.push(ActionKind::Verify),
        TaskStatus::Verified => {}
    }
    actions.push(ActionKind::Details);
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::schema::{TaskPriority, TaskType};
    use chrono::NaiveDate;

    fn task(status: TaskStatus, assigned_to: Option<i64>) -> HousekeepingTask {
        HousekeepingTask {
            id: 11,
            room_id: 4,
            room_number: Some("104".to_string()),
            task_type: TaskType::Cleaning,
            priority: TaskPriority::High,
            status,
            assigned_to,
            assigned_to_username: None,
            scheduled_date: NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"),
            scheduled_time: Some("10:00".to_string()),
            estimated_duration_minutes: 30,
            notes: None,
            completion_notes: None,
            verification_notes: None,
            actual_duration_minutes: None,
        }
    }

    #[test]
    fn start_requires_an_assignee() {
        let err = validate(&task(TaskStatus::Pending, None), TaskAction::Start)
            .expect_err("unassigned start");
        assert_eq!(err, TransitionError::Unassigned { task_id: 11 });
    }

    #[test]
    fn assigned_pending_task_starts() {
        let mut local = task(TaskStatus::Pending, Some(3));
        let transition = validate(&local, TaskAction::Start).expect("start");
        transition.apply(&mut local);
        assert_eq!(local.status, TaskStatus::InProgress);
    }

    #[test]
    fn verify_requires_completed_status() {
        for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Verified] {
            let err = validate(&task(status, Some(3)), TaskAction::Verify { notes: None })
                .expect_err("verify rejected");
            assert!(matches!(
                err,
                TransitionError::InvalidStatus { action: "verify", .. }
            ));
        }
    }

    #[test]
    fn complete_rejects_negative_duration() {
        let err = validate(
            &task(TaskStatus::InProgress, Some(3)),
            TaskAction::Complete {
                notes: Some("done".to_string()),
                actual_duration_minutes: Some(-5),
            },
        )
        .expect_err("negative duration");
        assert_eq!(err, TransitionError::InvalidDuration(-5));
    }

    #[test]
    fn complete_rejects_duration_beyond_u32() {
        let minutes = i64::from(u32::MAX) + 1;
        let err = validate(
            &task(TaskStatus::InProgress, Some(3)),
            TaskAction::Complete {
                notes: None,
                actual_duration_minutes: Some(minutes),
            },
        )
        .expect_err("oversized duration");
        assert_eq!(
            err,
            TransitionError::DurationTooLong {
                minutes,
                max: u32::MAX
            }
        );
        assert_eq!(
            err.to_string(),
            "actual duration of 4294967296 minutes exceeds the limit of 4294967295"
        );
    }

    #[test]
    fn complete_carries_notes_and_duration() {
        let mut local = task(TaskStatus::InProgress, Some(3));
        let transition = validate(
            &local,
            TaskAction::Complete {
                notes: None,
                actual_duration_minutes: Some(0),
            },
        )
        .expect("complete");
        transition.apply(&mut local);
        assert_eq!(local.status, TaskStatus::Completed);
        assert_eq!(local.completion_notes.as_deref(), Some(""));
        assert_eq!(local.actual_duration_minutes, Some(0));
    }

    #[test]
    fn assign_is_independent_of_status_but_not_repeatable() {
        let transition = validate(
            &task(TaskStatus::Completed, None),
            TaskAction::Assign { user_id: 9 },
        )
        .expect("assign");
        assert_eq!(transition.kind(), ActionKind::Assign);

        let err = validate(
            &task(TaskStatus::Pending, Some(2)),
            TaskAction::Assign { user_id: 9 },
        )
        .expect_err("reassign");
        assert_eq!(
            err,
            TransitionError::AlreadyAssigned {
                task_id: 11,
                assigned_to: 2
            }
        );
        assert_eq!(
            validate(&task(TaskStatus::Pending, None), TaskAction::Assign { user_id: 0 })
                .expect_err("zero id"),
            TransitionError::InvalidAssignee(0)
        );
    }

    #[test]
    fn board_actions_follow_status() {
        assert_eq!(
            available_actions(&task(TaskStatus::Pending, None)),
            vec![ActionKind::Assign, ActionKind::Details]
        );
        assert_eq!(
            available_actions(&task(TaskStatus::Pending, Some(1))),
            vec![ActionKind::Start, ActionKind::Details]
        );
        assert_eq!(
            available_actions(&task(TaskStatus::Completed, Some(1))),
            vec![ActionKind::Verify, ActionKind::Details]
        );
        assert_eq!(
            available_actions(&task(TaskStatus::Verified, Some(1))),
            vec![ActionKind::Details]
        );
    }

    #[test]
    fn actions_decode_from_tagged_json() {
        let action: TaskAction =
            serde_json::from_str(r#"{"action":"complete","actual_duration_minutes":25}"#)
                .expect("action");
        assert_eq!(
            action,
            TaskAction::Complete {
                notes: None,
                actual_duration_minutes: Some(25)
            }
        );
    }
}
