use tracing::{info, warn};

use super::board::{NewTaskForm, TaskBoard, TaskRow};
use super::lifecycle::{validate, TaskAction, Transition};
use crate::api::schema::{HousekeepingDashboard, HousekeepingTask, RoomStatusGrid, TaskFilter};
use crate::api::{ApiClient, ApiError};
use crate::intent::{DeskError, Outcome, StatusMessage};
use crate::session::Session;

async fn send_transition(
    client: &ApiClient,
    task_id: i64,
    transition: &Transition,
) -> Result<HousekeepingTask, ApiError> {
    match transition {
        Transition::Assign(request) => client.assign_task(task_id, request).await,
        Transition::Start => client.start_task(task_id).await,
        Transition::Complete(request) => client.complete_task(task_id, request).await,
        Transition::Verify(request) => client.verify_task(task_id, request).await,
    }
}

/// Housekeeping screen state and its intents.
#[derive(Debug, Default)]
pub struct HousekeepingDesk {
    board: TaskBoard,
    dashboard: Option<HousekeepingDashboard>,
    grid: Option<RoomStatusGrid>,
}

impl HousekeepingDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn dashboard(&self) -> Option<&HousekeepingDashboard> {
        self.dashboard.as_ref()
    }

    pub fn grid(&self) -> Option<&RoomStatusGrid> {
        self.grid.as_ref()
    }

    pub async fn load_tasks(
        &mut self,
        session: &mut Session,
        filter: TaskFilter,
    ) -> Result<Outcome<Vec<TaskRow>>, DeskError> {
        let result = session.require_authenticated()?.list_tasks(&filter).await;
        let tasks = session.settle(result)?;
        let status = if tasks.is_empty() {
            StatusMessage::info("No tasks found")
        } else {
            StatusMessage::cleared()
        };
        self.board.load(tasks, filter);
        Ok(Outcome::new(self.board.rows(), status))
    }

    /// Reloads statistics and the task list under the current filter.
    pub async fn refresh(
        &mut self,
        session: &mut Session,
    ) -> Result<Outcome<Vec<TaskRow>>, DeskError> {
        self.load_dashboard(session).await?;
        let filter = self.board.filter().clone();
        let outcome = self.load_tasks(session, filter).await?;
        Ok(Outcome::new(outcome.data, StatusMessage::info("Data refreshed")))
    }

    pub async fn load_dashboard(
        &mut self,
        session: &mut Session,
    ) -> Result<Outcome<HousekeepingDashboard>, DeskError> {
        let result = session.require_authenticated()?.housekeeping_dashboard().await;
        let dashboard = session.settle(result)?;
        self.dashboard = Some(dashboard.clone());
        Ok(Outcome::new(dashboard, StatusMessage::cleared()))
    }

    pub async fn load_room_grid(
        &mut self,
        session: &mut Session,
    ) -> Result<Outcome<RoomStatusGrid>, DeskError> {
        let result = session.require_authenticated()?.room_status_grid().await;
        let grid = session.settle(result)?;
        self.grid = Some(grid.clone());
        Ok(Outcome::new(grid, StatusMessage::cleared()))
    }

    pub async fn task_details(
        &mut self,
        session: &mut Session,
        task_id: i64,
    ) -> Result<Outcome<HousekeepingTask>, DeskError> {
        let result = session.require_authenticated()?.get_task(task_id).await;
        let task = session.settle(result)?;
        self.board.replace(task.clone());
        Ok(Outcome::new(task, StatusMessage::cleared()))
    }

    pub async fn create(
        &mut self,
        session: &mut Session,
        form: &NewTaskForm,
    ) -> Result<Outcome<HousekeepingTask>, DeskError> {
        let request = form.validate().map_err(|err| {
            warn!(error = %err, "task creation rejected");
            DeskError::from(err)
        })?;
        let result = session.require_authenticated()?.create_task(&request).await;
        let task = session.settle(result)?;
        info!(task = task.id, room = task.room_id, task_type = task.task_type.as_str(), "task created");

        self.board.replace(task.clone());
        if let Err(err) = self.refresh(session).await {
            warn!(error = %err, "refresh after task creation failed");
        }
        Ok(Outcome::new(task, StatusMessage::info("Task created successfully")))
    }

    /// Runs a lifecycle action.
    ///
    /// Illegal actions are rejected without touching the network. A legal one is applied to
    /// the local copy first; on success the server's copy replaces it and the list reloads,
    /// on failure the task is fetched again so the board never keeps the unconfirmed change.
    pub async fn apply(
        &mut self,
        session: &mut Session,
        task_id: i64,
        action: TaskAction,
    ) -> Result<Outcome<HousekeepingTask>, DeskError> {
        let kind = action.kind();
        let current = match self.board.find(task_id) {
            Some(task) => task.clone(),
            None => self.task_details(session, task_id).await?.data,
        };

        let transition = validate(&current, action).map_err(|err| {
            warn!(task = task_id, action = kind.as_str(), error = %err, "transition rejected");
            DeskError::from(err)
        })?;

        let client = session.require_authenticated()?;
        if let Some(local) = self.board.find_mut(task_id) {
            transition.apply(local);
        }

        let result = send_transition(client, task_id, &transition).await;
        match result {
            Ok(confirmed) => {
                info!(task = task_id, action = kind.as_str(), status = %confirmed.status, "transition confirmed");
                self.board.replace(confirmed.clone());
                let filter = self.board.filter().clone();
                if let Err(err) = self.load_tasks(session, filter).await {
                    warn!(error = %err, "task list reload failed");
                }
                Ok(Outcome::new(
                    confirmed,
                    StatusMessage::info(kind.success_message()),
                ))
            }
            Err(err) => {
                warn!(task = task_id, action = kind.as_str(), error = %err, "transition failed");
                let err = DeskError::from(err);
                if err.is_auth_failure() {
                    self.board.replace(current);
                } else {
                    self.reconcile(session, current).await;
                }
                session.settle(Err(err))
            }
        }
    }

    /// Restores the authoritative copy of a task after a failed action.
    async fn reconcile(&mut self, session: &Session, snapshot: HousekeepingTask) {
        let task_id = snapshot.id;
        match session.client().get_task(task_id).await {
            Ok(task) => self.board.replace(task),
            Err(err) => {
                warn!(task = task_id, error = %err, "re-fetch failed, restoring previous state");
                self.board.replace(snapshot);
            }
        }
    }
}
