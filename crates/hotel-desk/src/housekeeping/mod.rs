//! Housekeeping tasks: the lifecycle guard, the task board and the desk intents.

pub mod board;
pub mod lifecycle;
pub mod service;

pub use board::{NewTaskForm, TaskBoard, TaskRow};
pub use lifecycle::{available_actions, validate, ActionKind, TaskAction, Transition, TransitionError};
pub use service::HousekeepingDesk;
