//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    Appointment, CreateTaskRequest, NotificationOutcome, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
