mod timed_task;

pub use timed_task::{TimedTask, TASK_OFF, TASK_ON};
