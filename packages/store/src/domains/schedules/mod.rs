pub mod models;

pub use models::TimedTask;
