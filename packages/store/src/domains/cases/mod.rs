pub mod models;

pub use models::ApiCase;
