mod api_case;

pub use api_case::{ApiCase, CASE_STATUS_ACTIVE, CASE_STATUS_DISABLED};
