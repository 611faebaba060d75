// Concrete record types, one module per domain.

pub mod cases;
pub mod schedules;
