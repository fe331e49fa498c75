pub mod manager;
pub mod models;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::advisor::{Advisor, AdvisorSummary, NewAdvisor, PerformanceEntry};
pub use models::feedback::Feedback;
