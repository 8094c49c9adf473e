pub mod scheduler;
pub mod validator;

pub use scheduler::InstallmentScheduler;
pub use validator::{ScheduleKind, ScheduleValidator, Scheduled, ValidationContext};
