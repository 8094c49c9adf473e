pub mod config;
pub mod decimal;
pub mod errors;
pub mod plan;
pub mod schedule;
pub mod serialization;
pub mod types;

// re-export key types
pub use config::{InstallmentTier, PlanRules};
pub use decimal::Money;
pub use errors::{Result, ScheduleError};
pub use plan::{ManualScheduleDraft, PaymentPlan, PaymentPlanBuilder};
pub use schedule::{
    InstallmentScheduler, ScheduleKind, ScheduleValidator, Scheduled, ValidationContext,
};
pub use serialization::{CreatePaymentPlanRequest, InstallmentRecord, PlanRecord};
pub use types::{Installment, ManualEntry, PlanId, SplitStrategy, StrategyKind};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
