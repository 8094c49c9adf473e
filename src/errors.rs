use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        message: String,
    },

    #[error("installment {index} below minimum: minimum {minimum}, provided {amount}")]
    BelowMinimumAmount {
        index: usize,
        minimum: Money,
        amount: Money,
    },

    #[error("too many installments: maximum {maximum} for remaining {remaining}, provided {count}")]
    TooManyInstallments {
        count: usize,
        maximum: u32,
        remaining: Money,
    },

    #[error("schedule has no installments")]
    EmptySchedule,

    #[error("amount mismatch: expected {expected}, scheduled {scheduled}")]
    AmountMismatch {
        expected: Money,
        scheduled: Money,
    },

    #[error("installment {index} has a missing, invalid or past due date")]
    InvalidOrPastDate {
        index: usize,
    },

    #[error("installment {index} is not dated after the previous installment")]
    DatesNotIncreasing {
        index: usize,
    },

    #[error("gap before installment {index} is {days} days, maximum {maximum}")]
    GapTooLarge {
        index: usize,
        days: i64,
        maximum: u32,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScheduleError {
    /// stable code reported to callers for user-facing messaging
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleError::InvalidParameter { .. } => "invalid_parameter",
            ScheduleError::BelowMinimumAmount { .. } => "below_minimum_amount",
            ScheduleError::TooManyInstallments { .. } => "too_many_installments",
            ScheduleError::EmptySchedule => "empty_schedule",
            ScheduleError::AmountMismatch { .. } => "amount_mismatch",
            ScheduleError::InvalidOrPastDate { .. } => "invalid_or_past_date",
            ScheduleError::DatesNotIncreasing { .. } => "dates_not_increasing",
            ScheduleError::GapTooLarge { .. } => "gap_too_large",
            ScheduleError::InvalidConfiguration { .. } => "invalid_configuration",
            ScheduleError::Serialization(_) => "serialization",
        }
    }

    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        ScheduleError::InvalidParameter {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
