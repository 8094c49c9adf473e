use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};

/// business rules applied when scheduling and validating payment plans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRules {
    pub minimum_installment: Money,
    pub minimum_upfront: Money,
    /// days between "today" and the first generated installment, and between
    /// consecutive generated installments
    pub period_days: u32,
    /// largest allowed gap between consecutive manual installments
    pub max_manual_gap_days: u32,
    /// installment count caps for manual schedules, ascending by `up_to`
    pub installment_tiers: Vec<InstallmentTier>,
}

/// cap on manual installment count up to a remaining amount (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallmentTier {
    pub up_to: Money,
    pub max_installments: u32,
}

impl Default for PlanRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl PlanRules {
    /// back-office defaults: 20 minimum installment, 30 minimum upfront,
    /// 30-day spacing, 40-day manual gap, 12/24 installment tiers
    pub fn standard() -> Self {
        Self {
            minimum_installment: Money::from_major(20),
            minimum_upfront: Money::from_major(30),
            period_days: 30,
            max_manual_gap_days: 40,
            installment_tiers: vec![
                InstallmentTier {
                    up_to: Money::from_major(500_000),
                    max_installments: 12,
                },
                InstallmentTier {
                    up_to: Money::from_major(1_000_000),
                    max_installments: 24,
                },
            ],
        }
    }

    /// load rules from json and check them
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: PlanRules = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// maximum manual installment count for a remaining amount, `None` if unbounded
    pub fn max_installments(&self, remaining: Money) -> Option<u32> {
        self.installment_tiers
            .iter()
            .find(|tier| remaining <= tier.up_to)
            .map(|tier| tier.max_installments)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.minimum_installment.is_positive() {
            return Err(ScheduleError::InvalidConfiguration {
                message: "minimum installment must be positive".to_string(),
            });
        }

        if self.minimum_upfront.is_negative() {
            return Err(ScheduleError::InvalidConfiguration {
                message: "minimum upfront cannot be negative".to_string(),
            });
        }

        if self.period_days == 0 || self.max_manual_gap_days == 0 {
            return Err(ScheduleError::InvalidConfiguration {
                message: "day spacing must be at least one day".to_string(),
            });
        }

        for pair in self.installment_tiers.windows(2) {
            if pair[1].up_to <= pair[0].up_to {
                return Err(ScheduleError::InvalidConfiguration {
                    message: format!(
                        "installment tiers must ascend: {} follows {}",
                        pair[1].up_to, pair[0].up_to
                    ),
                });
            }
        }

        if self.installment_tiers.iter().any(|t| t.max_installments == 0) {
            return Err(ScheduleError::InvalidConfiguration {
                message: "installment tier cannot allow zero installments".to_string(),
            });
        }

        Ok(())
    }
}
