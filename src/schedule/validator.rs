use chrono::NaiveDate;
use tracing::debug;

use crate::config::PlanRules;
use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::types::{Installment, ManualEntry};

/// anything carrying a due date and an amount
pub trait Scheduled {
    /// due date, `None` when missing or unparsable
    fn due_date(&self) -> Option<NaiveDate>;
    fn amount(&self) -> Money;
}

impl Scheduled for Installment {
    fn due_date(&self) -> Option<NaiveDate> {
        Some(self.due_date)
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

impl Scheduled for ManualEntry {
    fn due_date(&self) -> Option<NaiveDate> {
        ManualEntry::due_date(self)
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

/// how the schedule under validation was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    Generated,
    Manual,
}

/// what a schedule is validated against
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    /// outstanding amount minus upfront payment
    pub remaining: Money,
    pub kind: ScheduleKind,
    pub today: NaiveDate,
}

impl ValidationContext {
    pub fn generated(remaining: Money, today: NaiveDate) -> Self {
        Self {
            remaining,
            kind: ScheduleKind::Generated,
            today,
        }
    }

    pub fn manual(remaining: Money, today: NaiveDate) -> Self {
        Self {
            remaining,
            kind: ScheduleKind::Manual,
            today,
        }
    }

    fn is_manual(&self) -> bool {
        self.kind == ScheduleKind::Manual
    }
}

/// rejects schedules that break plan rules; the first failing rule is reported
pub struct ScheduleValidator<'a> {
    rules: &'a PlanRules,
}

impl<'a> ScheduleValidator<'a> {
    pub fn new(rules: &'a PlanRules) -> Self {
        Self { rules }
    }

    pub fn validate<T: Scheduled>(
        &self,
        installments: &[T],
        context: &ValidationContext,
    ) -> Result<()> {
        let result = self.check(installments, context);
        if let Err(err) = &result {
            debug!(
                code = err.code(),
                kind = ?context.kind,
                count = installments.len(),
                "schedule rejected: {}",
                err
            );
        }
        result
    }

    fn check<T: Scheduled>(&self, installments: &[T], context: &ValidationContext) -> Result<()> {
        self.check_minimum_amounts(installments)?;

        if context.is_manual() {
            self.check_tier_cap(installments.len(), context.remaining)?;

            if installments.is_empty() {
                return Err(ScheduleError::EmptySchedule);
            }

            let scheduled: Money = installments.iter().map(Scheduled::amount).sum();
            if scheduled != context.remaining {
                return Err(ScheduleError::AmountMismatch {
                    expected: context.remaining,
                    scheduled,
                });
            }
        }

        let dates = future_dates(installments, context.today)?;

        for (index, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ScheduleError::DatesNotIncreasing { index: index + 1 });
            }
        }

        if context.is_manual() {
            let maximum = self.rules.max_manual_gap_days;
            for (index, pair) in dates.windows(2).enumerate() {
                let days = (pair[1] - pair[0]).num_days();
                if days > i64::from(maximum) {
                    return Err(ScheduleError::GapTooLarge {
                        index: index + 1,
                        days,
                        maximum,
                    });
                }
            }
        }

        Ok(())
    }

    fn check_minimum_amounts<T: Scheduled>(&self, installments: &[T]) -> Result<()> {
        let minimum = self.rules.minimum_installment;
        match installments.iter().position(|i| i.amount() < minimum) {
            Some(index) => Err(ScheduleError::BelowMinimumAmount {
                index,
                minimum,
                amount: installments[index].amount(),
            }),
            None => Ok(()),
        }
    }

    fn check_tier_cap(&self, count: usize, remaining: Money) -> Result<()> {
        match self.rules.max_installments(remaining) {
            Some(maximum) if count > maximum as usize => Err(ScheduleError::TooManyInstallments {
                count,
                maximum,
                remaining,
            }),
            _ => Ok(()),
        }
    }
}

/// every date present and strictly after today
fn future_dates<T: Scheduled>(installments: &[T], today: NaiveDate) -> Result<Vec<NaiveDate>> {
    installments
        .iter()
        .enumerate()
        .map(|(index, installment)| match installment.due_date() {
            Some(date) if date > today => Ok(date),
            _ => Err(ScheduleError::InvalidOrPastDate { index }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn entry(days_ahead: i64, amount: i64) -> ManualEntry {
        ManualEntry::on(today() + Duration::days(days_ahead), Money::from_major(amount))
    }

    fn validate_manual(entries: &[ManualEntry], remaining: i64) -> Result<()> {
        let rules = PlanRules::standard();
        ScheduleValidator::new(&rules).validate(
            entries,
            &ValidationContext::manual(Money::from_major(remaining), today()),
        )
    }

    #[test]
    fn test_valid_manual_schedule() {
        let entries = vec![entry(10, 100), entry(45, 100), entry(80, 50)];
        assert!(validate_manual(&entries, 250).is_ok());
    }

    #[test]
    fn test_below_minimum_reports_index() {
        let entries = vec![entry(10, 100), entry(20, 15)];
        match validate_manual(&entries, 115) {
            Err(ScheduleError::BelowMinimumAmount { index, amount, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(amount, Money::from_major(15));
            }
            other => panic!("expected BelowMinimumAmount, got {:?}", other),
        }

        // single row below minimum
        assert!(matches!(
            validate_manual(&[entry(10, 15)], 15),
            Err(ScheduleError::BelowMinimumAmount { index: 0, .. })
        ));
    }

    #[test]
    fn test_minimum_checked_before_everything_else() {
        // past date and wrong total, but the amount rule fires first
        let entries = vec![entry(-5, 10)];
        assert!(matches!(
            validate_manual(&entries, 999),
            Err(ScheduleError::BelowMinimumAmount { .. })
        ));
    }

    #[test]
    fn test_tier_cap() {
        // 13 installments summing to 400 000
        let mut entries: Vec<ManualEntry> = (1..=12).map(|i| entry(i * 30, 30_000)).collect();
        entries.push(entry(13 * 30, 40_000));
        assert!(matches!(
            validate_manual(&entries, 400_000),
            Err(ScheduleError::TooManyInstallments { count: 13, maximum: 12, .. })
        ));

        // 12 is fine
        let mut entries: Vec<ManualEntry> = (1..=11).map(|i| entry(i * 30, 30_000)).collect();
        entries.push(entry(12 * 30, 70_000));
        assert!(validate_manual(&entries, 400_000).is_ok());
    }

    #[test]
    fn test_second_tier_and_unbounded() {
        let rows = |count: i64, each: i64| -> Vec<ManualEntry> {
            (1..=count).map(|i| entry(i * 30, each)).collect()
        };

        assert!(validate_manual(&rows(24, 40_000), 960_000).is_ok());
        assert!(matches!(
            validate_manual(&rows(25, 40_000), 1_000_000),
            Err(ScheduleError::TooManyInstallments { maximum: 24, .. })
        ));
        assert!(validate_manual(&rows(30, 40_000), 1_200_000).is_ok());
    }

    #[test]
    fn test_empty_manual_schedule() {
        assert!(matches!(
            validate_manual(&[], 100),
            Err(ScheduleError::EmptySchedule)
        ));
    }

    #[test]
    fn test_amount_mismatch_is_exact() {
        let entries = vec![
            ManualEntry::on(today() + Duration::days(10), Money::from_str_exact("50.001").unwrap()),
            entry(20, 50),
        ];
        match validate_manual(&entries, 100) {
            Err(ScheduleError::AmountMismatch { expected, scheduled }) => {
                assert_eq!(expected, Money::from_major(100));
                assert_eq!(scheduled, Money::from_str_exact("100.001").unwrap());
            }
            other => panic!("expected AmountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_or_past_dates() {
        let missing = ManualEntry { date: None, amount: Money::from_major(50) };
        let garbage = ManualEntry::new("soon", Money::from_major(50));

        assert!(matches!(
            validate_manual(&[entry(10, 50), missing], 100),
            Err(ScheduleError::InvalidOrPastDate { index: 1 })
        ));
        assert!(matches!(
            validate_manual(&[garbage, entry(10, 50)], 100),
            Err(ScheduleError::InvalidOrPastDate { index: 0 })
        ));
        // today itself is not in the future
        assert!(matches!(
            validate_manual(&[entry(0, 100)], 100),
            Err(ScheduleError::InvalidOrPastDate { index: 0 })
        ));
    }

    #[test]
    fn test_past_date_reported_before_ordering() {
        let entries = vec![entry(20, 50), entry(10, 25), entry(-1, 25)];
        assert!(matches!(
            validate_manual(&entries, 100),
            Err(ScheduleError::InvalidOrPastDate { index: 2 })
        ));
    }

    #[test]
    fn test_dates_not_increasing() {
        let entries = vec![entry(20, 100), entry(10, 100)];
        assert!(matches!(
            validate_manual(&entries, 200),
            Err(ScheduleError::DatesNotIncreasing { index: 1 })
        ));

        let same_day = vec![entry(20, 100), entry(20, 100)];
        assert!(matches!(
            validate_manual(&same_day, 200),
            Err(ScheduleError::DatesNotIncreasing { index: 1 })
        ));
    }

    #[test]
    fn test_gap_rule() {
        let too_far = vec![entry(5, 100), entry(50, 100)];
        match validate_manual(&too_far, 200) {
            Err(ScheduleError::GapTooLarge { index, days, maximum }) => {
                assert_eq!(index, 1);
                assert_eq!(days, 45);
                assert_eq!(maximum, 40);
            }
            other => panic!("expected GapTooLarge, got {:?}", other),
        }

        let at_limit = vec![entry(5, 100), entry(45, 100)];
        assert!(validate_manual(&at_limit, 200).is_ok());
    }

    #[test]
    fn test_generated_context_skips_manual_rules() {
        let rules = PlanRules::standard();
        let validator = ScheduleValidator::new(&rules);
        let installments: Vec<Installment> = (1..=30)
            .map(|i| Installment::new(today() + Duration::days(i * 60), Money::from_major(100)))
            .collect();

        // over the tier cap, 60-day gaps and a total unrelated to `remaining`
        let context = ValidationContext::generated(Money::from_major(1), today());
        assert!(validator.validate(&installments, &context).is_ok());

        let empty: Vec<Installment> = Vec::new();
        assert!(validator.validate(&empty, &context).is_ok());
    }

    #[test]
    fn test_generated_context_still_checks_floor_and_dates() {
        let rules = PlanRules::standard();
        let validator = ScheduleValidator::new(&rules);
        let context = ValidationContext::generated(Money::from_major(110), today());

        let low_tail = vec![
            Installment::new(today() + Duration::days(30), Money::from_major(100)),
            Installment::new(today() + Duration::days(60), Money::from_major(10)),
        ];
        assert!(matches!(
            validator.validate(&low_tail, &context),
            Err(ScheduleError::BelowMinimumAmount { index: 1, .. })
        ));

        let backwards = vec![
            Installment::new(today() + Duration::days(60), Money::from_major(55)),
            Installment::new(today() + Duration::days(30), Money::from_major(55)),
        ];
        assert!(matches!(
            validator.validate(&backwards, &context),
            Err(ScheduleError::DatesNotIncreasing { index: 1 })
        ));
    }
}
