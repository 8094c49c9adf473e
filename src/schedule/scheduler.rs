use chrono::{Days, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PlanRules;
use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::schedule::validator::{ScheduleValidator, ValidationContext};
use crate::types::{Installment, ManualEntry, SplitStrategy};

/// computes installment schedules that reconcile exactly with the amount owed
pub struct InstallmentScheduler<'a> {
    rules: &'a PlanRules,
}

impl<'a> InstallmentScheduler<'a> {
    pub fn new(rules: &'a PlanRules) -> Self {
        Self { rules }
    }

    /// compute the regular installments for `outstanding` less `upfront`
    ///
    /// Generated schedules start one period after today and are spaced one
    /// period apart. Manual schedules are validated as entered and returned
    /// unchanged.
    pub fn compute_schedule(
        &self,
        outstanding: Money,
        upfront: Money,
        strategy: &SplitStrategy,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<Installment>> {
        let remaining = self.remaining(outstanding, upfront)?;
        let today = time_provider.now().date_naive();

        let installments = match strategy {
            SplitStrategy::ByCount { n } => self.split_by_count(remaining, *n, today)?,
            SplitStrategy::ByAmount { a } => self.split_by_amount(remaining, *a, today)?,
            SplitStrategy::Manual { items } => self.accept_manual(items, remaining, today)?,
        };

        debug!(
            kind = ?strategy.kind(),
            %outstanding,
            %upfront,
            count = installments.len(),
            "schedule computed"
        );

        Ok(installments)
    }

    /// outstanding amount left after the upfront payment
    pub fn remaining(&self, outstanding: Money, upfront: Money) -> Result<Money> {
        if !outstanding.is_positive() {
            return Err(ScheduleError::invalid_parameter(format!(
                "outstanding amount must be positive, got {}",
                outstanding
            )));
        }

        if upfront.is_negative() || upfront > outstanding {
            return Err(ScheduleError::invalid_parameter(format!(
                "upfront payment {} outside 0..={}",
                upfront, outstanding
            )));
        }

        if upfront.is_positive() && upfront < self.rules.minimum_upfront {
            return Err(ScheduleError::invalid_parameter(format!(
                "upfront payment {} below minimum {}",
                upfront, self.rules.minimum_upfront
            )));
        }

        Ok(outstanding - upfront)
    }

    /// `n` equal installments, the last one carrying the rounding remainder
    fn split_by_count(
        &self,
        remaining: Money,
        n: i64,
        today: NaiveDate,
    ) -> Result<Vec<Installment>> {
        if n <= 0 {
            return Err(ScheduleError::invalid_parameter(format!(
                "installment count must be positive, got {}",
                n
            )));
        }
        let n = u32::try_from(n).map_err(|_| {
            ScheduleError::invalid_parameter(format!("installment count {} is too large", n))
        })?;
        ensure_something_remains(remaining)?;
        self.ensure_dates_fit(today, n)?;

        let count = Decimal::from(n);
        let base = remaining / count;
        let mut installments = (1..=n)
            .map(|number| Ok(Installment::new(self.due_date(today, number)?, base)))
            .collect::<Result<Vec<Installment>>>()?;

        // signed remainder, e.g. 100 / 3 leaves +0.001 and 200 / 3 leaves -0.001
        let correction = remaining - base * count;
        if let Some(last) = installments.last_mut() {
            last.amount += correction;
        }

        Ok(installments)
    }

    /// installments of `amount`, with a smaller final one for what is left
    fn split_by_amount(
        &self,
        remaining: Money,
        amount: Money,
        today: NaiveDate,
    ) -> Result<Vec<Installment>> {
        if !amount.is_positive() {
            return Err(ScheduleError::invalid_parameter(format!(
                "installment amount must be positive, got {}",
                amount
            )));
        }
        ensure_something_remains(remaining)?;

        let too_many = || {
            ScheduleError::invalid_parameter(format!(
                "installment amount {} yields too many installments for {}",
                amount, remaining
            ))
        };
        let (full, remainder) = remaining.div_rem(amount).ok_or_else(too_many)?;
        let count = if remainder.is_positive() {
            full.checked_add(1).ok_or_else(too_many)?
        } else {
            full
        };
        self.ensure_dates_fit(today, count)?;

        let mut installments = (1..=full)
            .map(|number| Ok(Installment::new(self.due_date(today, number)?, amount)))
            .collect::<Result<Vec<Installment>>>()?;

        if remainder.is_positive() {
            installments.push(Installment::new(self.due_date(today, count)?, remainder));
        }

        Ok(installments)
    }

    fn accept_manual(
        &self,
        items: &[ManualEntry],
        remaining: Money,
        today: NaiveDate,
    ) -> Result<Vec<Installment>> {
        ScheduleValidator::new(self.rules)
            .validate(items, &ValidationContext::manual(remaining, today))?;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.due_date()
                    .map(|date| Installment::new(date, item.amount))
                    .ok_or(ScheduleError::InvalidOrPastDate { index })
            })
            .collect()
    }

    /// the last of `count` generated dates must be representable
    fn ensure_dates_fit(&self, today: NaiveDate, count: u32) -> Result<()> {
        self.due_date(today, count).map(|_| ())
    }

    fn due_date(&self, today: NaiveDate, number: u32) -> Result<NaiveDate> {
        let days = u64::from(self.rules.period_days) * u64::from(number);
        today.checked_add_days(Days::new(days)).ok_or_else(|| {
            ScheduleError::invalid_parameter(format!(
                "installment {} falls {} days after {}, beyond the supported calendar",
                number, days, today
            ))
        })
    }
}

fn ensure_something_remains(remaining: Money) -> Result<()> {
    if remaining.is_positive() {
        Ok(())
    } else {
        Err(ScheduleError::invalid_parameter(
            "upfront payment covers the full amount, nothing left to split",
        ))
    }
}
