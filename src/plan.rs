use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::PlanRules;
use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::schedule::{InstallmentScheduler, ScheduleValidator, ValidationContext};
use crate::types::{Installment, ManualEntry, PlanId, SplitStrategy, StrategyKind};

/// validated payment plan, ready to hand to the back office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub id: PlanId,
    pub created_at: DateTime<Utc>,
    pub outstanding: Money,
    /// immediate payment due today, tracked apart from the regular installments
    pub upfront: Option<Installment>,
    pub installments: Vec<Installment>,
    pub invoice_ids: Vec<String>,
    pub strategy: StrategyKind,
}

impl PaymentPlan {
    pub fn builder<'a>() -> PaymentPlanBuilder<'a> {
        PaymentPlanBuilder::new()
    }

    pub fn has_upfront(&self) -> bool {
        self.upfront.is_some()
    }

    pub fn upfront_amount(&self) -> Money {
        self.upfront.map(|u| u.amount).unwrap_or(Money::ZERO)
    }

    /// amount spread over the regular installments
    pub fn remaining(&self) -> Money {
        self.outstanding - self.upfront_amount()
    }

    /// sum of the regular installments
    pub fn total_scheduled(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }

    /// regular installments plus the upfront payment, if any
    pub fn installment_count(&self) -> usize {
        self.installments.len() + usize::from(self.has_upfront())
    }

    /// first regular installment due strictly after `date`
    pub fn next_due(&self, date: NaiveDate) -> Option<&Installment> {
        self.installments.iter().find(|i| i.due_date > date)
    }

    /// upfront payment followed by the regular installments
    pub fn all_installments(&self) -> impl Iterator<Item = &Installment> {
        self.upfront.iter().chain(self.installments.iter())
    }
}

/// builder for payment plans
pub struct PaymentPlanBuilder<'a> {
    outstanding: Option<Money>,
    upfront: Option<Money>,
    strategy: Option<SplitStrategy>,
    invoice_ids: Vec<String>,
    rules: Option<PlanRules>,
    time_provider: Option<&'a SafeTimeProvider>,
}

impl<'a> Default for PaymentPlanBuilder<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PaymentPlanBuilder<'a> {
    pub fn new() -> Self {
        Self {
            outstanding: None,
            upfront: None,
            strategy: None,
            invoice_ids: Vec::new(),
            rules: None,
            time_provider: None,
        }
    }

    pub fn set_time(mut self, time: &'a SafeTimeProvider) -> Self {
        self.time_provider = Some(time);
        self
    }

    pub fn outstanding(mut self, amount: Money) -> Self {
        self.outstanding = Some(amount);
        self
    }

    pub fn upfront(mut self, amount: Money) -> Self {
        self.upfront = Some(amount);
        self
    }

    pub fn strategy(mut self, strategy: SplitStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn by_count(self, n: i64) -> Self {
        self.strategy(SplitStrategy::ByCount { n })
    }

    pub fn by_amount(self, a: Money) -> Self {
        self.strategy(SplitStrategy::ByAmount { a })
    }

    pub fn manual(self, items: Vec<ManualEntry>) -> Self {
        self.strategy(SplitStrategy::Manual { items })
    }

    pub fn invoice(mut self, invoice_id: impl Into<String>) -> Self {
        self.invoice_ids.push(invoice_id.into());
        self
    }

    pub fn invoices<I, S>(mut self, invoice_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.invoice_ids.extend(invoice_ids.into_iter().map(Into::into));
        self
    }

    pub fn rules(mut self, rules: PlanRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Build with stored time or system time if not set
    pub fn build(self) -> Result<PaymentPlan> {
        match self.time_provider {
            Some(time) => self.build_with_time(time),
            None => self.build_now(),
        }
    }

    /// Build with system time
    pub fn build_now(self) -> Result<PaymentPlan> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.build_with_time(&time)
    }

    /// Build with explicit time provider
    pub fn build_with_time(self, time_provider: &SafeTimeProvider) -> Result<PaymentPlan> {
        let outstanding = self.outstanding.ok_or(ScheduleError::InvalidConfiguration {
            message: "Outstanding amount required".to_string(),
        })?;

        let strategy = self.strategy.ok_or(ScheduleError::InvalidConfiguration {
            message: "Split strategy required".to_string(),
        })?;

        let rules = self.rules.unwrap_or_default();
        rules.validate()?;

        let upfront_amount = self.upfront.unwrap_or(Money::ZERO);
        let now = time_provider.now();
        let today = now.date_naive();

        let scheduler = InstallmentScheduler::new(&rules);
        let installments = scheduler
            .compute_schedule(outstanding, upfront_amount, &strategy, time_provider)
            .inspect_err(|err| warn!(code = err.code(), "payment plan rejected: {}", err))?;

        if !strategy.is_manual() {
            let remaining = outstanding - upfront_amount;
            ScheduleValidator::new(&rules)
                .validate(&installments, &ValidationContext::generated(remaining, today))
                .inspect_err(|err| warn!(code = err.code(), "payment plan rejected: {}", err))?;
        }

        let upfront = upfront_amount
            .is_positive()
            .then(|| Installment::new(today, upfront_amount));

        let plan = PaymentPlan {
            id: Uuid::new_v4(),
            created_at: now,
            outstanding,
            upfront,
            installments,
            invoice_ids: self.invoice_ids,
            strategy: strategy.kind(),
        };

        debug!(
            plan_id = %plan.id,
            %outstanding,
            installments = plan.installment_count(),
            "payment plan built"
        );

        Ok(plan)
    }
}

/// hand-entered schedule in progress, tracked against the amount to cover
#[derive(Debug, Clone)]
pub struct ManualScheduleDraft {
    remaining: Money,
    rules: PlanRules,
    entries: Vec<ManualEntry>,
}

impl ManualScheduleDraft {
    pub fn new(outstanding: Money, upfront: Money, rules: PlanRules) -> Result<Self> {
        let remaining = InstallmentScheduler::new(&rules).remaining(outstanding, upfront)?;
        Ok(Self {
            remaining,
            rules,
            entries: Vec::new(),
        })
    }

    pub fn push(&mut self, entry: ManualEntry) {
        self.entries.push(entry);
    }

    /// drop the row at `index`, if present
    pub fn remove(&mut self, index: usize) -> Option<ManualEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn entries(&self) -> &[ManualEntry] {
        &self.entries
    }

    pub fn remaining(&self) -> Money {
        self.remaining
    }

    pub fn allocated(&self) -> Money {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// what still has to be spread over rows; negative when over-allocated
    pub fn left_to_allocate(&self) -> Money {
        self.remaining - self.allocated()
    }

    /// tier cap for the remaining amount, `None` if unbounded
    pub fn max_installments(&self) -> Option<u32> {
        self.rules.max_installments(self.remaining)
    }

    pub fn can_add_row(&self) -> bool {
        self.max_installments()
            .map_or(true, |max| self.entries.len() < max as usize)
    }

    /// run the manual rules against the current rows
    pub fn check(&self, time_provider: &SafeTimeProvider) -> Result<()> {
        let context = ValidationContext::manual(self.remaining, time_provider.now().date_naive());
        ScheduleValidator::new(&self.rules).validate(&self.entries, &context)
    }

    pub fn into_strategy(self) -> SplitStrategy {
        SplitStrategy::Manual {
            items: self.entries,
        }
    }
}
