use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a payment plan
pub type PlanId = Uuid;

/// date format used for due dates on the wire
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// how the remaining amount is split into installments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SplitStrategy {
    /// split into `n` installments
    #[serde(rename = "count")]
    ByCount { n: i64 },
    /// installments of `a` each, the last absorbs what is left
    #[serde(rename = "amount")]
    ByAmount { a: Money },
    /// hand-entered dates and amounts
    Manual { items: Vec<ManualEntry> },
}

impl SplitStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            SplitStrategy::ByCount { .. } => StrategyKind::Count,
            SplitStrategy::ByAmount { .. } => StrategyKind::Amount,
            SplitStrategy::Manual { .. } => StrategyKind::Manual,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, SplitStrategy::Manual { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Count,
    Amount,
    Manual,
}

/// one due date and amount within a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    #[serde(rename = "date")]
    pub due_date: NaiveDate,
    pub amount: Money,
}

impl Installment {
    pub fn new(due_date: NaiveDate, amount: Money) -> Self {
        Self { due_date, amount }
    }
}

/// hand-entered installment row, date not yet checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEntry {
    #[serde(default)]
    pub date: Option<String>,
    pub amount: Money,
}

impl ManualEntry {
    pub fn new(date: impl Into<String>, amount: Money) -> Self {
        Self {
            date: Some(date.into()),
            amount,
        }
    }

    pub fn on(date: NaiveDate, amount: Money) -> Self {
        Self::new(date.format(DATE_FORMAT).to_string(), amount)
    }

    /// parsed due date, `None` when missing or unparsable
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), DATE_FORMAT).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_wire_format() {
        let count: SplitStrategy = serde_json::from_str(r#"{"kind":"count","n":3}"#).unwrap();
        assert_eq!(count, SplitStrategy::ByCount { n: 3 });

        let amount: SplitStrategy =
            serde_json::from_str(r#"{"kind":"amount","a":"300.5"}"#).unwrap();
        assert_eq!(
            amount,
            SplitStrategy::ByAmount { a: Money::from_str_exact("300.5").unwrap() }
        );

        let manual: SplitStrategy = serde_json::from_str(
            r#"{"kind":"manual","items":[{"date":"2024-02-01","amount":"100"},{"amount":"5"}]}"#,
        )
        .unwrap();
        match manual {
            SplitStrategy::Manual { items } => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].due_date(), NaiveDate::from_ymd_opt(2024, 2, 1));
                assert_eq!(items[1].date, None);
            }
            other => panic!("expected manual strategy, got {:?}", other),
        }
    }

    #[test]
    fn test_manual_entry_dates() {
        assert!(ManualEntry::new("2024-13-01", Money::ONE).due_date().is_none());
        assert!(ManualEntry::new("01/02/2024", Money::ONE).due_date().is_none());

        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let entry = ManualEntry::on(date, Money::ONE);
        assert_eq!(entry.date.as_deref(), Some("2024-03-31"));
        assert_eq!(entry.due_date(), Some(date));
    }

    #[test]
    fn test_installment_serializes_iso_date() {
        let installment = Installment::new(
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            Money::from_major(300),
        );
        let json = serde_json::to_value(installment).unwrap();
        assert_eq!(json["date"], "2024-01-31");
        assert_eq!(json["amount"], "300.000");
    }
}
