/// request payloads for persisting a payment plan in the back office
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::plan::PaymentPlan;
use crate::types::{PlanId, DATE_FORMAT};

/// "create payment plan" request: the plan record followed by its installments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentPlanRequest {
    pub plan: PlanRecord,
    pub installments: Vec<InstallmentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: PlanId,
    /// 3-decimal string, e.g. `1000.000`
    pub total_amount: String,
    pub installment_count: usize,
    pub invoice_ids: Vec<String>,
    pub has_upfront: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentRecord {
    pub plan_id: PlanId,
    /// ISO-8601 date
    pub due_date: String,
    pub amount_due: String,
    pub amount_paid: String,
    pub paid: bool,
    pub locked: bool,
}

impl InstallmentRecord {
    fn unpaid(plan_id: PlanId, due_date: NaiveDate, amount: Money) -> Self {
        Self {
            plan_id,
            due_date: due_date.format(DATE_FORMAT).to_string(),
            amount_due: amount.to_fixed(),
            amount_paid: Money::ZERO.to_fixed(),
            paid: false,
            locked: false,
        }
    }
}

impl CreatePaymentPlanRequest {
    pub fn from_plan(plan: &PaymentPlan) -> Self {
        let installments = plan
            .all_installments()
            .map(|i| InstallmentRecord::unpaid(plan.id, i.due_date, i.amount))
            .collect();

        Self {
            plan: PlanRecord {
                id: plan.id,
                total_amount: plan.outstanding.to_fixed(),
                installment_count: plan.installment_count(),
                invoice_ids: plan.invoice_ids.clone(),
                has_upfront: plan.has_upfront(),
            },
            installments,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&PaymentPlan> for CreatePaymentPlanRequest {
    fn from(plan: &PaymentPlan) -> Self {
        Self::from_plan(plan)
    }
}
