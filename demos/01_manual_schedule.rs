/// manual schedule - hand-entered installments checked against plan rules
use payment_plan_rs::{
    ManualEntry, ManualScheduleDraft, Money, PaymentPlan, PlanRules, SafeTimeProvider, TimeSource,
};
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== manual schedule ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));

    let mut draft = ManualScheduleDraft::new(
        Money::from_major(2_500),
        Money::from_major(500),
        PlanRules::standard(),
    )?;
    println!("to schedule: {}", draft.remaining());
    println!("max installments: {:?}", draft.max_installments());

    draft.push(ManualEntry::new("2024-01-20", Money::from_major(800)));
    draft.push(ManualEntry::new("2024-03-15", Money::from_major(700)));
    println!("left to allocate: {}", draft.left_to_allocate());

    // 500 is still unallocated, and the rows are 55 days apart
    if let Err(err) = draft.check(&time) {
        println!("rejected ({}): {}", err.code(), err);
    }

    draft.remove(1);
    draft.push(ManualEntry::new("2024-02-25", Money::from_major(700)));
    draft.push(ManualEntry::new("2024-04-01", Money::from_major(500)));
    draft.check(&time)?;
    println!("draft accepted\n");

    let plan = PaymentPlan::builder()
        .outstanding(Money::from_major(2_500))
        .upfront(Money::from_major(500))
        .strategy(draft.into_strategy())
        .invoices(["INV-2024-0107", "INV-2024-0112"])
        .set_time(&time)
        .build()?;

    for installment in plan.all_installments() {
        println!("{}  {}", installment.due_date, installment.amount.to_fixed());
    }

    Ok(())
}
