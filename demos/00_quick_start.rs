/// quick start - minimal example to get started
use payment_plan_rs::{Money, PaymentPlan};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1,000 owed, 100 paid today, the rest over 3 installments
    let plan = PaymentPlan::builder()
        .outstanding(Money::from_major(1_000))
        .upfront(Money::from_major(100))
        .by_count(3)
        .invoice("INV-2024-0001")
        .build()?;

    for installment in plan.all_installments() {
        println!("{}  {}", installment.due_date, installment.amount.to_fixed());
    }

    Ok(())
}
