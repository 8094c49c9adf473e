/// plan request - json payload for the back office
use payment_plan_rs::{
    CreatePaymentPlanRequest, PaymentPlan, SafeTimeProvider, SplitStrategy, TimeSource,
};
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));

    // strategy as received from the ui
    let strategy: SplitStrategy = serde_json::from_str(r#"{"kind":"amount","a":"300"}"#)?;

    let plan = PaymentPlan::builder()
        .outstanding("1000".parse()?)
        .strategy(strategy)
        .invoice("INV-2024-0042")
        .set_time(&time)
        .build()?;

    let request = CreatePaymentPlanRequest::from_plan(&plan);
    println!("{}", request.to_json_pretty()?);

    Ok(())
}
