/// month-by-month plan and yearly totals
use chrono::NaiveDate;
use property_kpr_rs::format::format_currency;
use property_kpr_rs::kpr::amortization::interest_share;
use property_kpr_rs::{AmortizationSchedule, LoanInput, Money, SimulatorConfig};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let input = LoanInput::validated(
        Money::from_major(600_000_000),
        Money::from_major(120_000_000),
        5,
        dec!(7.25),
        &SimulatorConfig::standard(),
    )?;
    let start = NaiveDate::from_ymd_opt(2024, 10, 11).ok_or("invalid date")?;
    let schedule = AmortizationSchedule::generate(&input, start)?;

    for payment in schedule.payments.iter().take(3) {
        println!(
            "#{:<3} {}  installment {}  interest {}  balance {}",
            payment.payment_number,
            payment.due_date,
            format_currency(payment.payment_amount),
            format_currency(payment.interest_portion),
            format_currency(payment.ending_balance),
        );
    }

    for year in 1..=schedule.years() {
        if let Some((interest, principal)) = schedule.yearly_totals(year) {
            println!(
                "year {}: interest {}, principal {}",
                year,
                format_currency(interest),
                format_currency(principal)
            );
        }
    }

    println!("total interest: {}", format_currency(schedule.total_interest));
    println!("interest share: {}%", (interest_share(&schedule) * dec!(100)).round_dp(2));

    Ok(())
}
