/// quick start - estimate one kpr installment
use property_kpr_rs::{calculate, LoanInput, Money, SimulatorConfig};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Rp 500 million house, Rp 100 million down, 10 years at 5%
    let input = LoanInput::validated(
        Money::from_major(500_000_000),
        Money::from_major(100_000_000),
        10,
        dec!(5),
        &SimulatorConfig::standard(),
    )?;

    match calculate(&input) {
        Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        None => println!("down payment covers the whole price"),
    }

    Ok(())
}
