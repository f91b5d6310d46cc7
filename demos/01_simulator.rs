/// the kpr form: every edit recomputes the estimate
use property_kpr_rs::{KprSimulator, LoanField, Money, SimulationOutcome, SimulatorConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // opened from a listing, price prefilled
    let mut sim = KprSimulator::for_listing(SimulatorConfig::standard(), Money::from_major(850_000_000))?;
    println!("price: Rp {}", sim.price_display());

    sim.set_down_payment_percent("20");
    println!("down payment: Rp {} ({}%)", sim.down_payment_display(), sim.down_payment_percent_display());

    sim.set_term("15");
    sim.set_rate("6,5");

    if let Some(summary) = sim.summary() {
        println!("installment:    {} / month", summary.monthly_payment);
        println!("plafond:        {}", summary.plafond);
        println!("rate:           {}", summary.rate_label);
        println!("total interest: {}", summary.total_interest);
        println!("total payable:  {}", summary.total_payable);
    }

    // out of range term
    sim.set_term("35");
    if let Some(message) = sim.error_for(LoanField::TermYears) {
        println!("term error: {}", message);
    }

    // paying everything up front leaves nothing to finance
    sim.set_term("15");
    sim.set_down_payment_percent("100");
    if let SimulationOutcome::NotComputable = sim.outcome() {
        println!("nothing to finance");
    }

    for event in sim.take_events() {
        println!("{:?}", event);
    }

    Ok(())
}
