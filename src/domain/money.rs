/// Fares are whole rupees. The routes this ledger serves never price below
/// one rupee, so no minor unit is tracked.
pub type Rupees = u64;

/// Format a fare for display.
/// Example: 2500 -> "Rs. 2500"
pub fn format_fare(amount: Rupees) -> String {
    format!("Rs. {}", amount)
}

/// Total fare for `seats` seats at `fare` each, or `None` on overflow.
pub fn total_fare(seats: u32, fare: Rupees) -> Option<Rupees> {
    fare.checked_mul(Rupees::from(seats))
}
