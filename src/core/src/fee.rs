//! Conservative fee estimation for batch transactions.

/// Smallest-unit cost of one fee step (0.01 of the native coin).
pub const FEE_STEP_UNITS: u128 = 10_000_000;

/// Number of recipients covered by one fee step.
pub const RECIPIENTS_PER_STEP: usize = 10;

/// Estimates the fee for a batch with `recipient_count` recipients, in
/// smallest units of the native coin.
///
/// The ledger prices one transaction sub-linearly in its instruction count,
/// so the estimate grows in steps of one fee unit per ten recipients rather
/// than per recipient, with a floor of one fee unit.
pub fn estimate_fee(recipient_count: usize) -> u128 {
    let steps = (recipient_count + RECIPIENTS_PER_STEP - 1) / RECIPIENTS_PER_STEP;
    steps.max(1) as u128 * FEE_STEP_UNITS
}
