//! Fee estimate command for the CLI.

use multisend_core::amount::format_units;
use multisend_core::estimate_fee;
use multisend_core::types::NATIVE_DECIMALS;

/// Runs the estimate command, returning the fee as a native decimal string.
pub fn run(recipient_count: usize) -> String {
    format_units(estimate_fee(recipient_count), NATIVE_DECIMALS)
}
