//! Coin-unit decimal helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits in the smallest tradable unit
pub const COIN_PRECISION: u32 = 8;

/// Quantize a decimal to the coin unit (8 fractional digits)
///
/// Rounds half to even and always keeps exactly eight fractional digits,
/// so `1` becomes `1.00000000` on the wire.
pub fn quantize_coin(value: Decimal) -> Decimal {
    quantize(value, COIN_PRECISION)
}

/// Quantize a decimal to `dp` fractional digits, padding with zeros
pub fn quantize(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(dp);
    rounded
}
