//! Conversion rate in percent, rounded to two decimals.
//!
//! Rounding is half-up on the exact rational `conversions / visits * 100`,
//! done in integer hundredths of a percent so that no binary floating-point
//! tie can land on the wrong side.

/// Upper bound of a rate. Exceeded only when conversions outnumber visits.
pub const MAX_RATE: f64 = 100.0;

/// Rate in percent with two decimals.
///
/// Missing or zero visits give 0. Missing conversions count as 0.
pub fn conversion_rate(conversions: Option<u64>, visits: Option<u64>) -> f64 {
    let visits = match visits {
        Some(v) if v > 0 => v,
        _ => return 0.0,
    };
    let conversions = match conversions {
        Some(c) if c > 0 => c,
        _ => return 0.0,
    };

    if conversions > visits {
        tracing::warn!(conversions, visits, "conversions exceed visits, rate capped");
        return MAX_RATE;
    }

    hundredths(conversions, visits) as f64 / 100.0
}

/// `round_half_up(c / v * 10_000)`.
fn hundredths(conversions: u64, visits: u64) -> u128 {
    let c = conversions as u128;
    let v = visits as u128;
    (20_000 * c + v) / (2 * v)
}
