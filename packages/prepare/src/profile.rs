//! Synthetic daily curves.

use std::f64::consts::TAU;

/// Swing of the traffic curve, as a fraction of the daily figure.
pub const TRAFFIC_AMPLITUDE: f64 = 0.6;
/// Swing of the rail ridership curve.
pub const RAIL_AMPLITUDE: f64 = 0.7;
/// Swing of the bus ridership curve.
pub const BUS_AMPLITUDE: f64 = 0.5;

/// Hour at which the curve crosses its mean on the way up.
const RISING_HOUR: f64 = 7.0;

/// Spreads a daily figure over 24 hours along a sine wave.
///
/// Hour `h` gets `daily / 24 + amplitude * daily * sin((h - 7) / 24 * 2π)`,
/// truncated toward zero and floored at 0.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn hourly_profile(daily: f64, amplitude: f64) -> Vec<u64> {
    (0..24u8)
        .map(|h| {
            let phase = (f64::from(h) - RISING_HOUR) / 24.0 * TAU;
            to_count(daily / 24.0 + amplitude * daily * phase.sin())
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_peaks_at_one_pm_and_bottoms_out_overnight() {
        let hourly = hourly_profile(2400.0, TRAFFIC_AMPLITUDE);
        assert_eq!(hourly.len(), 24);
        assert_eq!(hourly[7], 100);
        assert_eq!(hourly[13], 1540);
        assert_eq!(hourly[1], 0);
        assert_eq!(hourly.iter().max(), Some(&1540));
    }

    #[test]
    fn small_figures_floor_at_zero() {
        let hourly = hourly_profile(10.0, BUS_AMPLITUDE);
        assert!(hourly.iter().all(|&v| v <= 5));
        assert_eq!(hourly[1], 0);
        assert_eq!(hourly[13], 5);
    }

    #[test]
    fn zero_daily_gives_all_zeros() {
        assert_eq!(hourly_profile(0.0, RAIL_AMPLITUDE), vec![0; 24]);
    }
}
