//! Decimal rounding on top of `f64`.
//!
//! Values are first snapped to six decimal places so that binary noise such
//! as `72.45 * 10 == 724.4999999999999` rounds the way the decimal value
//! would.

fn snap(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Round to `places` decimals, ties to even (banker's rounding).
pub fn round_half_even(x: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    snap(x * factor).round_ties_even() / factor
}

/// Round to `places` decimals, ties away from zero.
pub fn round_half_up(x: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    snap(x * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_even_ties() {
        assert_eq!(round_half_even(0.25, 1), 0.2);
        assert_eq!(round_half_even(0.35, 1), 0.4);
        assert_eq!(round_half_even(72.45, 1), 72.4);
        assert_eq!(round_half_even(72.55, 1), 72.6);
        assert_eq!(round_half_even(72.46, 1), 72.5);
    }

    #[test]
    fn test_half_up_ties() {
        assert_eq!(round_half_up(0.125, 2), 0.13);
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert_eq!(round_half_up(1.005, 2), 1.01);
    }

    #[test]
    fn test_whole_numbers_unchanged() {
        assert_eq!(round_half_even(75.0, 1), 75.0);
        assert_eq!(round_half_up(500.0, 2), 500.0);
    }
}
