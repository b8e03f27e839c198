use serde::{Deserialize, Serialize};

use super::bands::{band_for, BandKind};
use super::money::Money;
use crate::error::DomainError;
use crate::rounding::round_half_up;
use crate::scoring::PerformanceScore;

/// Outcome of applying the refund policy to a score and a paid fee.
///
/// Percentages are kept to two decimals and `amount` is derived from the
/// stored `percentage`, so `amount == paid_fee × percentage / 100` holds
/// for the persisted values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundDetermination {
    pub band: BandKind,
    pub score: f64,
    pub paid_fee: Money,
    pub percentage: f64,
    pub amount: Money,
    pub requires_review: bool,
    pub scholarship_bonus_percent: f64,
}

/// Map a performance score and the fee the student paid to a refund.
pub fn resolve_refund(
    score: &PerformanceScore,
    paid_fee: Money,
) -> Result<RefundDetermination, DomainError> {
    if paid_fee.is_negative() {
        return Err(DomainError::NegativeFee(paid_fee));
    }
    let value = score.value;
    let band = band_for(value).ok_or(DomainError::ScoreOutOfRange(value))?;

    let percentage = round_half_up(band.refund_percentage(value), 2);
    let scholarship_bonus_percent = round_half_up(band.scholarship_bonus_percent(value), 2);
    // Amount follows the stored two-decimal percentage, not the raw curve
    // value: 88 on 500.00 pays 446.65 rather than 446.67.
    let amount = paid_fee.percentage(percentage);

    tracing::debug!(
        score = value,
        band = %band.kind,
        percentage,
        amount = %amount,
        requires_review = band.requires_review,
        "resolved refund"
    );

    Ok(RefundDetermination {
        band: band.kind,
        score: value,
        paid_fee,
        percentage,
        amount,
        requires_review: band.requires_review,
        scholarship_bonus_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee() -> Money {
        Money::from_cents(50_000)
    }

    fn resolve(value: f64) -> RefundDetermination {
        resolve_refund(&PerformanceScore::from_value(value), fee()).unwrap()
    }

    #[test]
    fn test_zero_score_refunds_nothing() {
        let result = resolve(0.0);
        assert_eq!(result.percentage, 0.0);
        assert_eq!(result.amount, Money::ZERO);
        assert_eq!(result.amount.to_string(), "0.00");
        assert!(!result.requires_review);
        assert_eq!(result.scholarship_bonus_percent, 0.0);
    }

    #[test]
    fn test_88_is_reviewed_between_80_and_100() {
        let result = resolve(88.0);
        assert!(result.percentage > 80.0 && result.percentage < 100.0);
        assert_eq!(result.percentage, 89.33);
        assert_eq!(result.amount, Money::from_cents(44_665));
        assert!(result.requires_review);
        assert_eq!(result.band, BandKind::Honors);
    }

    #[test]
    fn test_perfect_score() {
        let result = resolve(100.0);
        assert_eq!(result.percentage, 100.0);
        assert_eq!(result.amount.to_string(), "500.00");
        assert_eq!(result.scholarship_bonus_percent, 50.0);
        assert!(result.requires_review);
    }

    #[test]
    fn test_standard_band_is_linear() {
        let result = resolve(42.5);
        assert_eq!(result.percentage, 42.5);
        assert_eq!(result.amount, Money::from_cents(21_250));
        assert!(!result.requires_review);
    }

    #[test]
    fn test_merit_band_auto_accepts() {
        let result = resolve(75.0);
        assert_eq!(result.band, BandKind::Merit);
        assert!(!result.requires_review);
        assert!(result.percentage > 50.0 && result.percentage < 80.0);
    }

    #[test]
    fn test_percentages_are_monotonic() {
        let mut previous = -1.0;
        for tenths in 0..=1000 {
            let result = resolve(tenths as f64 / 10.0);
            assert!(result.percentage >= previous, "dropped at {}", tenths);
            previous = result.percentage;
        }
    }

    #[test]
    fn test_amount_matches_percentage() {
        for value in [12.3, 55.5, 83.7, 97.1] {
            let result = resolve(value);
            assert_eq!(result.amount, fee().percentage(result.percentage));
        }
    }

    #[test]
    fn test_amount_rounds_half_up() {
        // 42.5% of 0.01 = 0.425 cents
        let result =
            resolve_refund(&PerformanceScore::from_value(42.5), Money::from_cents(1)).unwrap();
        assert_eq!(result.amount, Money::ZERO);
        // 50% of 0.01 = 0.5 cents
        let result =
            resolve_refund(&PerformanceScore::from_value(50.0), Money::from_cents(1)).unwrap();
        assert_eq!(result.amount, Money::from_cents(1));
    }

    #[test]
    fn test_zero_fee() {
        let result = resolve_refund(&PerformanceScore::from_value(90.0), Money::ZERO).unwrap();
        assert_eq!(result.amount, Money::ZERO);
        assert!(result.requires_review);
    }

    #[test]
    fn test_out_of_range_score() {
        for value in [-0.1, 100.1, f64::NAN] {
            let err = resolve_refund(&PerformanceScore::from_value(value), fee()).unwrap_err();
            assert!(matches!(err, DomainError::ScoreOutOfRange(_)));
        }
    }

    #[test]
    fn test_negative_fee() {
        let err = resolve_refund(&PerformanceScore::from_value(50.0), Money::from_cents(-1))
            .unwrap_err();
        assert_eq!(err, DomainError::NegativeFee(Money::from_cents(-1)));
    }
}
