use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a performance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandKind {
    Standard,
    Merit,
    Honors,
    Scholarship,
}

impl fmt::Display for BandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BandKind::Standard => "standard",
            BandKind::Merit => "merit",
            BandKind::Honors => "honors",
            BandKind::Scholarship => "scholarship",
        };
        f.write_str(name)
    }
}

/// How a percentage moves across a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// Linear from `from` at the band start to `to` at the band end.
    Linear { from: f64, to: f64 },
    Constant(f64),
}

impl Curve {
    /// Value at `position`, where 0.0 is the band start and 1.0 its end.
    pub fn at(&self, position: f64) -> f64 {
        match self {
            Curve::Linear { from, to } => from + (to - from) * position,
            Curve::Constant(v) => *v,
        }
    }
}

/// One row of the refund policy table.
///
/// Bands cover `[start, end)`; a band with `closed_end` also covers `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefundBand {
    pub kind: BandKind,
    pub start: f64,
    pub end: f64,
    pub closed_end: bool,
    pub refund: Curve,
    pub scholarship_bonus: Option<Curve>,
    pub requires_review: bool,
}

impl RefundBand {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.start && (score < self.end || (self.closed_end && score == self.end))
    }

    pub fn position(&self, score: f64) -> f64 {
        ((score - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }

    pub fn refund_percentage(&self, score: f64) -> f64 {
        self.refund.at(self.position(score))
    }

    pub fn scholarship_bonus_percent(&self, score: f64) -> f64 {
        self.scholarship_bonus
            .map(|curve| curve.at(self.position(score)))
            .unwrap_or(0.0)
    }
}

/// The refund policy, checked in order. Bands do not overlap and together
/// cover 0..=100.
pub static REFUND_BANDS: [RefundBand; 4] = [
    RefundBand {
        kind: BandKind::Standard,
        start: 0.0,
        end: 50.0,
        closed_end: false,
        refund: Curve::Linear { from: 0.0, to: 50.0 },
        scholarship_bonus: None,
        requires_review: false,
    },
    RefundBand {
        kind: BandKind::Merit,
        start: 50.0,
        end: 81.0,
        closed_end: false,
        refund: Curve::Linear { from: 50.0, to: 80.0 },
        scholarship_bonus: None,
        requires_review: false,
    },
    RefundBand {
        kind: BandKind::Honors,
        start: 81.0,
        end: 96.0,
        closed_end: false,
        refund: Curve::Linear { from: 80.0, to: 100.0 },
        scholarship_bonus: None,
        requires_review: true,
    },
    RefundBand {
        kind: BandKind::Scholarship,
        start: 96.0,
        end: 100.0,
        closed_end: true,
        refund: Curve::Constant(100.0),
        scholarship_bonus: Some(Curve::Linear { from: 10.0, to: 50.0 }),
        requires_review: true,
    },
];

/// Find the band a score falls in.
pub fn band_for(score: f64) -> Option<&'static RefundBand> {
    REFUND_BANDS.iter().find(|band| band.contains(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_are_contiguous() {
        for pair in REFUND_BANDS.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(REFUND_BANDS[0].start, 0.0);
        assert_eq!(REFUND_BANDS[3].end, 100.0);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(band_for(0.0).unwrap().kind, BandKind::Standard);
        assert_eq!(band_for(49.9).unwrap().kind, BandKind::Standard);
        assert_eq!(band_for(50.0).unwrap().kind, BandKind::Merit);
        assert_eq!(band_for(80.9).unwrap().kind, BandKind::Merit);
        assert_eq!(band_for(81.0).unwrap().kind, BandKind::Honors);
        assert_eq!(band_for(95.9).unwrap().kind, BandKind::Honors);
        assert_eq!(band_for(96.0).unwrap().kind, BandKind::Scholarship);
        assert_eq!(band_for(100.0).unwrap().kind, BandKind::Scholarship);
    }

    #[test]
    fn test_out_of_range_has_no_band() {
        assert!(band_for(-0.1).is_none());
        assert!(band_for(100.1).is_none());
        assert!(band_for(f64::NAN).is_none());
    }

    #[test]
    fn test_standard_band_is_identity() {
        let band = &REFUND_BANDS[0];
        assert_eq!(band.refund_percentage(0.0), 0.0);
        assert_eq!(band.refund_percentage(25.0), 25.0);
        assert!((band.refund_percentage(49.9) - 49.9).abs() < 1e-9);
    }

    #[test]
    fn test_merit_band_interpolates() {
        let band = &REFUND_BANDS[1];
        assert_eq!(band.refund_percentage(50.0), 50.0);
        // Halfway through [50, 81) is 65.5
        assert!((band.refund_percentage(65.5) - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_honors_band_interpolates() {
        let band = &REFUND_BANDS[2];
        assert_eq!(band.refund_percentage(81.0), 80.0);
        assert!((band.refund_percentage(88.5) - 90.0).abs() < 1e-9);
        assert!(band.requires_review);
    }

    #[test]
    fn test_scholarship_band_bonus() {
        let band = &REFUND_BANDS[3];
        assert_eq!(band.refund_percentage(97.0), 100.0);
        assert_eq!(band.scholarship_bonus_percent(96.0), 10.0);
        assert_eq!(band.scholarship_bonus_percent(98.0), 30.0);
        assert_eq!(band.scholarship_bonus_percent(100.0), 50.0);
    }

    #[test]
    fn test_only_top_band_has_bonus() {
        for band in &REFUND_BANDS[..3] {
            assert_eq!(band.scholarship_bonus_percent(band.start), 0.0);
        }
    }
}
