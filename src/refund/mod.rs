pub mod bands;
pub mod money;
pub mod resolver;

pub use bands::{band_for, BandKind, Curve, RefundBand, REFUND_BANDS};
pub use money::Money;
pub use resolver::{resolve_refund, RefundDetermination};
