//! Rewrites applied to a transfer path before it is turned into a flow matrix.

mod shrink;
mod wrapped;

use alloy::primitives::U256;
use thiserror::Error;

pub use shrink::{PPT_DENOMINATOR, RetainedFraction, shrink_path};
pub use wrapped::{WrappedTokenMap, substitute_wrapped};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    #[error("Retained fraction {ppt} ppt outside valid range 1..={max}", max = PPT_DENOMINATOR)]
    FractionOutOfRange { ppt: u64 },

    #[error("Retained ratio {ratio} outside valid range (0.0, 1.0]")]
    InvalidRatio { ratio: f64 },

    #[error("Scaling value {value} overflows 256 bits")]
    AmountOverflow { value: U256 },
}
