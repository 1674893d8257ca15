use alloy::primitives::U256;
use tracing::debug;

use crate::model::{Account, TransferPath, TransferStep};

use super::TransformError;

/// Retained fractions are expressed in parts per trillion.
pub const PPT_DENOMINATOR: u64 = 1_000_000_000_000;

/// Share of a path to keep, as `ppt / PPT_DENOMINATOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RetainedFraction {
    ppt: u64,
}

impl RetainedFraction {
    pub fn from_ppt(ppt: u64) -> Result<Self, TransformError> {
        if ppt == 0 || ppt > PPT_DENOMINATOR {
            return Err(TransformError::FractionOutOfRange { ppt });
        }
        Ok(RetainedFraction { ppt })
    }

    /// Convert a ratio in `(0.0, 1.0]`, rounding down to whole ppt.
    pub fn from_ratio(ratio: f64) -> Result<Self, TransformError> {
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(TransformError::InvalidRatio { ratio });
        }
        let ppt = (ratio * PPT_DENOMINATOR as f64).floor() as u64;
        Self::from_ppt(ppt)
    }

    pub fn full() -> Self {
        RetainedFraction {
            ppt: PPT_DENOMINATOR,
        }
    }

    pub fn ppt(&self) -> u64 {
        self.ppt
    }

    /// `floor(value * ppt / PPT_DENOMINATOR)`.
    pub fn apply(&self, value: U256) -> Result<U256, TransformError> {
        let scaled = value
            .checked_mul(U256::from(self.ppt))
            .ok_or(TransformError::AmountOverflow { value })?;
        Ok(scaled / U256::from(PPT_DENOMINATOR))
    }
}

/// Scale every transfer down to `retained`, dropping transfers that round
/// to zero, and recompute `max_flow` as the shrunk inflow to `sink`.
pub fn shrink_path(
    path: &TransferPath,
    sink: Account,
    retained: RetainedFraction,
) -> Result<TransferPath, TransformError> {
    let mut transfers = Vec::with_capacity(path.transfers.len());
    for t in &path.transfers {
        let value = retained.apply(t.value)?;
        if value.is_zero() {
            continue;
        }
        transfers.push(TransferStep { value, ..t.clone() });
    }

    let dropped = path.transfers.len() - transfers.len();
    let shrunk = TransferPath {
        max_flow: U256::ZERO,
        transfers,
    };
    let max_flow = shrunk.inflow_to(sink);

    debug!(
        ppt = retained.ppt(),
        dropped,
        original = %path.max_flow,
        %max_flow,
        "shrunk transfer path"
    );

    Ok(TransferPath { max_flow, ..shrunk })
}
