use std::collections::HashMap;

use tracing::debug;

use crate::model::{Account, TransferPath, TransferStep};

/// Wrapper contract -> owner of the underlying asset.
pub type WrappedTokenMap = HashMap<Account, Account>;

/// Replace every wrapped asset owner with its underlying owner.
///
/// Only `asset_owner` changes; senders, recipients, values and `max_flow`
/// are carried over as-is.
pub fn substitute_wrapped(path: &TransferPath, wrapped: &WrappedTokenMap) -> TransferPath {
    let mut replaced = 0usize;
    let transfers = path
        .transfers
        .iter()
        .map(|t| match wrapped.get(&t.asset_owner) {
            Some(underlying) => {
                replaced += 1;
                TransferStep {
                    asset_owner: *underlying,
                    ..t.clone()
                }
            }
            None => t.clone(),
        })
        .collect();

    debug!(replaced, "substituted wrapped asset owners");

    TransferPath {
        max_flow: path.max_flow,
        transfers,
    }
}
