use alloy::primitives::U256;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Account;

/// One directed value transfer between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferStep {
    /// Sending account.
    #[schemars(with = "String")]
    pub from: Account,
    /// Receiving account.
    #[schemars(with = "String")]
    pub to: Account,
    /// Owner (issuer) of the asset moved along this edge.
    #[serde(alias = "tokenOwner")]
    #[schemars(with = "String")]
    pub asset_owner: Account,
    /// Amount in the smallest indivisible unit, as a decimal string.
    #[serde(with = "super::amount")]
    #[schemars(with = "String")]
    pub value: U256,
}

/// A multi-hop transfer path as returned by the pathfinder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferPath {
    /// Total value the path delivers to its sink, as a decimal string.
    #[serde(with = "super::amount")]
    #[schemars(with = "String")]
    pub max_flow: U256,
    /// Transfer steps in execution order.
    pub transfers: Vec<TransferStep>,
}

impl TransferStep {
    pub fn new(from: Account, to: Account, asset_owner: Account, value: U256) -> Self {
        TransferStep {
            from,
            to,
            asset_owner,
            value,
        }
    }
}

impl TransferPath {
    pub fn new(max_flow: U256, transfers: Vec<TransferStep>) -> Self {
        TransferPath {
            max_flow,
            transfers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Sum of all transfer values whose recipient is `sink`.
    pub fn inflow_to(&self, sink: Account) -> U256 {
        self.transfers
            .iter()
            .filter(|t| t.to == sink)
            .fold(U256::ZERO, |acc, t| acc.saturating_add(t.value))
    }
}
