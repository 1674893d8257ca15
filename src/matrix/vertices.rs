use std::collections::{BTreeSet, HashMap};

use crate::model::{Account, TransferStep};

use super::FlowMatrixError;

/// Canonical vertex ordering for a flow matrix.
///
/// Vertices are the union of source, sink and every `from`, `to` and
/// `asset_owner` in the transfers, sorted by ascending numeric address.
/// Accounts are byte values, so differently-cased inputs already collapse
/// to one vertex. The result only depends on the set of accounts, never on
/// the order they were encountered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexIndex {
    vertices: Vec<Account>,
    positions: HashMap<Account, usize>,
}

impl VertexIndex {
    pub fn new(source: Account, sink: Account, transfers: &[TransferStep]) -> Self {
        let unique: BTreeSet<Account> = [source, sink]
            .into_iter()
            .chain(
                transfers
                    .iter()
                    .flat_map(|t| [t.from, t.to, t.asset_owner]),
            )
            .collect();

        let vertices: Vec<Account> = unique.into_iter().collect();
        let positions = vertices
            .iter()
            .enumerate()
            .map(|(i, account)| (*account, i))
            .collect();

        VertexIndex {
            vertices,
            positions,
        }
    }

    pub fn vertices(&self) -> &[Account] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Account> {
        self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Position of `account` in the sorted vertex list.
    pub fn position(&self, account: &Account) -> Option<usize> {
        self.positions.get(account).copied()
    }

    /// Position of `account` as a 16-bit coordinate.
    pub fn coordinate(&self, account: &Account) -> Result<u16, FlowMatrixError> {
        let position = self
            .position(account)
            .ok_or(FlowMatrixError::UnknownVertex { account: *account })?;
        u16::try_from(position).map_err(|_| FlowMatrixError::CoordinateOverflow {
            coordinate: position,
        })
    }
}
