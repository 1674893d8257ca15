mod coordinates;
mod vertices;

use alloy::primitives::{Bytes, U256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::matrix::{INTERMEDIATE_STREAM_SINK_ID, TERMINAL_STREAM_SINK_ID};
use crate::model::{Account, FlowEdge, FlowMatrix, Stream, TransferPath, TransferStep};

pub use coordinates::{pack_coordinates, unpack_coordinates};
pub use vertices::VertexIndex;

/// Number of distinct values a 16-bit coordinate or edge id can take.
pub const MAX_COORDINATES: usize = u16::MAX as usize + 1;

/// Flow edge amounts are `uint192` on-chain.
pub const FLOW_EDGE_AMOUNT_BITS: usize = 192;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowMatrixError {
    #[error("Transfer path has no transfers")]
    EmptyPath,

    #[error("{vertices} distinct vertices exceed the 16-bit coordinate space")]
    VertexOverflow { vertices: usize },

    #[error("Coordinate {coordinate} does not fit in 16 bits")]
    CoordinateOverflow { coordinate: usize },

    #[error("{edges} flow edges exceed the 16-bit edge id space")]
    TooManyEdges { edges: usize },

    #[error("Flow edge {edge} amount {amount} does not fit in 192 bits")]
    AmountOverflow { edge: usize, amount: U256 },

    #[error("Account {account} is not a flow vertex")]
    UnknownVertex { account: Account },

    #[error("Packed coordinates have odd length {len}")]
    MalformedCoordinates { len: usize },

    #[error("Flow matrix mismatch: terminal edges sum to {terminal_sum}, expected {expected}")]
    Mismatch { terminal_sum: U256, expected: U256 },
}

/// Build the flow matrix for `transfers` from `source` to `sink`.
///
/// Edges whose recipient is `sink` are terminal. If none are, the last
/// transfer into `sink` is promoted, or failing that the last edge of the
/// path. The terminal amounts must add up to `target` exactly.
pub fn build(
    source: Account,
    sink: Account,
    target: U256,
    transfers: &[TransferStep],
) -> Result<FlowMatrix, FlowMatrixError> {
    if transfers.is_empty() {
        return Err(FlowMatrixError::EmptyPath);
    }
    if transfers.len() > MAX_COORDINATES {
        return Err(FlowMatrixError::TooManyEdges {
            edges: transfers.len(),
        });
    }

    let index = VertexIndex::new(source, sink, transfers);
    if index.len() > MAX_COORDINATES {
        return Err(FlowMatrixError::VertexOverflow {
            vertices: index.len(),
        });
    }

    let mut flow_edges = transfers
        .iter()
        .enumerate()
        .map(|(edge, step)| {
            if step.value.bit_len() > FLOW_EDGE_AMOUNT_BITS {
                return Err(FlowMatrixError::AmountOverflow {
                    edge,
                    amount: step.value,
                });
            }
            let stream_sink_id = if step.to == sink {
                TERMINAL_STREAM_SINK_ID
            } else {
                INTERMEDIATE_STREAM_SINK_ID
            };
            Ok(FlowEdge {
                stream_sink_id,
                amount: step.value,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !flow_edges.iter().any(FlowEdge::is_terminal) {
        let promoted = transfers
            .iter()
            .rposition(|t| t.to == sink)
            .unwrap_or(flow_edges.len() - 1);
        warn!(
            edge = promoted,
            %sink,
            "no transfer delivers to the sink, promoting edge to terminal"
        );
        flow_edges[promoted].stream_sink_id = TERMINAL_STREAM_SINK_ID;
    }

    // Bounded by MAX_COORDINATES above, so the casts cannot truncate.
    let flow_edge_ids: Vec<u16> = flow_edges
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_terminal())
        .map(|(i, _)| i as u16)
        .collect();

    let source_coordinate = index.coordinate(&source)?;
    let stream = Stream {
        source_coordinate,
        flow_edge_ids,
        data: Bytes::new(),
    };

    let mut coordinates = Vec::with_capacity(transfers.len() * 3);
    for step in transfers {
        for account in [&step.asset_owner, &step.from, &step.to] {
            let position = index
                .position(account)
                .ok_or(FlowMatrixError::UnknownVertex { account: *account })?;
            coordinates.push(position);
        }
    }
    let packed_coordinates = pack_coordinates(&coordinates)?;

    let terminal_sum = flow_edges
        .iter()
        .filter(|e| e.is_terminal())
        .fold(U256::ZERO, |acc, e| acc + e.amount);
    if terminal_sum != target {
        return Err(FlowMatrixError::Mismatch {
            terminal_sum,
            expected: target,
        });
    }

    debug!(
        vertices = index.len(),
        edges = flow_edges.len(),
        terminal_edges = stream.flow_edge_ids.len(),
        %terminal_sum,
        "built flow matrix"
    );

    Ok(FlowMatrix {
        flow_vertices: index.into_vertices(),
        flow_edges,
        streams: vec![stream],
        packed_coordinates,
        source_coordinate,
    })
}

/// Build the flow matrix for a whole path, targeting its `max_flow`.
pub fn build_from_path(
    path: &TransferPath,
    source: Account,
    sink: Account,
) -> Result<FlowMatrix, FlowMatrixError> {
    build(source, sink, path.max_flow, &path.transfers)
}
