use alloy::primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};

use super::Account;

/// `streamSinkId` of an edge that delivers value to the stream's sink.
pub const TERMINAL_STREAM_SINK_ID: u16 = 1;
/// `streamSinkId` of an intermediate edge.
pub const INTERMEDIATE_STREAM_SINK_ID: u16 = 0;

/// On-chain flow edge: `(uint16 streamSinkId, uint192 amount)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub stream_sink_id: u16,
    #[serde(with = "super::amount")]
    pub amount: U256,
}

impl FlowEdge {
    pub fn is_terminal(&self) -> bool {
        self.stream_sink_id == TERMINAL_STREAM_SINK_ID
    }
}

/// A group of terminal edges sharing one source vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub source_coordinate: u16,
    pub flow_edge_ids: Vec<u16>,
    pub data: Bytes,
}

/// The encoded arguments of a batched flow-matrix transfer call.
///
/// Field order matches the on-chain signature; `packed_coordinates`
/// serializes as `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowMatrix {
    pub flow_vertices: Vec<Account>,
    pub flow_edges: Vec<FlowEdge>,
    pub streams: Vec<Stream>,
    pub packed_coordinates: Bytes,
    pub source_coordinate: u16,
}

impl FlowMatrix {
    /// Sum of all terminal edge amounts, saturating at `U256::MAX`.
    pub fn terminal_sum(&self) -> U256 {
        self.flow_edges
            .iter()
            .filter(|e| e.is_terminal())
            .fold(U256::ZERO, |acc, e| acc.saturating_add(e.amount))
    }

    /// Hex rendering of the packed coordinates, `0x`-prefixed.
    pub fn packed_coordinates_hex(&self) -> String {
        self.packed_coordinates.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(stream_sink_id: u16, amount: U256) -> FlowEdge {
        FlowEdge {
            stream_sink_id,
            amount,
        }
    }

    fn matrix(flow_edges: Vec<FlowEdge>) -> FlowMatrix {
        FlowMatrix {
            flow_vertices: vec![],
            flow_edges,
            streams: vec![],
            packed_coordinates: Bytes::new(),
            source_coordinate: 0,
        }
    }

    #[test]
    fn test_terminal_sum_skips_intermediate_edges() {
        let m = matrix(vec![
            edge(TERMINAL_STREAM_SINK_ID, U256::from(2)),
            edge(INTERMEDIATE_STREAM_SINK_ID, U256::from(7)),
            edge(TERMINAL_STREAM_SINK_ID, U256::from(3)),
        ]);
        assert_eq!(m.terminal_sum(), U256::from(5));
    }

    #[test]
    fn test_terminal_sum_saturates_on_deserialized_input() {
        let max = U256::MAX.to_string();
        let json = format!(
            r#"{{
                "flowVertices": [],
                "flowEdges": [
                    {{"streamSinkId": 1, "amount": "{max}"}},
                    {{"streamSinkId": 1, "amount": "{max}"}}
                ],
                "streams": [],
                "packedCoordinates": "0x",
                "sourceCoordinate": 0
            }}"#
        );
        let m: FlowMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(m.terminal_sum(), U256::MAX);
    }
}
