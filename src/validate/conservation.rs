use std::collections::BTreeMap;
use std::fmt;

use alloy::primitives::U256;
use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;

use crate::model::{Account, TransferPath};

use super::{Endpoints, ValidationError, VertexRole};

/// Total value into and out of one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetBalance {
    pub incoming: U256,
    pub outgoing: U256,
}

impl NetBalance {
    pub fn is_zero(&self) -> bool {
        self.incoming == self.outgoing
    }

    pub fn is_positive(&self) -> bool {
        self.incoming > self.outgoing
    }

    pub fn is_negative(&self) -> bool {
        self.incoming < self.outgoing
    }
}

impl fmt::Display for NetBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", self.outgoing - self.incoming)
        } else if self.is_positive() {
            write!(f, "+{}", self.incoming - self.outgoing)
        } else {
            write!(f, "0")
        }
    }
}

/// Aggregate transfers into an account graph, merging parallel edges.
/// Self-transfers net to zero and only contribute their vertex.
fn flow_graph(path: &TransferPath) -> Result<DiGraphMap<Account, U256>, ValidationError> {
    let mut graph: DiGraphMap<Account, U256> = DiGraphMap::new();
    for t in &path.transfers {
        graph.add_node(t.from);
        graph.add_node(t.to);
        if t.from == t.to {
            continue;
        }
        match graph.edge_weight_mut(t.from, t.to) {
            Some(weight) => {
                *weight = weight
                    .checked_add(t.value)
                    .ok_or(ValidationError::AmountOverflow { account: t.from })?;
            }
            None => {
                graph.add_edge(t.from, t.to, t.value);
            }
        }
    }
    Ok(graph)
}

/// Net balance of every sender and recipient in `path`.
pub fn netted_flow(path: &TransferPath) -> Result<BTreeMap<Account, NetBalance>, ValidationError> {
    let graph = flow_graph(path)?;
    let mut balances = BTreeMap::new();

    for account in graph.nodes() {
        let sum = |dir: Direction| {
            graph
                .edges_directed(account, dir)
                .try_fold(U256::ZERO, |acc, (_, _, value)| acc.checked_add(*value))
                .ok_or(ValidationError::AmountOverflow { account })
        };
        balances.insert(
            account,
            NetBalance {
                incoming: sum(Direction::Incoming)?,
                outgoing: sum(Direction::Outgoing)?,
            },
        );
    }

    Ok(balances)
}

/// Check that value is conserved at every vertex.
///
/// Closed loop: every vertex nets zero. Open path: the source nets
/// negative, the sink positive, every other vertex zero.
pub fn check_conservation(path: &TransferPath, endpoints: &Endpoints) -> Vec<ValidationError> {
    let mut balances = match netted_flow(path) {
        Ok(b) => b,
        Err(e) => return vec![e],
    };
    // An endpoint missing from the path still has to satisfy its rule.
    balances.entry(endpoints.source).or_default();
    balances.entry(endpoints.sink).or_default();

    let mut errors = Vec::new();
    for (account, balance) in balances {
        let role = if endpoints.is_closed_loop() && account == endpoints.source {
            VertexRole::LoopEndpoint
        } else if account == endpoints.source {
            VertexRole::Source
        } else if account == endpoints.sink {
            VertexRole::Sink
        } else {
            VertexRole::Intermediate
        };

        let ok = match role {
            VertexRole::Source => balance.is_negative(),
            VertexRole::Sink => balance.is_positive(),
            VertexRole::Intermediate | VertexRole::LoopEndpoint => balance.is_zero(),
        };
        if !ok {
            errors.push(ValidationError::ConservationViolation {
                account,
                role,
                balance,
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransferStep;
    use alloy::primitives::address;

    const A: Account = address!("000000000000000000000000000000000000000a");
    const B: Account = address!("000000000000000000000000000000000000000b");
    const C: Account = address!("000000000000000000000000000000000000000c");

    fn path(steps: &[(Account, Account, u64)]) -> TransferPath {
        TransferPath::new(
            U256::ZERO,
            steps
                .iter()
                .map(|(from, to, v)| TransferStep::new(*from, *to, *from, U256::from(*v)))
                .collect(),
        )
    }

    #[test]
    fn test_netted_flow_merges_parallel_edges() {
        let p = path(&[(A, B, 3), (A, B, 2), (B, C, 5)]);
        let balances = netted_flow(&p).unwrap();
        assert_eq!(balances[&A].to_string(), "-5");
        assert!(balances[&B].is_zero());
        assert_eq!(balances[&C].to_string(), "+5");
    }

    #[test]
    fn test_self_transfer_nets_zero() {
        let p = path(&[(A, A, 9)]);
        let balances = netted_flow(&p).unwrap();
        assert!(balances[&A].is_zero());
    }

    #[test]
    fn test_open_path_conserved() {
        let p = path(&[(A, B, 5), (B, C, 5)]);
        assert!(check_conservation(&p, &Endpoints::new(A, C)).is_empty());
    }

    #[test]
    fn test_leaky_intermediate() {
        let p = path(&[(A, B, 5), (B, C, 4)]);
        let errors = check_conservation(&p, &Endpoints::new(A, C));
        assert_eq!(errors.len(), 1);
        let msg = errors[0].to_string();
        assert!(msg.contains("intermediate"), "got: {msg}");
        assert!(msg.contains("+1"), "got: {msg}");
    }

    #[test]
    fn test_wrong_sink_flags_both() {
        let p = path(&[(A, B, 5), (B, C, 5)]);
        // B is declared sink but nets zero, C collects without being declared
        let errors = check_conservation(&p, &Endpoints::new(A, B));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_closed_loop() {
        let p = path(&[(A, B, 5), (B, C, 5), (C, A, 5)]);
        assert!(check_conservation(&p, &Endpoints::new(A, A)).is_empty());

        let broken = path(&[(A, B, 5), (B, C, 5), (C, A, 4)]);
        let errors = check_conservation(&broken, &Endpoints::new(A, A));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::ConservationViolation {
                role: VertexRole::LoopEndpoint,
                ..
            }
        )));
    }

    #[test]
    fn test_missing_endpoint_is_violation() {
        let p = path(&[(A, B, 5)]);
        let errors = check_conservation(&p, &Endpoints::new(A, C));
        // B collects, C never receives
        assert_eq!(errors.len(), 2);
    }
}
