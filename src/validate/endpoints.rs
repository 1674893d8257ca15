use std::collections::BTreeSet;

use crate::model::{Account, TransferPath};

use super::{EndpointSide, ValidationError};

/// Source and sink of a transfer path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub source: Account,
    pub sink: Account,
}

impl Endpoints {
    pub fn new(source: Account, sink: Account) -> Self {
        Endpoints { source, sink }
    }

    /// A path that starts and ends at the same account.
    pub fn is_closed_loop(&self) -> bool {
        self.source == self.sink
    }
}

/// Accounts that send but never receive (source candidates) and accounts
/// that receive but never send (sink candidates), in address order.
pub fn endpoint_candidates(path: &TransferPath) -> (Vec<Account>, Vec<Account>) {
    let senders: BTreeSet<Account> = path.transfers.iter().map(|t| t.from).collect();
    let recipients: BTreeSet<Account> = path.transfers.iter().map(|t| t.to).collect();

    let sources = senders.difference(&recipients).copied().collect();
    let sinks = recipients.difference(&senders).copied().collect();
    (sources, sinks)
}

/// Resolve the source and sink of `path`.
///
/// An override is taken as-is. Otherwise the side must have exactly one
/// candidate, or detection fails with `AmbiguousEndpoints`.
pub fn detect_endpoints(
    path: &TransferPath,
    source: Option<Account>,
    sink: Option<Account>,
) -> Result<Endpoints, ValidationError> {
    let source = match source {
        Some(s) => s,
        None => detect_source(path)?,
    };
    let sink = match sink {
        Some(s) => s,
        None => detect_sink(path)?,
    };
    Ok(Endpoints { source, sink })
}

/// The unique account that sends but never receives.
pub fn detect_source(path: &TransferPath) -> Result<Account, ValidationError> {
    let (sources, _) = endpoint_candidates(path);
    unique(EndpointSide::Source, sources)
}

/// The unique account that receives but never sends.
pub fn detect_sink(path: &TransferPath) -> Result<Account, ValidationError> {
    let (_, sinks) = endpoint_candidates(path);
    unique(EndpointSide::Sink, sinks)
}

fn unique(side: EndpointSide, candidates: Vec<Account>) -> Result<Account, ValidationError> {
    match candidates.as_slice() {
        [only] => Ok(*only),
        _ => Err(ValidationError::AmbiguousEndpoints { side, candidates }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransferStep;
    use alloy::primitives::{U256, address};

    const A: Account = address!("000000000000000000000000000000000000000a");
    const B: Account = address!("000000000000000000000000000000000000000b");
    const C: Account = address!("000000000000000000000000000000000000000c");
    const D: Account = address!("000000000000000000000000000000000000000d");

    fn path(steps: &[(Account, Account)]) -> TransferPath {
        TransferPath::new(
            U256::from(1),
            steps
                .iter()
                .map(|(from, to)| TransferStep::new(*from, *to, *from, U256::from(1)))
                .collect(),
        )
    }

    #[test]
    fn test_detects_unique_endpoints() {
        let p = path(&[(A, B), (B, C)]);
        assert_eq!(detect_endpoints(&p, None, None).unwrap(), Endpoints::new(A, C));
    }

    #[test]
    fn test_multiple_sinks_ambiguous() {
        let p = path(&[(A, B), (A, C)]);
        let err = detect_endpoints(&p, None, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::AmbiguousEndpoints {
                side: EndpointSide::Sink,
                candidates: vec![B, C],
            }
        );
        // an override resolves it
        assert_eq!(
            detect_endpoints(&p, None, Some(C)).unwrap(),
            Endpoints::new(A, C)
        );
    }

    #[test]
    fn test_loop_has_no_candidates() {
        let p = path(&[(A, B), (B, A)]);
        let err = detect_endpoints(&p, None, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::AmbiguousEndpoints {
                side: EndpointSide::Source,
                candidates: vec![],
            }
        );
        let endpoints = detect_endpoints(&p, Some(A), Some(A)).unwrap();
        assert!(endpoints.is_closed_loop());
    }

    #[test]
    fn test_candidates_sorted() {
        let p = path(&[(D, B), (A, B), (B, C)]);
        let (sources, sinks) = endpoint_candidates(&p);
        assert_eq!(sources, vec![A, D]);
        assert_eq!(sinks, vec![C]);
    }
}
