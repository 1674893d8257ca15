mod conservation;
mod endpoints;

use std::fmt;

use thiserror::Error;

use crate::model::{Account, TransferPath};

pub use conservation::{NetBalance, check_conservation, netted_flow};
pub use endpoints::{Endpoints, detect_endpoints, detect_sink, detect_source, endpoint_candidates};

/// Which end of a path detection was resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSide {
    Source,
    Sink,
}

impl fmt::Display for EndpointSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointSide::Source => write!(f, "source"),
            EndpointSide::Sink => write!(f, "sink"),
        }
    }
}

/// Role of a vertex under the conservation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexRole {
    Source,
    Sink,
    Intermediate,
    /// Source and sink of a closed loop.
    LoopEndpoint,
}

impl VertexRole {
    /// Sign the net balance must have.
    pub fn expected_balance(&self) -> &'static str {
        match self {
            VertexRole::Source => "negative",
            VertexRole::Sink => "positive",
            VertexRole::Intermediate | VertexRole::LoopEndpoint => "zero",
        }
    }
}

impl fmt::Display for VertexRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexRole::Source => write!(f, "source"),
            VertexRole::Sink => write!(f, "sink"),
            VertexRole::Intermediate => write!(f, "intermediate"),
            VertexRole::LoopEndpoint => write!(f, "loop endpoint"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Conservation violated at {role} {account}: net balance {balance}, expected {}", .role.expected_balance())]
    ConservationViolation {
        account: Account,
        role: VertexRole,
        balance: NetBalance,
    },

    #[error("Cannot detect {side}: {} candidates, pass it explicitly", .candidates.len())]
    AmbiguousEndpoints {
        side: EndpointSide,
        candidates: Vec<Account>,
    },

    #[error("Flow through {account} overflows 256 bits")]
    AmountOverflow { account: Account },
}

/// Resolve endpoints and check conservation, collecting all errors.
pub fn validate_path(
    path: &TransferPath,
    source: Option<Account>,
    sink: Option<Account>,
) -> Result<Endpoints, Vec<ValidationError>> {
    let endpoints = detect_endpoints(path, source, sink).map_err(|e| vec![e])?;
    let errors = check_conservation(path, &endpoints);
    if errors.is_empty() {
        Ok(endpoints)
    } else {
        Err(errors)
    }
}
