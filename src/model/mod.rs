pub mod amount;
pub mod matrix;
pub mod transfer;

/// Account identifier. Parsing is case-insensitive and the derived ordering
/// is the numeric order of the 20-byte big-endian value.
pub type Account = alloy::primitives::Address;

pub use matrix::{FlowEdge, FlowMatrix, Stream};
pub use transfer::{TransferPath, TransferStep};
