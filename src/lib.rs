//! Turns pathfinder transfer paths into the flow matrix arguments of a
//! batched on-chain transfer call.
//!
//! A typical conversion substitutes wrapped assets, optionally shrinks the
//! path, checks conservation and then builds the matrix:
//!
//! ```no_run
//! use flow_matrix::{matrix, transform, validate};
//! # fn convert(path: flow_matrix::model::TransferPath) -> anyhow::Result<()> {
//! let endpoints = validate::validate_path(&path, None, None)
//!     .map_err(|errs| anyhow::anyhow!("{} conservation error(s)", errs.len()))?;
//! let half = transform::RetainedFraction::from_ratio(0.5)?;
//! let path = transform::shrink_path(&path, endpoints.sink, half)?;
//! let matrix = matrix::build_from_path(&path, endpoints.source, endpoints.sink)?;
//! println!("{}", matrix.packed_coordinates_hex());
//! # Ok(())
//! # }
//! ```

pub mod matrix;
pub mod model;
pub mod schema;
pub mod transform;
pub mod validate;
pub mod visualize;

pub use matrix::{FlowMatrixError, build, build_from_path};
pub use model::{Account, FlowEdge, FlowMatrix, Stream, TransferPath, TransferStep};
