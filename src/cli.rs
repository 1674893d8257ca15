use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flow matrix encoder: turn pathfinder transfer paths into the arguments of
/// a batched flow-matrix transfer call.
#[derive(Parser)]
#[command(name = "flow-matrix", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Output the JSON schema for transfer path input
    Schema,

    /// Build the flow matrix for a transfer path JSON file
    Matrix {
        /// Path to the transfer path JSON file
        file: PathBuf,

        /// Sending account (detected from the path when omitted)
        #[arg(long)]
        source: Option<String>,

        /// Receiving account (detected from the path when omitted)
        #[arg(long)]
        sink: Option<String>,

        /// Amount the terminal edges must add up to (default: the path's maxFlow)
        #[arg(long)]
        target: Option<String>,

        /// JSON object mapping wrapper contracts to underlying asset owners
        #[arg(long)]
        wrapped: Option<PathBuf>,

        /// Share of the path to execute, in parts per trillion
        #[arg(long)]
        retain_ppt: Option<u64>,

        /// Check flow conservation before building
        #[arg(long)]
        validate: bool,
    },

    /// Check flow conservation of a transfer path JSON file
    Validate {
        /// Path to the transfer path JSON file
        file: PathBuf,

        /// Source account override
        #[arg(long)]
        source: Option<String>,

        /// Sink account override
        #[arg(long)]
        sink: Option<String>,
    },

    /// Scale a transfer path down to a retained fraction
    Shrink {
        /// Path to the transfer path JSON file
        file: PathBuf,

        /// Receiving account (detected from the path when omitted)
        #[arg(long)]
        sink: Option<String>,

        /// Share of the path to keep, in parts per trillion
        #[arg(long)]
        retain_ppt: Option<u64>,
    },

    /// Render a transfer path as DOT, SVG, or PNG
    Visualize {
        /// Path to the transfer path JSON file
        file: PathBuf,

        /// Output format: dot (default), svg, or png
        #[arg(long, default_value = "dot")]
        format: String,

        /// Output file path (default: stdout for dot, required for svg/png)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}
