use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

/// Env var holding the tracing filter, e.g. `flow_matrix=debug`.
const LOG_ENV: &str = "FLOW_MATRIX_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Schema => commands::schema(),
        cli::Command::Matrix {
            file,
            source,
            sink,
            target,
            wrapped,
            retain_ppt,
            validate,
        } => commands::matrix(&config::MatrixArgs {
            file,
            source,
            sink,
            target,
            wrapped,
            retain_ppt,
            validate,
        }),
        cli::Command::Validate { file, source, sink } => {
            commands::validate(&file, source.as_deref(), sink.as_deref())
        }
        cli::Command::Shrink {
            file,
            sink,
            retain_ppt,
        } => commands::shrink(&file, sink.as_deref(), retain_ppt),
        cli::Command::Visualize {
            file,
            format,
            output,
        } => commands::visualize(&file, &format, output.as_deref()),
    }
}
