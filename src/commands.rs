use std::path::Path;

use anyhow::{Result, bail};

use flow_matrix::matrix;
use flow_matrix::model::FlowMatrix;
use flow_matrix::transform::{RetainedFraction, shrink_path, substitute_wrapped};
use flow_matrix::validate::{self, detect_endpoints, detect_sink};
use flow_matrix::visualize::render_dot;

use crate::config::{self, ConversionConfig, MatrixArgs};

/// Entry point for the `matrix` command.
pub fn matrix(args: &MatrixArgs) -> Result<()> {
    let cfg = ConversionConfig::from_cli(args)?;
    let matrix = convert(cfg)?;

    eprintln!(
        "[matrix] {} vertices, {} edges, terminal sum {}",
        matrix.flow_vertices.len(),
        matrix.flow_edges.len(),
        matrix.terminal_sum()
    );
    println!("{}", serde_json::to_string_pretty(&matrix)?);
    Ok(())
}

/// Run one conversion: substitute, detect endpoints, optionally validate
/// and shrink, then build.
///
/// Without `--target` the terminal edges must add up to the path's
/// `maxFlow`, or to the shrunk `maxFlow` when a shrink was requested.
pub fn convert(cfg: ConversionConfig) -> Result<FlowMatrix> {
    let path = if cfg.wrapped.is_empty() {
        cfg.path
    } else {
        substitute_wrapped(&cfg.path, &cfg.wrapped)
    };
    let endpoints = detect_endpoints(&path, cfg.source, cfg.sink)?;

    if cfg.validate {
        let errors = validate::check_conservation(&path, &endpoints);
        if !errors.is_empty() {
            report_errors(&errors);
            bail!("Refusing to build a matrix for a non-conserving path");
        }
    }

    let path = match cfg.retained {
        Some(retained) => shrink_path(&path, endpoints.sink, retained)?,
        None => path,
    };
    let target = cfg.target.unwrap_or(path.max_flow);
    Ok(matrix::build(
        endpoints.source,
        endpoints.sink,
        target,
        &path.transfers,
    )?)
}

/// Entry point for the `validate` command.
pub fn validate(file: &Path, source: Option<&str>, sink: Option<&str>) -> Result<()> {
    let path = config::load_path(file)?;
    let source = config::parse_account_opt(source, "source")?;
    let sink = config::parse_account_opt(sink, "sink")?;

    match validate::validate_path(&path, source, sink) {
        Ok(endpoints) => {
            println!(
                "Transfer path is conserving. {} transfers from {} to {}{}.",
                path.transfers.len(),
                endpoints.source,
                endpoints.sink,
                if endpoints.is_closed_loop() { " (closed loop)" } else { "" }
            );
            Ok(())
        }
        Err(errors) => {
            report_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Entry point for the `shrink` command.
pub fn shrink(file: &Path, sink: Option<&str>, retain_ppt: Option<u64>) -> Result<()> {
    let path = config::load_path(file)?;
    let sink = config::parse_account_opt(sink, "sink")?;
    let sink = match sink {
        Some(sink) => sink,
        None => detect_sink(&path)?,
    };
    let retained = config::resolve_retained(retain_ppt)?.unwrap_or(RetainedFraction::full());

    let shrunk = shrink_path(&path, sink, retained)?;
    eprintln!(
        "[shrink] max flow {} -> {}, {} -> {} transfers",
        path.max_flow,
        shrunk.max_flow,
        path.transfers.len(),
        shrunk.transfers.len()
    );
    println!("{}", serde_json::to_string_pretty(&shrunk)?);
    Ok(())
}

/// Entry point for the `visualize` command.
pub fn visualize(file: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let path = config::load_path(file)?;
    let endpoints = detect_endpoints(&path, None, None).ok();
    let dot = render_dot(&path, endpoints.as_ref());

    match format {
        "dot" => write_output(&dot, output),
        "svg" | "png" => render_graphviz(&dot, format, output),
        other => bail!("Unknown format '{other}'. Use: dot, svg, png"),
    }
}

/// Entry point for the `schema` command.
pub fn schema() -> Result<()> {
    println!("{}", flow_matrix::schema::get_schema_json()?);
    Ok(())
}

fn report_errors(errors: &[validate::ValidationError]) {
    eprintln!("Validation failed with {} error(s):", errors.len());
    for (i, e) in errors.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, e);
    }
}

/// Write text output to file or stdout.
fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
        eprintln!("Written to {}", path.display());
    } else {
        print!("{content}");
    }
    Ok(())
}

/// Invoke the system `dot` command to render DOT to SVG/PNG.
fn render_graphviz(dot: &str, format: &str, output: Option<&Path>) -> Result<()> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let output_path = output
        .ok_or_else(|| anyhow::anyhow!("--output is required for {format} format (binary output)"))?;

    let mut child = Command::new("dot")
        .args([
            &format!("-T{format}"),
            "-o",
            &output_path.display().to_string(),
        ])
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| anyhow::anyhow!("Failed to run 'dot' command. Is Graphviz installed?\n  Error: {e}"))?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(dot.as_bytes())?;
    }

    let result = child.wait_with_output()?;
    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        bail!("dot command failed: {stderr}");
    }

    eprintln!("Rendered {format} to {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256, address};
    use flow_matrix::matrix::FlowMatrixError;
    use flow_matrix::model::{TransferPath, TransferStep};
    use flow_matrix::transform::WrappedTokenMap;

    const A: Address = address!("000000000000000000000000000000000000000a");
    const B: Address = address!("000000000000000000000000000000000000000b");
    const C: Address = address!("000000000000000000000000000000000000000c");

    /// A -> B -> C carrying 5, with the given `maxFlow`.
    fn conversion(max_flow: u64) -> ConversionConfig {
        ConversionConfig {
            path: TransferPath::new(
                U256::from(max_flow),
                vec![
                    TransferStep::new(A, B, A, U256::from(5)),
                    TransferStep::new(B, C, A, U256::from(5)),
                ],
            ),
            source: None,
            sink: None,
            target: None,
            wrapped: WrappedTokenMap::new(),
            retained: None,
            validate: false,
        }
    }

    #[test]
    fn test_convert_checks_against_path_max_flow() {
        let err = convert(conversion(6)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FlowMatrixError>(),
            Some(&FlowMatrixError::Mismatch {
                terminal_sum: U256::from(5),
                expected: U256::from(6),
            })
        );

        let matrix = convert(conversion(5)).unwrap();
        assert_eq!(matrix.packed_coordinates_hex(), "0x000000000001000000010002");
    }

    #[test]
    fn test_convert_keeps_zero_value_edges_without_shrink() {
        let mut cfg = conversion(5);
        cfg.path
            .transfers
            .insert(0, TransferStep::new(A, B, A, U256::ZERO));
        let matrix = convert(cfg).unwrap();
        assert_eq!(matrix.flow_edges.len(), 3);
        assert_eq!(matrix.streams[0].flow_edge_ids, vec![2]);
    }

    #[test]
    fn test_convert_with_shrink_targets_shrunk_max_flow() {
        let mut cfg = conversion(5);
        cfg.retained = Some(RetainedFraction::from_ppt(400_000_000_000).unwrap());
        let matrix = convert(cfg).unwrap();
        assert_eq!(matrix.terminal_sum(), U256::from(2));
    }

    #[test]
    fn test_convert_explicit_target() {
        let mut cfg = conversion(5);
        cfg.target = Some(U256::from(4));
        assert!(convert(cfg).is_err());
    }
}
