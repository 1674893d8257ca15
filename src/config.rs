use std::collections::HashMap;
use std::path::{Path, PathBuf};

use alloy::primitives::U256;
use anyhow::{Context, Result, bail};

use flow_matrix::model::amount::parse_amount;
use flow_matrix::model::{Account, TransferPath};
use flow_matrix::transform::{RetainedFraction, WrappedTokenMap};

/// Env var consulted when `--retain-ppt` is not given.
pub const RETAIN_PPT_ENV: &str = "FLOW_MATRIX_RETAIN_PPT";

/// Raw `matrix` command arguments, as parsed by clap.
pub struct MatrixArgs {
    pub file: PathBuf,
    pub source: Option<String>,
    pub sink: Option<String>,
    pub target: Option<String>,
    pub wrapped: Option<PathBuf>,
    pub retain_ppt: Option<u64>,
    pub validate: bool,
}

/// Resolved settings for one path conversion.
pub struct ConversionConfig {
    pub path: TransferPath,
    pub source: Option<Account>,
    pub sink: Option<Account>,
    pub target: Option<U256>,
    pub wrapped: WrappedTokenMap,
    /// Share of the path to execute; the path is used unchanged when unset.
    pub retained: Option<RetainedFraction>,
    pub validate: bool,
}

impl ConversionConfig {
    pub fn from_cli(args: &MatrixArgs) -> Result<Self> {
        let path = load_path(&args.file)?;
        let target = args
            .target
            .as_deref()
            .map(|t| parse_amount(t).map_err(|e| anyhow::anyhow!("Invalid target '{t}': {e}")))
            .transpose()?;
        let wrapped = match &args.wrapped {
            Some(file) => load_wrapped_map(file)?,
            None => WrappedTokenMap::new(),
        };

        Ok(ConversionConfig {
            path,
            source: parse_account_opt(args.source.as_deref(), "source")?,
            sink: parse_account_opt(args.sink.as_deref(), "sink")?,
            target,
            wrapped,
            retained: resolve_retained(args.retain_ppt)?,
            validate: args.validate,
        })
    }
}

/// Load a `TransferPath` from a JSON file.
pub fn load_path(file: &Path) -> Result<TransferPath> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse transfer path {}", file.display()))
}

/// Load a `{"0xwrapper": "0xowner"}` JSON object.
pub fn load_wrapped_map(file: &Path) -> Result<WrappedTokenMap> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let map: HashMap<Account, Account> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse wrapped token map {}", file.display()))?;
    Ok(map)
}

pub fn parse_account_opt(value: Option<&str>, what: &str) -> Result<Option<Account>> {
    value
        .map(|v| {
            v.trim()
                .parse::<Account>()
                .map_err(|e| anyhow::anyhow!("Invalid {what} address '{v}': {e}"))
        })
        .transpose()
}

/// `--retain-ppt`, then `FLOW_MATRIX_RETAIN_PPT`. `None` means no shrink
/// was requested.
pub fn resolve_retained(cli: Option<u64>) -> Result<Option<RetainedFraction>> {
    let ppt = match cli {
        Some(ppt) => Some(ppt),
        None => match std::env::var(RETAIN_PPT_ENV) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(ppt) => Some(ppt),
                Err(_) => bail!("{RETAIN_PPT_ENV}='{raw}' is not an integer"),
            },
            Err(_) => None,
        },
    };
    Ok(ppt.map(RetainedFraction::from_ppt).transpose()?)
}
