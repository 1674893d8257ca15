use schemars::schema_for;

use crate::model::TransferPath;

/// JSON Schema for the `TransferPath` input, pretty-printed.
pub fn get_schema_json() -> anyhow::Result<String> {
    let schema = schema_for!(TransferPath);
    Ok(serde_json::to_string_pretty(&schema)?)
}
