//! Reading requests and rows.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, bail};
use quarry::types::{CommonOperationShell, MultipleOperationShell};
use serde_json::Value;

/// A request shell of either shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// A flat parameter list with one glue.
    Common(CommonOperationShell),
    /// Groups joined by an external glue.
    Multiple(MultipleOperationShell),
}

impl Request {
    /// Parses a request document.
    ///
    /// An object with a `search` member is a grouped request; anything else
    /// is read as a flat one.
    pub fn from_json(value: Value) -> anyhow::Result<Self> {
        let Some(object) = value.as_object() else {
            bail!("request must be a JSON object");
        };

        if object.contains_key("search") {
            let shell = serde_json::from_value(value).context("invalid grouped request")?;
            Ok(Request::Multiple(shell))
        } else {
            let shell = serde_json::from_value(value).context("invalid request")?;
            Ok(Request::Common(shell))
        }
    }
}

/// Reads a file, or standard input for `-`.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read standard input")?;
        return Ok(buffer);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Reads and parses a request.
pub fn read_request(path: &Path) -> anyhow::Result<Request> {
    let value: Value = serde_json::from_str(&read_input(path)?)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Request::from_json(value)
}

/// Reads a JSON array of rows.
pub fn read_rows(path: &Path) -> anyhow::Result<Vec<Value>> {
    let value: Value = serde_json::from_str(&read_input(path)?)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    match value {
        Value::Array(rows) => Ok(rows),
        _ => bail!("{} must hold a JSON array of rows", path.display()),
    }
}
