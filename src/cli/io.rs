//! JSON I/O handling for CLI
//!
//! - Input: one JSON document from a file or stdin
//! - Output: one JSON object per line on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};
use crate::source::SnapshotSource;

/// Read a JSON request from `path`, or from stdin when no path is given
pub fn read_request(path: Option<&Path>) -> CliResult<Value> {
    let content = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("failed to read {}: {}", path.display(), e)))?,
        None => {
            let mut content = String::new();
            io::stdin().lock().read_to_string(&mut content)?;
            content
        }
    };

    parse_request(&content)
}

/// Parse request text; blank input is an error
pub fn parse_request(content: &str) -> CliResult<Value> {
    if content.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    let value: Value = serde_json::from_str(content)?;
    Ok(value)
}

/// Load a captured document source
pub fn read_snapshot(path: &Path) -> CliResult<SnapshotSource> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("failed to read {}: {}", path.display(), e)))?;

    SnapshotSource::from_json(&content)
        .map_err(|e| CliError::invalid_snapshot(format!("{}: {}", path.display(), e)))
}

/// Success envelope
pub fn response_envelope(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope
pub fn error_envelope(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&mut io::stdout(), &response_envelope(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&mut io::stdout(), &error_envelope(code, message))
}

/// Write one JSON value followed by a newline
pub fn write_line<W: Write>(out: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_rejected() {
        let err = parse_request("  \n").unwrap_err();
        assert_eq!(err.code(), "DOCSCOPE_CLI_IO_ERROR");
    }

    #[test]
    fn test_request_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"filter": {{"a": 1}}}}"#).unwrap();

        let request = read_request(Some(file.path())).unwrap();
        assert_eq!(request, json!({"filter": {"a": 1}}));
    }

    #[test]
    fn test_malformed_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"namespaces": []}}"#).unwrap();

        let err = read_snapshot(file.path()).unwrap_err();
        assert_eq!(err.code(), "DOCSCOPE_CLI_INVALID_SNAPSHOT");
    }

    #[test]
    fn test_write_line_envelope() {
        let mut out = Vec::new();
        write_line(&mut out, &response_envelope(json!({"n": 1}))).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"status\":\"ok\",\"data\":{\"n\":1}}\n");
    }
}
