//! JSON I/O handling for CLI
//!
//! - Input: one JSON document via stdin
//! - Output: one JSON object per line via stdout
//!   (`{"status": "ok", "data": ...}` or
//!   `{"status": "error", "code": ..., "message": ...}`)

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Reads the whole of stdin as one JSON document. Empty input reads as
/// `null`.
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(input).map_err(CliError::from)
}

fn success_envelope(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

fn error_envelope(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

fn write_line(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&success_envelope(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&error_envelope(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_null() {
        assert_eq!(parse_request("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_multiline_document() {
        let value = parse_request("{\n  \"variationIdFormat\": \"key\"\n}\n").unwrap();
        assert_eq!(value["variationIdFormat"], "key");
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_request("{not json").unwrap_err();
        assert_eq!(err.code_str(), "DSCONFIG_IO_ERROR");
    }

    #[test]
    fn test_envelopes() {
        assert_eq!(success_envelope(json!(1))["status"], "ok");
        let err = error_envelope("DSCONFIG_SAVE_FAILED", "quota exceeded");
        assert_eq!(err["status"], "error");
        assert_eq!(err["code"], "DSCONFIG_SAVE_FAILED");
        assert_eq!(err["message"], "quota exceeded");
    }
}
