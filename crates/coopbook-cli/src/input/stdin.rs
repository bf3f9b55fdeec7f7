use serde_json::Value;
use std::io::{self, Read};

use crate::CliResult;

/// JSON piped on stdin, or None when stdin is a terminal or empty.
pub fn read_stdin() -> CliResult<Option<Value>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    tracing::debug!(bytes = trimmed.len(), "read input from stdin");
    Ok(Some(serde_json::from_str(trimmed)?))
}
