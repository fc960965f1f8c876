pub mod file;

use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Load a typed request from `--input`, else from piped stdin.
/// `Ok(None)` means neither source supplied anything.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_document(path)?));
    }
    match read_piped_stdin()? {
        Some(text) => {
            tracing::debug!(bytes = text.len(), "read request from stdin");
            Ok(Some(serde_json::from_str(&text)?))
        }
        None => Ok(None),
    }
}

/// Piped stdin as text. `None` when stdin is a terminal or carries nothing.
fn read_piped_stdin() -> io::Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let trimmed = buffer.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}
