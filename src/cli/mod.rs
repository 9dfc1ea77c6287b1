//! CLI command implementations.
//!
//! Each handler takes a [`BravoZeroClient`](crate::BravoZeroClient) and a
//! writer, performs one service call, and writes the result as pretty JSON.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `evaluate` | Evaluate an action against the constitution |
//! | `omega` | Show the global Omega score |
//! | `rules` / `rule` | List or show constitution rules |
//! | `values` | Show the values database |
//! | `memory` | Record, query and link memories |
//! | `files` | Read and write files on the bridge |
//! | `public-key` | Print the agent's Ed25519 public key |
//!
//! # Example Usage
//!
//! ```bash
//! # Check an action before running it
//! bravozero evaluate write_file --context '{"path": "/etc/hosts"}'
//!
//! # Remember something
//! bravozero memory record "User prefers Rust" --tags lang,pref
//!
//! # Read a file through the bridge
//! bravozero files read /workspace/README.md
//! ```

mod constitution;
mod files;
mod memory;

pub use constitution::{cmd_evaluate, cmd_omega, cmd_rule, cmd_rules, cmd_values};
pub use files::{
    cmd_files_delete, cmd_files_info, cmd_files_list, cmd_files_read, cmd_files_status,
    cmd_files_sync, cmd_files_write,
};
pub use memory::{
    RecordArgs, cmd_memory_delete, cmd_memory_get, cmd_memory_link, cmd_memory_query,
    cmd_memory_record, cmd_memory_related,
};

use crate::BravoZeroClient;
use serde::Serialize;
use std::io::Write;

/// Result type shared by the command handlers.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Writes `value` as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> CommandResult {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Prints the base64 public key of the configured signing key.
///
/// # Errors
///
/// Returns an error if no private key is configured.
pub fn cmd_public_key<W: Write>(client: &BravoZeroClient, writer: &mut W) -> CommandResult {
    let Some(authenticator) = client.authenticator() else {
        return Err("no private key configured; set BRAVOZERO_PRIVATE_KEY_PATH".into());
    };
    writeln!(writer, "{}", authenticator.public_key())?;
    Ok(())
}

/// Splits a comma-separated list, dropping empty entries.
#[must_use]
pub fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a JSON object argument.
///
/// # Errors
///
/// Returns an error if `s` is not a JSON object.
pub fn parse_json_object(
    s: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, Box<dyn std::error::Error>> {
    match serde_json::from_str(s)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(format!("expected a JSON object, got: {s}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_parse_json_object() {
        let map = parse_json_object(r#"{"path": "/tmp"}"#).unwrap();
        assert_eq!(map["path"], "/tmp");
        assert!(parse_json_object("[1, 2]").is_err());
        assert!(parse_json_object("not json").is_err());
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_json(&mut out, &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_public_key_requires_key() {
        let client = BravoZeroClient::new(ClientConfig::new("key", "agent")).unwrap();
        let mut out = Vec::new();
        assert!(cmd_public_key(&client, &mut out).is_err());

        let client = BravoZeroClient::new(
            ClientConfig::new("key", "agent").with_private_key((0u8..32).collect()),
        )
        .unwrap();
        cmd_public_key(&client, &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.trim().len(), 44);
    }
}
