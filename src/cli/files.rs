//! Bridge file commands.

use super::{CommandResult, write_json};
use crate::BravoZeroClient;
use crate::models::ListFilesOptions;
use std::io::Write;

/// Lists a directory.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_files_list<W: Write>(
    client: &BravoZeroClient,
    path: &str,
    recursive: bool,
    pattern: Option<String>,
    writer: &mut W,
) -> CommandResult {
    let mut options = ListFilesOptions::new();
    if recursive {
        options = options.recursive();
    }
    if let Some(pattern) = pattern {
        options = options.with_pattern(pattern);
    }
    let listing = client.bridge().list_files(path, &options).await?;
    write_json(writer, &listing)
}

/// Prints a file's text content as-is.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_files_read<W: Write>(
    client: &BravoZeroClient,
    path: &str,
    writer: &mut W,
) -> CommandResult {
    let content = client.bridge().read_file(path).await?;
    writer.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        writeln!(writer)?;
    }
    Ok(())
}

/// Shows file metadata.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_files_info<W: Write>(
    client: &BravoZeroClient,
    path: &str,
    writer: &mut W,
) -> CommandResult {
    let info = client.bridge().get_file_info(path).await?;
    write_json(writer, &info)
}

/// Deletes a file.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_files_delete<W: Write>(
    client: &BravoZeroClient,
    path: &str,
    writer: &mut W,
) -> CommandResult {
    let deleted = client.bridge().delete_file(path).await?;
    write_json(writer, &serde_json::json!({ "path": path, "deleted": deleted }))
}

/// Writes a text file.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_files_write<W: Write>(
    client: &BravoZeroClient,
    path: &str,
    content: &str,
    create_dirs: bool,
    writer: &mut W,
) -> CommandResult {
    let info = client
        .bridge()
        .write_file(path, content, Some(create_dirs))
        .await?;
    write_json(writer, &info)
}

/// Triggers a sync.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_files_sync<W: Write>(
    client: &BravoZeroClient,
    path: Option<&str>,
    writer: &mut W,
) -> CommandResult {
    let status = client.bridge().sync(path).await?;
    write_json(writer, &status)
}

/// Shows sync status.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_files_status<W: Write>(
    client: &BravoZeroClient,
    path: Option<&str>,
    writer: &mut W,
) -> CommandResult {
    let status = client.bridge().get_sync_status(path).await?;
    write_json(writer, &status)
}
