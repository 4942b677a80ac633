//! Credential file persistence
//!
//! Cookies are stored as an indented JSON array. The document is serialized in
//! memory first and then written to a sibling temp file that is renamed over
//! the target, so a failed write never leaves a truncated credentials file.

use crate::{Result, types::StoredCookie};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Write `cookies` to `path`, replacing any existing file
pub async fn save_credentials(path: &Path, cookies: &[StoredCookie]) -> Result<()> {
    let document = serde_json::to_string_pretty(cookies)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = temp_path_for(path);
    if let Err(e) = fs::write(&temp_path, document.as_bytes()).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e.into());
    }

    tracing::info!("Saved {} cookies to {}", cookies.len(), path.display());
    Ok(())
}

/// Read a credentials file written by [`save_credentials`]
pub async fn load_credentials(path: &Path) -> Result<Vec<StoredCookie>> {
    let content = fs::read_to_string(path).await?;
    let cookies: Vec<StoredCookie> = serde_json::from_str(&content)?;
    tracing::debug!("Loaded {} cookies from {}", cookies.len(), path.display());
    Ok(cookies)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "credentials".into());
    name.push(".tmp");
    path.with_file_name(name)
}
