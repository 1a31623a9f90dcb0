//! download / upload commands

use std::path::Path;

use anyhow::{Context, Result};

use crate::client::download::download;
use crate::client::upload::{upload_path, UploadOptions};
use crate::client::NotesApi;
use crate::core::model::ResultItem;

/// Result item for a name given on the command line
pub fn target_item(name: &str, folder: bool) -> ResultItem {
    if folder || name.ends_with('/') {
        ResultItem::folder(name)
    } else {
        ResultItem::file(name)
    }
}

/// Run the download command
pub async fn run_download<A: NotesApi>(
    api: &A,
    name: &str,
    folder: bool,
    out_dir: &Path,
    quiet: bool,
) -> Result<()> {
    let item = target_item(name, folder);

    let path = download(api, &item, out_dir)
        .await
        .with_context(|| format!("{} {}", item.action_label(), item.name))?;

    if !quiet {
        println!("{}", path.display());
    }
    Ok(())
}

/// Run the upload command
pub async fn run_upload<A: NotesApi>(
    api: &A,
    path: &Path,
    options: UploadOptions,
    quiet: bool,
) -> Result<()> {
    let outcome = upload_path(api, path, &options)
        .await
        .with_context(|| format!("Upload {}", path.display()))?;

    if !quiet {
        println!("{} ({})", outcome.message(), outcome.name());
    }
    Ok(())
}
