//! Download resolver
//!
//! A chosen result maps to an ordered list of candidate endpoints. They are
//! tried one at a time; the first success is saved, and only exhaustion is
//! reported to the user.

use std::path::{Path, PathBuf};

use super::{DownloadRequest, NotesApi};
use crate::core::error::{NotesError, Result};
use crate::core::fallback::first_success;
use crate::core::model::ResultItem;
use crate::core::paths::{base_name, folder_prefix, root_folder, zip_name};

const DOWNLOAD_FILE: &str = "/api/notes/download";
const DOWNLOAD_FOLDER: &str = "/api/notes/download-folder";
const DOWNLOAD_ZIP: &str = "/api/notes/download-zip";

/// Candidate endpoints and the local name for one result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub file_name: String,
    pub candidates: Vec<DownloadRequest>,
}

/// Downloaded payload, held only until it is written
#[derive(Debug)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Build the candidate list for a result
pub fn plan_download(item: &ResultItem) -> DownloadPlan {
    if item.is_folder {
        let root = root_folder(&item.name).unwrap_or_default();
        let prefix = folder_prefix(&root);
        return DownloadPlan {
            file_name: zip_name(&prefix),
            candidates: vec![
                DownloadRequest::query(DOWNLOAD_FOLDER, "prefix", prefix.clone()),
                DownloadRequest::segment(DOWNLOAD_FOLDER, prefix.clone()),
                DownloadRequest::query(DOWNLOAD_ZIP, "prefix", prefix),
            ],
        };
    }

    DownloadPlan {
        file_name: item.name.clone(),
        candidates: vec![
            DownloadRequest::segment(DOWNLOAD_FILE, item.name.clone()),
            DownloadRequest::query(DOWNLOAD_FILE, "path", item.name.clone()),
        ],
    }
}

/// Fetch the first candidate that succeeds
pub async fn fetch_artifact<A: NotesApi>(api: &A, plan: &DownloadPlan) -> Result<Artifact> {
    let bytes = first_success(plan.candidates.iter(), |request| api.fetch_bytes(request))
        .await
        .map_err(|exhausted| NotesError::DownloadFailed {
            target: plan.file_name.clone(),
            attempts: exhausted.attempts,
            last_error: exhausted
                .last_error
                .map(|e| e.to_string())
                .unwrap_or_default(),
        })?;

    Ok(Artifact {
        file_name: plan.file_name.clone(),
        bytes,
    })
}

/// Download a result into `out_dir`, returning the written path
pub async fn download<A: NotesApi>(api: &A, item: &ResultItem, out_dir: &Path) -> Result<PathBuf> {
    let plan = plan_download(item);
    tracing::info!(
        target_name = %item.name,
        candidates = plan.candidates.len(),
        "downloading"
    );

    let artifact = match fetch_artifact(api, &plan).await {
        Ok(a) => a,
        Err(e) => {
            if let NotesError::DownloadFailed {
                attempts,
                last_error,
                ..
            } = &e
            {
                tracing::error!(attempts, last_error = %last_error, "download failed");
            }
            return Err(e);
        }
    };

    save_artifact(artifact, out_dir).await
}

/// Write the artifact without overwriting an existing file
pub async fn save_artifact(artifact: Artifact, out_dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(out_dir).await?;
    let path = unique_path(out_dir, &base_name(&artifact.file_name)).await?;
    tokio::fs::write(&path, &artifact.bytes).await?;
    tracing::debug!(path = %path.display(), bytes = artifact.bytes.len(), "saved artifact");
    Ok(path)
}

/// `dir/name`, or `dir/stem (n).ext` for the first free `n`
async fn unique_path(dir: &Path, name: &str) -> Result<PathBuf> {
    let candidate = dir.join(name);
    if !tokio::fs::try_exists(&candidate).await? {
        return Ok(candidate);
    }

    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => (&name[..dot], &name[dot..]),
        _ => (name, ""),
    };
    let mut n = 1;
    loop {
        let candidate = dir.join(format!("{} ({}){}", stem, n, ext));
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}
