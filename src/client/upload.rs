//! Upload planning and submission
//!
//! A single file is sent under its final name. A folder is sent as one
//! multipart batch: every file with its path relative to the (possibly
//! renamed) root, plus a JSON manifest. Before sending, the listing is
//! searched for the chosen name; the server's 409 stays authoritative.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use walkdir::WalkDir;

use super::NotesApi;
use crate::core::error::{
    NotesError, Result, NAME_TAKEN_MESSAGE, UPLOAD_FAILED_MESSAGE,
};
use crate::core::paths::SEPARATOR;

/// Selectable file types and the extension each one implies
pub const FILE_TYPES: [(&str, &str); 10] = [
    ("pdf", ".pdf"),
    ("docx", ".docx"),
    ("doc", ".doc"),
    ("txt", ".txt"),
    ("png", ".png"),
    ("jpg", ".jpg"),
    ("jpeg", ".jpeg"),
    ("csv", ".csv"),
    ("xlsx", ".xlsx"),
    ("pptx", ".pptx"),
];

/// File type value meaning "keep the original extension"
pub const AUTO_FILE_TYPE: &str = "auto";

const CONFLICT: u16 = 409;

/// One multipart part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        field: String,
        value: String,
    },
    File {
        field: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

/// Ordered multipart form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub parts: Vec<FormPart>,
}

impl UploadForm {
    pub fn text(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.parts.push(FormPart::Text {
            field: field.into(),
            value: value.into(),
        });
    }

    pub fn file(&mut self, field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) {
        self.parts.push(FormPart::File {
            field: field.into(),
            file_name: file_name.into(),
            bytes,
        });
    }

    /// Values of every text part named `field`, in order
    #[cfg(test)]
    pub fn text_values(&self, field: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                FormPart::Text { field: f, value } if f == field => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }

    /// File names of every file part, in order
    #[cfg(test)]
    pub fn file_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                FormPart::File { file_name, .. } => Some(file_name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Raw upload response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReply {
    pub status: u16,
    pub body: String,
}

/// User choices for an upload
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub custom_name: Option<String>,
    pub file_type: Option<String>,
    pub description: Option<String>,
}

impl UploadOptions {
    fn custom_name(&self) -> Option<&str> {
        self.custom_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn explicit_file_type(&self) -> Option<&str> {
        self.file_type
            .as_deref()
            .filter(|t| !t.is_empty() && *t != AUTO_FILE_TYPE)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// A local file staged for a folder upload
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    /// Path relative to the folder's parent, '/'-separated, root included
    pub rel_path: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    name: &'a str,
    path: &'a str,
    size: usize,
    #[serde(rename = "type")]
    mime: &'a str,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    File(String),
    Folder(String),
}

impl UploadOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            UploadOutcome::File(_) => "File upload successful!",
            UploadOutcome::Folder(_) => "Folder upload successful!",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            UploadOutcome::File(n) | UploadOutcome::Folder(n) => n,
        }
    }
}

/// Extension implied by the chosen type, else the original's (with dot)
pub fn extension_for(file_type: Option<&str>, original: &str) -> String {
    if let Some(ext) = file_type.and_then(|t| {
        FILE_TYPES
            .iter()
            .find(|(name, _)| *name == t)
            .map(|(_, ext)| *ext)
    }) {
        return ext.to_string();
    }
    original
        .rfind('.')
        .map(|dot| original[dot..].to_string())
        .unwrap_or_default()
}

/// Name a single file is stored under
pub fn final_file_name(original: &str, options: &UploadOptions) -> String {
    let Some(custom) = options.custom_name() else {
        return original.to_string();
    };
    if custom.contains('.') {
        return custom.to_string();
    }
    format!(
        "{}{}",
        custom,
        extension_for(options.explicit_file_type(), original)
    )
}

/// Replace the leading `original_root` of `rel` with `final_root`
pub fn rewrite_root(rel: &str, original_root: &str, final_root: &str) -> String {
    if original_root.is_empty() {
        return rel.to_string();
    }
    let prefix = format!("{}{}", original_root, SEPARATOR);
    if let Some(rest) = rel.strip_prefix(&prefix) {
        format!("{}{}{}", final_root, SEPARATOR, rest)
    } else if rel == original_root {
        final_root.to_string()
    } else {
        rel.to_string()
    }
}

/// Best-effort MIME type for the manifest; empty when unknown
fn mime_for(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or_default().to_lowercase();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "zip" => "application/zip",
        _ => "",
    }
}

/// Form for a single file. Returns the final name with the form.
pub fn single_file_form(
    original: &str,
    bytes: Vec<u8>,
    options: &UploadOptions,
) -> (String, UploadForm) {
    let final_name = final_file_name(original, options);
    let mut form = UploadForm::default();
    form.file("files", final_name.clone(), bytes);
    if options.custom_name().is_some() {
        form.text("customName", final_name.clone());
    }
    form.text("originalName", original);
    if let Some(t) = options.explicit_file_type() {
        form.text("fileType", t);
    }
    if let Some(d) = options.description() {
        form.text("description", d);
    }
    (final_name, form)
}

/// Form for a folder batch. Returns the final root name with the form.
pub fn folder_form(
    original_root: &str,
    files: &[LocalFile],
    options: &UploadOptions,
) -> Result<(String, UploadForm)> {
    let final_root = options
        .custom_name()
        .unwrap_or(original_root)
        .to_string();

    let mut form = UploadForm::default();
    let mut paths = Vec::with_capacity(files.len());
    for f in files {
        let rel = rewrite_root(&f.rel_path, original_root, &final_root);
        form.file("files", rel.clone(), f.bytes.clone());
        form.text("paths", rel.clone());
        paths.push(rel);
    }

    let manifest: Vec<ManifestEntry> = files
        .iter()
        .zip(&paths)
        .map(|(f, path)| ManifestEntry {
            name: &f.name,
            path,
            size: f.bytes.len(),
            mime: mime_for(&f.name),
        })
        .collect();

    form.text("batchUpload", "true");
    form.text("rootDirName", final_root.clone());
    form.text("manifest", serde_json::to_string(&manifest)?);
    if let Some(t) = options.explicit_file_type() {
        form.text("fileType", t);
    }
    if let Some(d) = options.description() {
        form.text("description", d);
    }
    Ok((final_root, form))
}

/// Read every file under `dir`, sorted by path, relative to its parent
///
/// The directory is canonicalized first so `.` or `..` still name a root.
pub async fn collect_folder(dir: &Path) -> Result<(String, Vec<LocalFile>)> {
    let dir = tokio::fs::canonicalize(dir).await?;
    let root = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| {
            NotesError::InvalidInput(format!("Cannot upload {} as a folder", dir.display()))
        })?;

    let walk_root = dir.clone();
    let found = tokio::task::spawn_blocking(move || walk_files(&walk_root))
        .await
        .map_err(|e| NotesError::Io(std::io::Error::other(e)))??;

    let mut files = Vec::with_capacity(found.len());
    for (path, relative) in found {
        files.push(LocalFile {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            rel_path: format!("{}{}{}", root, SEPARATOR, relative),
            bytes: tokio::fs::read(&path).await?,
        });
    }
    Ok((root, files))
}

/// Regular files under `dir` with their `/`-separated relative paths
fn walk_files(dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| NotesError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        found.push((entry.into_path(), relative));
    }
    Ok(found)
}

/// Whether `candidate` already appears in a listing response.
///
/// Only a bare array of strings is checked; other shapes count as free.
pub fn name_taken(listing: &Value, candidate: &str, is_folder: bool) -> bool {
    let Some(entries) = listing.as_array() else {
        return false;
    };
    let folder_prefix = if candidate.ends_with(SEPARATOR) {
        candidate.to_string()
    } else {
        format!("{}{}", candidate, SEPARATOR)
    };

    entries.iter().filter_map(Value::as_str).any(|n| {
        n == candidate || (is_folder && n.starts_with(&folder_prefix))
    })
}

/// Refuse a name already present remotely. A failed check lets the upload proceed.
pub async fn ensure_name_available<A: NotesApi>(
    api: &A,
    candidate: &str,
    is_folder: bool,
) -> Result<()> {
    let query = (!candidate.is_empty()).then_some(candidate);
    match api.search(query).await {
        Ok(listing) if name_taken(&listing, candidate, is_folder) => {
            Err(NotesError::NameTaken(NAME_TAKEN_MESSAGE.to_string()))
        }
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::warn!(error = %e, "name availability check failed, relying on server");
            Ok(())
        }
    }
}

fn check_reply(reply: UploadReply) -> Result<()> {
    if reply.status == CONFLICT {
        let msg = if reply.body.trim().is_empty() {
            NAME_TAKEN_MESSAGE.to_string()
        } else {
            reply.body
        };
        return Err(NotesError::NameTaken(msg));
    }
    if !(200..300).contains(&reply.status) {
        let msg = if reply.body.trim().is_empty() {
            UPLOAD_FAILED_MESSAGE.to_string()
        } else {
            reply.body
        };
        return Err(NotesError::UploadFailed(msg));
    }
    Ok(())
}

/// Upload a file or a folder
pub async fn upload_path<A: NotesApi>(
    api: &A,
    path: &Path,
    options: &UploadOptions,
) -> Result<UploadOutcome> {
    let metadata = tokio::fs::metadata(path).await.ok();
    if metadata.as_ref().is_some_and(|m| m.is_dir()) {
        let (root, files) = collect_folder(path).await?;
        if files.is_empty() {
            return Err(NotesError::InvalidInput(
                "Please select a file or folder".to_string(),
            ));
        }
        let (final_root, form) = folder_form(&root, &files, options)?;
        ensure_name_available(api, &final_root, true).await?;
        tracing::info!(root = %final_root, files = files.len(), "uploading folder");
        check_reply(api.upload(form).await?)?;
        return Ok(UploadOutcome::Folder(final_root));
    }

    if !metadata.is_some_and(|m| m.is_file()) {
        return Err(NotesError::InvalidInput(
            "Please select a file or folder".to_string(),
        ));
    }

    let original = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let bytes = tokio::fs::read(path).await?;
    let (final_name, form) = single_file_form(&original, bytes, options);
    ensure_name_available(api, &final_name, false).await?;
    tracing::info!(name = %final_name, "uploading file");
    check_reply(api.upload(form).await?)?;
    Ok(UploadOutcome::File(final_name))
}
