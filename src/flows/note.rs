//! Quick note - save free text as `my-notes.txt`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

pub const NOTE_FILE_NAME: &str = "my-notes.txt";

/// Write `text` to `<out_dir>/my-notes.txt`, replacing any earlier note
pub async fn save_note(text: &str, out_dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let path = out_dir.join(NOTE_FILE_NAME);
    tokio::fs::write(&path, text)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Run the note command. Without TEXT the note is read from stdin.
pub async fn run_note(text: Option<String>, out_dir: &Path, quiet: bool) -> Result<()> {
    let text = match text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read note from stdin")?;
            buf
        }
    };

    let path = save_note(&text, out_dir).await?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "saved note");
    if !quiet {
        println!("{}", path.display());
    }
    Ok(())
}
