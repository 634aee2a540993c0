use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::corpus::Corpus;
use crate::{LoadError, Snapshot};

/// Reads every `*.json` file directly inside `dir`, sorted by file name.
///
/// Identifiers are bare file names; date filtering is left to
/// [`Corpus::build`]. With `strict` unset, unreadable or malformed files are
/// logged and skipped instead of failing the load.
pub async fn load_snapshot_dir(
    dir: &Path,
    strict: bool,
) -> Result<Vec<(String, Snapshot)>, LoadError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|source| LoadError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|source| LoadError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?
    {
        let path = entry.path();
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json && path.is_file() {
            paths.push(path);
        } else {
            debug!(path = %path.display(), "ignoring non-snapshot entry");
        }
    }
    paths.sort();

    let mut snapshots = Vec::with_capacity(paths.len());
    for path in paths {
        match read_snapshot(&path).await {
            Ok(snapshot) => {
                let identifier = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                snapshots.push((identifier, snapshot));
            }
            Err(err) if !strict => {
                warn!(error = %err, "skipping unreadable snapshot");
            }
            Err(err) => return Err(err),
        }
    }

    info!(dir = %dir.display(), files = snapshots.len(), "snapshot files loaded");
    Ok(snapshots)
}

pub async fn read_snapshot(path: &Path) -> Result<Snapshot, LoadError> {
    let data = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&data).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads `dir` and indexes it in one step.
pub async fn load_corpus(
    dir: &Path,
    directory_label: &str,
    strict: bool,
) -> Result<Corpus, LoadError> {
    let snapshots = load_snapshot_dir(dir, strict).await?;
    Ok(Corpus::build(directory_label, snapshots))
}
