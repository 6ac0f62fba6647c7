use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::errors::{FsError, FsResult};
use crate::core::path::{is_sub_path, normalize, resolve_path};
use crate::core::stater::Stater;

///
/// The directory every file operation is confined to. The root is normalized
/// once on construction and never changes afterwards.
///
#[derive(Clone, Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new<P: AsRef<Path>>(root: P) -> Workspace {
        Workspace {
            root: normalize(root.as_ref()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &str) -> FsResult<PathBuf> {
        resolve_path(&self.root, path)
    }

    pub async fn remove_empty_dirs(&self, dir: &Path) -> FsResult<()> {
        remove_empty_dirs(&self.root, dir).await
    }
}

///
/// Walk upwards from `dir`, removing every directory that is empty, and stop
/// at the first non-empty one or at `root`. `root` itself is never removed.
///
/// Directories that are already gone, whether before the walk or because a
/// concurrent request removed them in the meantime, are skipped.
///
pub async fn remove_empty_dirs(root: &Path, dir: &Path) -> FsResult<()> {
    let mut current = normalize(dir);
    if !is_sub_path(root, &current) {
        return Err(FsError::invalid_path(dir));
    }

    while current != root {
        match Stater::new().expect_dir().stat(&current).await {
            Ok(_) => {}
            Err(FsError::NotFound(_)) => {
                current.pop();
                continue;
            }
            Err(err) => return Err(err),
        }

        match is_empty_dir(&current).await {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(FsError::NotFound(_)) => {
                current.pop();
                continue;
            }
            Err(err) => return Err(err),
        }

        if let Err(err) = fs::remove_dir(&current).await {
            match FsError::from_io(err, &current) {
                FsError::NotFound(_) => {}
                err => {
                    error!("Failed to remove empty dir {}: {}", current.display(), err);
                    return Err(err);
                }
            }
        }

        current.pop();
    }

    Ok(())
}

async fn is_empty_dir(path: &Path) -> FsResult<bool> {
    let mut entries = fs::read_dir(path)
        .await
        .map_err(|err| FsError::from_io(err, path))?;

    let first = entries
        .next_entry()
        .await
        .map_err(|err| FsError::from_io(err, path))?;

    Ok(first.is_none())
}
