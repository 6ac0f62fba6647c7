use std::fs::Metadata;
use std::path::Path;
use tokio::fs;

use crate::core::errors::{FsError, FsResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    RegularFile,
    Dir,
}

impl EntryKind {
    fn matches(self, metadata: &Metadata) -> bool {
        match self {
            EntryKind::RegularFile => metadata.is_file(),
            EntryKind::Dir => metadata.is_dir(),
        }
    }
}

///
/// Existence and kind policy checked before touching a path.
///
/// ```ignore
/// Stater::new().not_exist_ok().expect_regular_file().stat(&path).await?;
/// ```
///
#[derive(Clone, Copy, Debug, Default)]
pub struct Stater {
    not_exist_ok: bool,
    kind: Option<EntryKind>,
}

impl Stater {
    pub fn new() -> Stater {
        Stater::default()
    }

    /// Treat a missing entry as a success.
    pub fn not_exist_ok(mut self) -> Stater {
        self.not_exist_ok = true;
        self
    }

    pub fn expect_regular_file(mut self) -> Stater {
        self.kind = Some(EntryKind::RegularFile);
        self
    }

    pub fn expect_dir(mut self) -> Stater {
        self.kind = Some(EntryKind::Dir);
        self
    }

    ///
    /// Stat `path` against the policy. Returns the metadata when the entry
    /// exists, `None` when it is absent and absence is allowed.
    ///
    pub async fn stat(&self, path: &Path) -> FsResult<Option<Metadata>> {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(err) => {
                return match FsError::from_io(err, path) {
                    FsError::NotFound(_) if self.not_exist_ok => Ok(None),
                    err => Err(err),
                };
            }
        };

        match self.kind {
            Some(kind) if !kind.matches(&metadata) => Err(FsError::invalid_path(path)),
            _ => Ok(Some(metadata)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn it_should_reject_missing_entries_unless_allowed() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = Stater::new()
            .expect_regular_file()
            .stat(&missing)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let found = Stater::new()
            .not_exist_ok()
            .expect_regular_file()
            .stat(&missing)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn it_should_reject_the_wrong_kind() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, b"data").unwrap();

        assert!(matches!(
            Stater::new().expect_dir().stat(&file).await,
            Err(FsError::InvalidPath(_))
        ));
        assert!(matches!(
            Stater::new().not_exist_ok().expect_regular_file().stat(dir.path()).await,
            Err(FsError::InvalidPath(_))
        ));
        assert!(Stater::new()
            .expect_regular_file()
            .stat(&file)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn it_should_accept_any_kind_without_an_expectation() {
        let dir = tempdir().unwrap();

        assert!(Stater::new().stat(dir.path()).await.unwrap().is_some());
    }
}
