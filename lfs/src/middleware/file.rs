use std::path::Path;
use std::sync::Arc;
use tokio::fs::{self, File};
use tokio::io;

use crate::core::context::FilterContext;
use crate::core::errors::{FsError, FsResult};
use crate::core::middleware::{Filter, FilterNext, FilterReturnValue};
use crate::core::path::is_sub_path;
use crate::core::stater::Stater;
use crate::core::workspace::Workspace;

///
/// The three built-in file operations, each confined to the workspace.
///
#[derive(Clone, Debug)]
pub struct FileHandler {
    workspace: Arc<Workspace>,
}

impl FileHandler {
    pub fn new(workspace: Arc<Workspace>) -> FileHandler {
        FileHandler { workspace }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    ///
    /// Open the requested file and attach it as the context's file content. The
    /// file stays open until the response body has been written.
    ///
    pub async fn load_file(&self, context: &mut FilterContext) -> FsResult<()> {
        let path = self.workspace.resolve(&context.file_path)?;

        Stater::new().expect_regular_file().stat(&path).await?;

        let file = File::open(&path)
            .await
            .map_err(|err| FsError::from_io(err, &path))?;
        context.file_content = Some(Box::new(file));

        Ok(())
    }

    ///
    /// Write the context's file content to the requested path, creating any
    /// missing parent directories and replacing an existing file.
    ///
    /// A copy that fails midway leaves the partially written file behind.
    ///
    pub async fn create_file(&self, context: &mut FilterContext) -> FsResult<()> {
        let mut content = context
            .file_content
            .take()
            .ok_or_else(|| FsError::InvalidRequest("missing file content".to_string()))?;

        let path = self.workspace.resolve(&context.file_path)?;

        Stater::new()
            .not_exist_ok()
            .expect_regular_file()
            .stat(&path)
            .await?;

        let mut file = match self.open_for_create(&path).await {
            Ok(file) => file,
            Err(err) => {
                error!("Failed to create file {}: {}", path.display(), err);
                return Err(err);
            }
        };

        if let Err(err) = io::copy(&mut content, &mut file).await {
            info!("Failed to upload file {}: {}", path.display(), err);
            return Err(FsError::Io(err));
        }

        Ok(())
    }

    ///
    /// Remove the requested file if it exists, then prune the directories it
    /// leaves empty. Pruning runs whether or not the removal succeeded, stops
    /// short of the root, and its failures are only logged.
    ///
    pub async fn delete_file(&self, context: &mut FilterContext) -> FsResult<()> {
        let path = self.workspace.resolve(&context.file_path)?;

        let result = self.remove_file(&path).await;

        match path.parent() {
            Some(parent) if parent != self.workspace.root() => {
                if let Err(err) = self.workspace.remove_empty_dirs(parent).await {
                    error!("Failed to clear empty dir for {}: {}", path.display(), err);
                }
            }
            _ => {}
        }

        result
    }

    async fn remove_file(&self, path: &Path) -> FsResult<()> {
        let exists = Stater::new()
            .not_exist_ok()
            .expect_regular_file()
            .stat(path)
            .await?
            .is_some();

        if !exists {
            return Ok(());
        }

        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                error!("Failed to remove file {}: {}", path.display(), err);
                Err(FsError::Io(err))
            }
        }
    }

    async fn open_for_create(&self, path: &Path) -> FsResult<File> {
        if let Some(dir) = path.parent() {
            self.ensure_dir(dir).await?;
        }

        File::create(path)
            .await
            .map_err(|err| FsError::from_io(err, path))
    }

    ///
    /// Create `dir` and its missing ancestors. The nearest existing ancestor
    /// has to be a directory, otherwise the path is invalid.
    ///
    async fn ensure_dir(&self, dir: &Path) -> FsResult<()> {
        let root = self.workspace.root();

        for ancestor in dir.ancestors() {
            if ancestor != root && !is_sub_path(root, ancestor) {
                break;
            }

            match fs::metadata(ancestor).await {
                Ok(metadata) if metadata.is_dir() => break,
                Ok(_) => return Err(FsError::invalid_path(ancestor)),
                // Missing, or hidden behind a non-directory further up.
                Err(_) => continue,
            }
        }

        fs::create_dir_all(dir)
            .await
            .map_err(|err| FsError::from_io(err, dir))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileOperation {
    Load,
    Create,
    Delete,
}

///
/// The innermost step of every chain: runs one file operation and translates
/// its outcome into a response status. Success leaves the status undecided.
///
pub struct FileFilter {
    handler: FileHandler,
    operation: FileOperation,
}

impl FileFilter {
    pub fn new(handler: FileHandler, operation: FileOperation) -> FileFilter {
        FileFilter { handler, operation }
    }

    async fn run(&self, context: &mut FilterContext) -> FsResult<()> {
        match self.operation {
            FileOperation::Load => self.handler.load_file(context).await,
            FileOperation::Create => self.handler.create_file(context).await,
            FileOperation::Delete => self.handler.delete_file(context).await,
        }
    }
}

impl Filter for FileFilter {
    fn invoke<'a>(
        &'a self,
        context: &'a mut FilterContext,
        _next: FilterNext<'a>,
    ) -> FilterReturnValue<'a> {
        Box::pin(async move {
            if let Err(err) = self.run(context).await {
                debug!("{:?} of '{}' failed: {}", self.operation, context.file_path, err);
                context.status(err.status_code().as_u16());
            }
        })
    }
}
