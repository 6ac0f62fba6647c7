use hyper::StatusCode;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type FsResult<T> = Result<T, FsError>;

///
/// The error kinds surfaced by the file operations. Each kind maps onto exactly
/// one response status, see `FsError::status_code`.
///
#[derive(Error, Debug)]
pub enum FsError {
    /// Escapes the workspace, names the wrong kind of entry, or is otherwise malformed.
    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The request is missing something the operation needs, e.g. an upload body.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("io error: {0}")]
    Io(#[source] io::Error),
}

impl FsError {
    ///
    /// Classify a raw I/O error raised while touching `path`. Absence is kept
    /// distinct so it can be reported as a 404, everything else is an internal
    /// failure. A path running through a regular file does not exist either.
    ///
    pub fn from_io(err: io::Error, path: &Path) -> FsError {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                FsError::NotFound(path.to_path_buf())
            }
            _ => FsError::Io(err),
        }
    }

    pub fn invalid_path<P: AsRef<Path>>(path: P) -> FsError {
        FsError::InvalidPath(path.as_ref().to_path_buf())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }

    ///
    /// The status a failed file operation is answered with.
    ///
    pub fn status_code(&self) -> StatusCode {
        match self {
            FsError::NotFound(_) => StatusCode::NOT_FOUND,
            FsError::InvalidPath(_) | FsError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            FsError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_map_each_kind_to_its_status() {
        assert_eq!(
            FsError::NotFound(PathBuf::from("/a")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            FsError::invalid_path("/a").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FsError::InvalidRequest("no content".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FsError::Io(io::Error::new(io::ErrorKind::Other, "boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn it_should_classify_missing_entries_as_not_found() {
        let err = FsError::from_io(
            io::Error::new(io::ErrorKind::NotFound, "gone"),
            Path::new("/tmp/x"),
        );
        assert!(err.is_not_found());

        let err = FsError::from_io(
            io::Error::new(io::ErrorKind::NotADirectory, "below a file"),
            Path::new("/tmp/file/x"),
        );
        assert!(err.is_not_found());

        let err = FsError::from_io(
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
            Path::new("/tmp/x"),
        );
        assert!(matches!(err, FsError::Io(_)));
    }
}
