use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::errors::{FsError, FsResult};
use crate::core::middleware::Filters;
use crate::core::path::normalize;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_SERVE_PORT: u16 = 8080;

///
/// Everything needed to build an `App`: where to listen, which directory to
/// serve, and the filters to run ahead of each file operation.
///
pub struct Configuration {
    pub bind_addr: String,
    /// `0` falls back to `DEFAULT_SERVE_PORT`.
    pub serve_port: u16,
    /// The workspace directory; made absolute by `set_defaults`.
    pub path: PathBuf,

    pub fetch_filters: Filters,
    pub upload_filters: Filters,
    pub delete_filters: Filters,
}

impl Configuration {
    pub fn new<P: Into<PathBuf>>(path: P) -> Configuration {
        Configuration {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            serve_port: 0,
            path: path.into(),
            fetch_filters: Vec::new(),
            upload_filters: Vec::new(),
            delete_filters: Vec::new(),
        }
    }

    pub fn set_defaults(&mut self) -> FsResult<()> {
        if self.serve_port == 0 {
            self.serve_port = DEFAULT_SERVE_PORT;
        }

        self.prepare_path()
    }

    ///
    /// Make the workspace path absolute and normalized, then create it if it is
    /// missing. The filesystem root is refused as a workspace.
    ///
    pub fn prepare_path(&mut self) -> FsResult<()> {
        let path = if self.path.is_absolute() {
            self.path.clone()
        } else {
            env::current_dir().map_err(FsError::Io)?.join(&self.path)
        };
        self.path = normalize(&path);

        if self.path.parent().is_none() {
            return Err(FsError::invalid_path(&self.path));
        }

        match fs::metadata(&self.path) {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(FsError::invalid_path(&self.path)),
            Err(_) => fs::create_dir_all(&self.path).map_err(|err| FsError::from_io(err, &self.path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn it_should_default_the_port_and_create_the_workspace() {
        let dir = tempdir().unwrap();
        let mut config = Configuration::new(dir.path().join("a/../workspace"));

        config.set_defaults().unwrap();

        assert_eq!(config.serve_port, DEFAULT_SERVE_PORT);
        assert_eq!(config.path, dir.path().join("workspace"));
        assert!(config.path.is_dir());
    }

    #[test]
    fn it_should_keep_an_explicit_port() {
        let dir = tempdir().unwrap();
        let mut config = Configuration::new(dir.path());
        config.serve_port = 9000;

        config.set_defaults().unwrap();

        assert_eq!(config.serve_port, 9000);
    }

    #[test]
    fn it_should_refuse_the_filesystem_root() {
        let mut config = Configuration::new("/");

        assert!(matches!(
            config.prepare_path(),
            Err(FsError::InvalidPath(_))
        ));
    }

    #[test]
    fn it_should_refuse_a_regular_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        let mut config = Configuration::new(&file);

        assert!(matches!(
            config.prepare_path(),
            Err(FsError::InvalidPath(_))
        ));
    }

    #[test]
    fn it_should_resolve_relative_paths_against_the_current_dir() {
        let mut config = Configuration::new("target/lfs-config-test");

        config.prepare_path().unwrap();

        assert!(config.path.is_absolute());
        assert!(config.path.ends_with("target/lfs-config-test"));
        let _ = std::fs::remove_dir(&config.path);
    }
}
