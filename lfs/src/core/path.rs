use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use crate::core::errors::{FsError, FsResult};

///
/// Lexically clean a path: drop `.` segments and fold `..` into its parent.
/// A `..` at the top of an absolute path stays at the root, the same way the
/// filesystem itself treats it.
///
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(segment) => normalized.push(segment),
        }
    }

    normalized
}

///
/// Whether `path` lies strictly below `parent`. Both are expected to be
/// normalized; the comparison is done component by component so `/data2` is
/// never taken to be inside `/data`.
///
pub fn is_sub_path(parent: &Path, path: &Path) -> bool {
    path != parent && path.starts_with(parent)
}

///
/// Map a request path (forward slash separated, as it arrives over the wire)
/// onto an absolute path below `root`.
///
/// Every segment is appended as a relative name, so a leading slash or an
/// embedded drive prefix cannot replace `root`. The joined path is then
/// normalized and has to remain a strict descendant of `root`, otherwise the
/// request is rejected with `InvalidPath`. So is any path carrying a NUL
/// byte, which no filesystem call accepts.
///
pub fn resolve_path(root: &Path, path: &str) -> FsResult<PathBuf> {
    if path.contains('\0') {
        return Err(FsError::invalid_path(path));
    }

    let mut joined = root.to_path_buf();

    for segment in path.split(|c| c == '/' || c == MAIN_SEPARATOR) {
        if !segment.is_empty() {
            joined.push(segment);
        }
    }

    let resolved = normalize(&joined);
    if !is_sub_path(root, &resolved) {
        return Err(FsError::invalid_path(path));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/srv/lfs")
    }

    #[test]
    fn it_should_resolve_paths_inside_the_root() {
        assert_eq!(
            resolve_path(&root(), "/a/b/c.txt").unwrap(),
            PathBuf::from("/srv/lfs/a/b/c.txt")
        );
        assert_eq!(
            resolve_path(&root(), "a//./b/../c.txt").unwrap(),
            PathBuf::from("/srv/lfs/a/c.txt")
        );
    }

    #[test]
    fn it_should_reject_parent_traversal() {
        for path in &[
            "/../etc/passwd",
            "..",
            "a/../../lfs2/x",
            "a/b/../../../x",
            "/a/../../../../etc/passwd",
        ] {
            assert!(
                matches!(resolve_path(&root(), path), Err(FsError::InvalidPath(_))),
                "expected {} to be rejected",
                path
            );
        }
    }

    #[test]
    fn it_should_reject_the_root_itself() {
        for path in &["", "/", ".", "/./", "a/.."] {
            assert!(matches!(
                resolve_path(&root(), path),
                Err(FsError::InvalidPath(_))
            ));
        }
    }

    #[test]
    fn it_should_reject_nul_bytes() {
        for path in &["/a\0b.txt", "/dir\0/c.txt", "\0"] {
            assert!(matches!(
                resolve_path(&root(), path),
                Err(FsError::InvalidPath(_))
            ));
        }
    }

    #[test]
    fn it_should_keep_absolute_injections_below_the_root() {
        assert_eq!(
            resolve_path(&root(), "//etc/passwd").unwrap(),
            PathBuf::from("/srv/lfs/etc/passwd")
        );
    }

    #[test]
    fn it_should_not_treat_a_sibling_with_a_shared_prefix_as_inside() {
        assert!(!is_sub_path(&root(), Path::new("/srv/lfs2/a")));
        assert!(!is_sub_path(&root(), Path::new("/srv/lfs")));
        assert!(is_sub_path(&root(), Path::new("/srv/lfs/a")));
        assert!(matches!(
            resolve_path(&root(), "../lfs2/a"),
            Err(FsError::InvalidPath(_))
        ));
    }

    #[test]
    fn it_should_normalize_lexically() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }
}
