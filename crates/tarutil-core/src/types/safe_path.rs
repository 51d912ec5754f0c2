//! Lexically contained archive paths.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Normalizes an archive path as if it were rooted at `/`.
///
/// - root and prefix components are dropped, so absolute names become relative
/// - `.` components are dropped
/// - `..` removes the previous component and is discarded at the top level
///
/// The result contains only normal components, so joining it to a root can
/// never produce a path outside that root. Normalization happens before the
/// join: joining first would leave literal `..` components for the kernel to
/// follow.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tarutil_core::types::normalize_entry_path;
///
/// assert_eq!(normalize_entry_path(Path::new("../../etc/passwd")), Path::new("etc/passwd"));
/// assert_eq!(normalize_entry_path(Path::new("a/../../b")), Path::new("b"));
/// assert_eq!(normalize_entry_path(Path::new("/usr/./lib/")), Path::new("usr/lib"));
/// assert_eq!(normalize_entry_path(Path::new("..")), Path::new(""));
/// ```
#[must_use]
pub fn normalize_entry_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// A relative path made only of normal components.
///
/// `SafePath` can only be built through normalization, so it never contains
/// `..`, a root, or a prefix. An empty `SafePath` denotes the root itself.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tarutil_core::types::SafePath;
///
/// let link = SafePath::new(Path::new("a/c"));
/// let target = SafePath::for_symlink_target(&link, Path::new("b.txt"));
/// assert_eq!(target.as_path(), Path::new("a/b.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Normalizes an entry name into a `SafePath`.
    #[must_use]
    pub fn new(name: &Path) -> Self {
        Self(normalize_entry_path(name))
    }

    /// Contains a hard link target.
    ///
    /// Hard link targets name another archive member, so they are resolved
    /// from the archive root.
    #[must_use]
    pub fn for_hardlink_target(target: &Path) -> Self {
        Self::new(target)
    }

    /// Contains a symbolic link target.
    ///
    /// An absolute target is re-rooted at the archive root. A relative target
    /// is resolved from the directory holding the link, then normalized, so
    /// `..` can climb at most to the archive root.
    #[must_use]
    pub fn for_symlink_target(link: &Self, target: &Path) -> Self {
        if target.has_root() {
            return Self::new(target);
        }
        let base = link.0.parent().unwrap_or_else(|| Path::new(""));
        Self::new(&base.join(target))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns `true` if the path denotes the root itself.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }
}

impl AsRef<Path> for SafePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_relative_path_unchanged() {
        let safe = SafePath::new(Path::new("usr/lib/libz.so"));
        assert_eq!(safe.as_path(), Path::new("usr/lib/libz.so"));
        assert!(!safe.is_root());
    }

    #[test]
    fn test_leading_parent_dirs_are_dropped() {
        let safe = SafePath::new(Path::new("../../etc/passwd"));
        assert_eq!(safe.as_path(), Path::new("etc/passwd"));
    }

    #[test]
    fn test_interior_parent_dir_pops() {
        assert_eq!(
            SafePath::new(Path::new("a/b/../c")).as_path(),
            Path::new("a/c")
        );
        assert_eq!(
            SafePath::new(Path::new("a/../../b")).as_path(),
            Path::new("b")
        );
    }

    #[test]
    fn test_absolute_path_is_rerooted() {
        let safe = SafePath::new(Path::new("/etc/shadow"));
        assert_eq!(safe.as_path(), Path::new("etc/shadow"));
    }

    #[test]
    fn test_current_dir_and_trailing_slash() {
        assert_eq!(
            SafePath::new(Path::new("./a/./b/")).as_path(),
            Path::new("a/b")
        );
        assert!(SafePath::new(Path::new("./")).is_root());
        assert!(SafePath::new(Path::new("")).is_root());
        assert!(SafePath::new(Path::new("../..")).is_root());
    }

    #[test]
    fn test_no_parent_components_survive() {
        for name in ["..", "../x", "x/../../..", "/../../x/..", "a/./../../b/../c"] {
            let safe = SafePath::new(Path::new(name));
            assert!(
                safe.as_path()
                    .components()
                    .all(|c| matches!(c, Component::Normal(_))),
                "{name} normalized to {}",
                safe.as_path().display()
            );
        }
    }

    #[test]
    fn test_hardlink_target_from_archive_root() {
        let target = SafePath::for_hardlink_target(Path::new("a/b.txt"));
        assert_eq!(target.as_path(), Path::new("a/b.txt"));

        let target = SafePath::for_hardlink_target(Path::new("../../../etc/passwd"));
        assert_eq!(target.as_path(), Path::new("etc/passwd"));
    }

    #[test]
    fn test_symlink_relative_target_uses_link_directory() {
        let link = SafePath::new(Path::new("a/c"));
        let target = SafePath::for_symlink_target(&link, Path::new("b.txt"));
        assert_eq!(target.as_path(), Path::new("a/b.txt"));

        let target = SafePath::for_symlink_target(&link, Path::new("../d/e"));
        assert_eq!(target.as_path(), Path::new("d/e"));
    }

    #[test]
    fn test_symlink_target_cannot_climb_above_root() {
        let link = SafePath::new(Path::new("a/b/link"));
        let target = SafePath::for_symlink_target(&link, Path::new("../../../../../etc/passwd"));
        assert_eq!(target.as_path(), Path::new("etc/passwd"));
    }

    #[test]
    fn test_symlink_absolute_target_is_rerooted() {
        let link = SafePath::new(Path::new("a/b/link"));
        let target = SafePath::for_symlink_target(&link, Path::new("/usr/lib/foo"));
        assert_eq!(target.as_path(), Path::new("usr/lib/foo"));
    }

    #[test]
    fn test_symlink_at_top_level() {
        let link = SafePath::new(Path::new("link"));
        let target = SafePath::for_symlink_target(&link, Path::new("file"));
        assert_eq!(target.as_path(), Path::new("file"));
    }
}
