//! Extraction options.

use bitflags::bitflags;

bitflags! {
    /// Capabilities enabled for one extraction run.
    ///
    /// Each flag is an independent toggle; combine them with `|`. The empty set
    /// only creates files and directories: files get mode `0o666` and
    /// directories `0o777`, both subject to the process umask.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarutil_core::ExtractOptions;
    ///
    /// let options = ExtractOptions::SYMLINK | ExtractOptions::CHMOD;
    /// assert!(options.contains(ExtractOptions::SYMLINK));
    /// assert!(!options.contains(ExtractOptions::CHOWN));
    /// assert_eq!(ExtractOptions::default(), ExtractOptions::empty());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExtractOptions: u32 {
        /// Create hard links.
        const LINK    = 1 << 0;
        /// Create symbolic links.
        const SYMLINK = 1 << 1;
        /// Apply numeric uid/gid. User and group names are ignored.
        ///
        /// Symlinks are changed themselves (`lchown`), never their targets.
        const CHOWN   = 1 << 2;
        /// Apply permission bits (`mode & 0o777`).
        ///
        /// Skipped for symlink entries: the link's target is left untouched,
        /// and a dangling link is not an error.
        const CHMOD   = 1 << 3;
        /// Apply access and modification times.
        ///
        /// Symlinks get the times set on the link itself.
        const CHTIMES = 1 << 4;
    }
}

impl ExtractOptions {
    /// Everything a privileged image unpacker wants: links plus full metadata.
    #[must_use]
    pub const fn preserve_all() -> Self {
        Self::all()
    }

    /// Returns `true` if any metadata step is enabled.
    #[must_use]
    pub const fn applies_metadata(self) -> bool {
        self.intersects(
            Self::CHOWN
                .union(Self::CHMOD)
                .union(Self::CHTIMES),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let options = ExtractOptions::default();
        assert!(options.is_empty());
        assert!(!options.applies_metadata());
    }

    #[test]
    fn test_flags_are_independent() {
        let all = [
            ExtractOptions::LINK,
            ExtractOptions::SYMLINK,
            ExtractOptions::CHOWN,
            ExtractOptions::CHMOD,
            ExtractOptions::CHTIMES,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_composition_is_order_insensitive() {
        let a = ExtractOptions::CHMOD | ExtractOptions::LINK;
        let b = ExtractOptions::LINK | ExtractOptions::CHMOD;
        assert_eq!(a, b);
        assert!(a.applies_metadata());
    }

    #[test]
    fn test_preserve_all() {
        let options = ExtractOptions::preserve_all();
        assert!(options.contains(ExtractOptions::LINK | ExtractOptions::SYMLINK));
        assert!(options.contains(ExtractOptions::CHOWN | ExtractOptions::CHMOD));
        assert!(options.contains(ExtractOptions::CHTIMES));
    }

    #[test]
    fn test_links_alone_apply_no_metadata() {
        let options = ExtractOptions::LINK | ExtractOptions::SYMLINK;
        assert!(!options.applies_metadata());
    }
}
