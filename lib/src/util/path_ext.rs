use std::path::Path;

pub trait PathExt: AsRef<Path> {
    /// The file name up to its first `.`, or `None` if that is empty or the
    /// path has no (UTF-8) file name.
    fn slug_stem(&self) -> Option<&str>;

    /// Whether the path names a markdown file by extension.
    fn is_markdown(&self) -> bool;
}

impl PathExt for Path {
    fn slug_stem(&self) -> Option<&str> {
        let file_name = self.file_name()?.to_str()?;
        match file_name.split('.').next() {
            Some(stem) if !stem.is_empty() => Some(stem),
            _ => None,
        }
    }

    fn is_markdown(&self) -> bool {
        const KNOWN_EXTS: &[&str] = &["md", "mdown", "markdown"];

        self.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| KNOWN_EXTS.iter().any(|k| k.eq_ignore_ascii_case(ext)))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::PathExt;

    #[test]
    fn slug_stem() {
        assert_eq!(Path::new("../../content/hello-world.md").slug_stem(), Some("hello-world"));
        assert_eq!(Path::new("content/notes.draft.md").slug_stem(), Some("notes"));
        assert_eq!(Path::new("README").slug_stem(), Some("README"));
        assert_eq!(Path::new("content/.md").slug_stem(), None);
        assert_eq!(Path::new("/").slug_stem(), None);
        assert_eq!(Path::new("").slug_stem(), None);
    }

    #[test]
    fn markdown_extensions() {
        assert!(Path::new("a/b.md").is_markdown());
        assert!(Path::new("a/b.MARKDOWN").is_markdown());
        assert!(!Path::new("a/b.toml").is_markdown());
        assert!(!Path::new("a/md").is_markdown());
    }
}
