use std::path::{Path, PathBuf};

use crate::error::{Chainable, Result};
use crate::util::PathExt;

/// A content file's path and its full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    pub fn new(path: PathBuf, text: String) -> Self {
        Document { path, text }
    }

    /// Reads every markdown file directly inside `dir`, sorted by path.
    /// Subdirectories are not searched.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Vec<Document>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return err! {
                "content directory does not exist",
                "search root" => dir.display(),
            };
        }

        let walker = jwalk::WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort(true)
            .follow_links(true);

        let mut documents = vec![];
        for entry in walker {
            let entry = entry.map_err(|e| error! {
                "failed to read content directory",
                "search root" => dir.display(),
                "cause" => e,
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() || !path.is_markdown() {
                continue;
            }

            let text = std::fs::read_to_string(&path).chain_with(|| error! {
                "failed to read document",
                "path" => path.display(),
            })?;

            documents.push(Document { path, text });
        }

        if documents.is_empty() {
            log::warn!("no markdown documents found in {}", dir.display());
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn discovers_markdown_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "B").unwrap();
        fs::write(dir.path().join("a.markdown"), "A").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.md"), "skip").unwrap();

        let docs = Document::discover(dir.path()).unwrap();
        let names: Vec<_> = docs.iter()
            .map(|d| d.path.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, ["a.markdown", "b.md"]);
        assert_eq!(docs[0].text, "A");
    }

    #[test]
    fn empty_directory_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Document::discover(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = Document::discover(dir.path().join("nope")).unwrap_err();
        assert!(error.to_string().contains("content directory does not exist"));
    }

    #[test]
    fn non_utf8_documents_fail() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.md"), [0xff, 0xfe, 0x00]).unwrap();
        let error = Document::discover(dir.path()).unwrap_err();
        assert!(error.to_string().starts_with("failed to read document\n"));
    }
}
