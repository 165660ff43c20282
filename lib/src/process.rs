use std::path::Path;

use crate::error::{Result, SlugError};
use crate::frontmatter::{self, Frontmatter};
use crate::headings;
use crate::markdown::{Highlighter, Markdown};
use crate::post::Post;
use crate::util::PathExt;

/// Turns one document into a [`Post`].
///
/// Holds no per-document state: a single processor can be shared across
/// threads and documents are processed independently.
#[derive(Debug)]
pub struct Processor {
    markdown: Markdown,
}

impl Processor {
    /// A processor with the default renderer. Fails if the highlighter's
    /// grammars can't be resolved.
    pub fn new() -> Result<Self> {
        Ok(Processor::with_markdown(Markdown::new(Highlighter::new()?)))
    }

    pub fn with_markdown(markdown: Markdown) -> Self {
        Processor { markdown }
    }

    pub fn process(&self, path: &Path, text: &str) -> Result<Post> {
        let (block, body) = frontmatter::split(text)?;
        let frontmatter = Frontmatter::validate(block)?;
        let headings = headings::extract(body);
        let html = self.markdown.render(body)?;
        let slug = path.slug_stem().ok_or_else(|| SlugError::new(path))?;

        log::debug!("processed {} ({} headings, {} bytes of html)",
            path.display(), headings.len(), html.len());

        Ok(Post { frontmatter, slug: slug.to_string(), html, headings })
    }
}
