use std::path::{Path, PathBuf};

use serde::Deserialize;

use quire::External;
use quire::corpus::DEFAULT_TOP_KEYWORDS;
use quire::error::Result;
use quire::format::{Format, Toml};
use quire::markdown::DEFAULT_MARKER;

/// Site-wide settings, read from [`crate::CONFIG_FILE`] at the site root.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Absolute URL the site is served from, e.g. `https://example.com`.
    pub origin: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default = "default_content")]
    pub content: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_top_keywords")]
    pub top_keywords: usize,
    #[serde(default = "default_embed_marker")]
    pub embed_marker: String,
    #[serde(default)]
    pub external: Vec<External>,
}

fn default_content() -> PathBuf {
    crate::CONTENT_DIR.into()
}

fn default_output() -> PathBuf {
    crate::OUTPUT_DIR.into()
}

fn default_top_keywords() -> usize {
    DEFAULT_TOP_KEYWORDS
}

fn default_embed_marker() -> String {
    DEFAULT_MARKER.into()
}

impl Settings {
    /// Reads the config file in `root`. Relative directories are resolved
    /// against `root`.
    pub fn discover<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let mut settings: Settings = Toml::read(root.join(crate::CONFIG_FILE))?;
        settings.content = root.join(&settings.content);
        settings.output = root.join(&settings.output);
        settings.origin = settings.origin.trim_end_matches('/').to_string();
        Ok(settings)
    }

    /// The absolute URL of a post: its own for external posts.
    pub fn post_url(&self, post: &quire::Post) -> String {
        match post.is_external() {
            true => post.slug.clone(),
            false => format!("{}/posts/{}", self.origin, post.slug),
        }
    }
}
