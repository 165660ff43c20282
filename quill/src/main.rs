use std::path::Path;

use log::LevelFilter;
use simple_logger::SimpleLogger;

use quire::{error, Aggregator, Corpus, Document, Mode, Post, Processor};
use quire::error::{Chainable, Result};
use quire::markdown::{Highlighter, Markdown};

use crate::config::Settings;

mod config;
mod feed;

pub const CONFIG_FILE: &str = "quill.toml";
pub const CONTENT_DIR: &str = "content";
pub const OUTPUT_DIR: &str = "public";
pub const FEED_FILE: &str = "rss.xml";

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Builds a blog's post index, RSS feed, and robots file.
        cmd quill {
            /// The site root, containing `quill.toml`.
            required root: PathBuf
            /// Write outputs here instead of the configured directory.
            optional -o, --output output: PathBuf
            /// Development mode: include drafts.
            optional --dev
            /// Log every processed document.
            optional -v, --verbose
        }
    }
}

pub fn main() {
    let flags = flags::Quill::from_env_or_exit();
    let level = match flags.verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Info,
    };

    let _ = SimpleLogger::new().with_level(level).env().init();

    let start = std::time::Instant::now();
    match run(&flags) {
        Ok(count) => log::info!("wrote {count} posts in {}ms", start.elapsed().as_millis()),
        Err(e) => {
            log::error!("build failed\n{e}");
            std::process::exit(1);
        }
    }
}

fn run(flags: &flags::Quill) -> Result<usize> {
    let mut settings = Settings::discover(&flags.root)?;
    if let Some(output) = &flags.output {
        settings.output = output.clone();
    }

    let mode = match flags.dev {
        true => Mode::Development,
        false => Mode::Production,
    };

    let markdown = Markdown::new(Highlighter::new()?)
        .with_embed_marker(&settings.embed_marker);

    let documents = Document::discover(&settings.content)?;
    let external = settings.external.iter().cloned().map(Post::from).collect();
    let corpus = Aggregator::new(Processor::with_markdown(markdown), mode)
        .top_keywords(settings.top_keywords)
        .load(&documents, external)?;

    write_site(&settings, &corpus)?;
    Ok(corpus.posts().len())
}

fn write_site(settings: &Settings, corpus: &Corpus) -> Result<()> {
    let output = &settings.output;
    std::fs::create_dir_all(output).chain_with(|| error! {
        "failed to create output directory",
        "path" => output.display(),
    })?;

    let json = serde_json::to_string_pretty(corpus)?;
    write(&output.join("posts.json"), json)?;
    write(&output.join(FEED_FILE), feed::rss(settings, corpus.posts())?)?;
    write(&output.join("robots.txt"), feed::robots(settings))?;
    Ok(())
}

fn write(path: &Path, contents: String) -> Result<()> {
    std::fs::write(path, contents).chain_with(|| error! {
        "failed to write output file",
        "path" => path.display(),
    })?;

    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"
            origin = "https://example.com"
            title = "Notes"
            description = "d"

            [[external]]
            title = "Elsewhere"
            description = "e"
            keywords = ["rust"]
            date = "2023-03-03"
            url = "https://elsewhere.dev/x"
        "#).unwrap();

        let content = dir.path().join(CONTENT_DIR);
        fs::create_dir(&content).unwrap();
        fs::write(content.join("first.md"),
            "---\ntitle: First\ndescription: d\nkeywords: rust, web\ndate: 2024-01-01\n---\n# Hi\n").unwrap();
        fs::write(content.join("wip.md"),
            "---\ntitle: WIP\ndescription: d\nkeywords: web\ndate: 2024-06-01\ndraft: true\n---\n").unwrap();

        dir
    }

    fn flags(root: PathBuf, dev: bool) -> flags::Quill {
        flags::Quill { root, output: None, dev, verbose: false }
    }

    #[test]
    fn builds_a_site() {
        let dir = site();
        assert_eq!(run(&flags(dir.path().into(), false)).unwrap(), 2);

        let public = dir.path().join(OUTPUT_DIR);
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(public.join("posts.json")).unwrap()).unwrap();
        assert_eq!(json["posts"][0]["slug"], "first");
        assert_eq!(json["posts"][1]["slug"], "https://elsewhere.dev/x");
        assert_eq!(json["filters"], serde_json::json!(["all", "rust", "web"]));

        let rss = fs::read_to_string(public.join(FEED_FILE)).unwrap();
        assert!(rss.contains("https://example.com/posts/first"));
        assert!(!rss.contains("WIP"));
        let robots = fs::read_to_string(public.join("robots.txt")).unwrap();
        assert!(robots.contains("Sitemap: https://example.com/rss.xml"));
    }

    #[test]
    fn dev_mode_and_output_override() {
        let dir = site();
        let out = dir.path().join("elsewhere");
        let mut flags = flags(dir.path().into(), true);
        flags.output = Some(out.clone());

        assert_eq!(run(&flags).unwrap(), 3);
        assert!(fs::read_to_string(out.join(FEED_FILE)).unwrap().contains("WIP"));
    }

    #[test]
    fn bad_content_fails_the_build() {
        let dir = site();
        fs::write(dir.path().join(CONTENT_DIR).join("broken.md"), "no frontmatter").unwrap();
        let error = run(&flags(dir.path().into(), false)).unwrap_err();
        assert_eq!(error.kind(), Some(quire::error::ErrorKind::MalformedDocument));
        assert!(!dir.path().join(OUTPUT_DIR).exists());
    }
}
