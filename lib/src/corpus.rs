use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{Chainable, Result};
use crate::post::Post;
use crate::process::Processor;
use crate::source::Document;

/// The synthetic filter that selects every post.
pub const ALL: &str = "all";

/// How many keyword filters a corpus offers besides [`ALL`] by default.
pub const DEFAULT_TOP_KEYWORDS: usize = 9;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Drafts are hidden.
    #[default]
    Production,
    /// Drafts are visible.
    Development,
}

impl Mode {
    pub fn shows_drafts(self) -> bool {
        self == Mode::Development
    }
}

/// Builds a [`Corpus`] from every document in a site, all at once.
#[derive(Debug)]
pub struct Aggregator {
    processor: Processor,
    mode: Mode,
    top_keywords: usize,
}

impl Aggregator {
    pub fn new(processor: Processor, mode: Mode) -> Self {
        Aggregator { processor, mode, top_keywords: DEFAULT_TOP_KEYWORDS }
    }

    pub fn top_keywords(mut self, n: usize) -> Self {
        self.top_keywords = n;
        self
    }

    /// Processes every document and merges in `external` posts.
    ///
    /// Fails on the first document that fails; there is no partial corpus.
    pub fn load(&self, documents: &[Document], external: Vec<Post>) -> Result<Corpus> {
        let local = documents.par_iter()
            .map(|doc| self.processor.process(&doc.path, &doc.text)
                .chain_with(|| error! {
                    "failed to process document",
                    "path" => doc.path.display(),
                }))
            .collect::<Result<Vec<_>>>()?;

        let mut posts = external;
        posts.extend(local);
        posts.sort_by(|a, b| b.date().cmp(&a.date()));

        let total = posts.len();
        if !self.mode.shows_drafts() {
            posts.retain(|post| !post.is_draft());
        }

        let filters = top_keywords(&posts, self.top_keywords);
        log::info!("loaded {} posts ({} drafts hidden), filters: {}",
            posts.len(), total - posts.len(), filters.join(", "));

        Ok(Corpus { posts, filters })
    }
}

/// How often a keyword appears across a set of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Every keyword in `posts` with its count, most frequent first. Ties keep
/// the order in which keywords were first seen.
pub fn keyword_frequencies(posts: &[Post]) -> Vec<KeywordCount> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut counts: Vec<KeywordCount> = vec![];
    for keyword in posts.iter().flat_map(|post| &post.frontmatter.keywords) {
        match index.get(keyword.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(keyword, counts.len());
                counts.push(KeywordCount { word: keyword.clone(), count: 1 });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// [`ALL`] followed by the `n` most frequent keywords in `posts`.
pub fn top_keywords(posts: &[Post], n: usize) -> Vec<String> {
    let ranked = keyword_frequencies(posts).into_iter()
        .take(n)
        .map(|entry| entry.word);

    std::iter::once(ALL.to_string()).chain(ranked).collect()
}

/// The visible posts of a site, newest first, and its keyword filters.
#[derive(Debug, Clone, Serialize)]
pub struct Corpus {
    posts: Vec<Post>,
    filters: Vec<String>,
}

impl Corpus {
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.slug == slug)
    }

    /// Posts tagged with `filter`, in corpus order. [`ALL`] selects every post.
    pub fn with_keyword<'a>(&'a self, filter: &'a str) -> impl Iterator<Item = &'a Post> + 'a {
        self.posts.iter()
            .filter(move |post| filter == ALL || post.frontmatter.keywords.iter().any(|k| k == filter))
    }

    pub fn keyword_frequencies(&self) -> Vec<KeywordCount> {
        keyword_frequencies(&self.posts)
    }
}
