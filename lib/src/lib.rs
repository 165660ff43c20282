//! The content pipeline of a markdown blog.
//!
//! # Overview
//!
//! Each content document is a markdown file that opens with a `---` fenced
//! YAML [frontmatter] block. Processing a document:
//!
//!   1. splits the frontmatter block from the markdown body,
//!   2. validates the block against a closed schema,
//!   3. extracts a table of contents from the body's [headings],
//!   4. renders the body to HTML with [markdown], highlighting code blocks
//!      and turning `![title](yt:<id>)` images into video embeds,
//!   5. derives the post's slug from its file name.
//!
//! The result is a [`Post`]. A [`corpus::Aggregator`] does this for every
//! document in a site at once, merges in externally hosted posts, sorts by
//! date, hides drafts outside development, and ranks keywords into
//! navigation filters:
//!
//! ```no_run
//! use quire::{Aggregator, Document, Mode, Processor};
//!
//! # fn main() -> quire::error::Result<()> {
//! let documents = Document::discover("content")?;
//! let corpus = Aggregator::new(Processor::new()?, Mode::Production)
//!     .load(&documents, vec![])?;
//!
//! for post in corpus.posts() {
//!     println!("{}: {}", post.frontmatter.date, post.frontmatter.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Any document that fails to process fails the whole load.

#[macro_use]
pub mod error;
pub mod util;
pub mod format;
pub mod frontmatter;
pub mod headings;
pub mod markdown;
pub mod post;
pub mod process;
pub mod corpus;
pub mod source;
pub mod views;

pub use corpus::{Aggregator, Corpus, Mode};
pub use post::{External, Post};
pub use process::Processor;
pub use source::Document;

pub use rayon;
