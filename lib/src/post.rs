use serde::{Deserialize, Serialize};

use crate::frontmatter::{Frontmatter, PostDate};
use crate::headings::Heading;

/// A processed document: its frontmatter plus everything derived from its
/// path and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    #[serde(flatten)]
    pub frontmatter: Frontmatter,
    /// The file stem for local posts, the absolute URL for external ones.
    pub slug: String,
    pub html: String,
    pub headings: Vec<Heading>,
}

impl Post {
    /// Whether this post is hosted elsewhere and only linked to.
    pub fn is_external(&self) -> bool {
        self.slug.starts_with("https://") || self.slug.starts_with("http://")
    }

    pub fn title(&self) -> &str {
        &self.frontmatter.title
    }

    pub fn date(&self) -> PostDate {
        self.frontmatter.date
    }

    pub fn is_draft(&self) -> bool {
        self.frontmatter.draft
    }
}

/// An externally hosted article, as configured.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct External {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub date: PostDate,
    pub url: String,
}

impl From<External> for Post {
    fn from(external: External) -> Self {
        let keywords = external.keywords.iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();

        Post {
            frontmatter: Frontmatter {
                title: external.title,
                description: external.description,
                keywords,
                date: external.date,
                draft: false,
                chart: false,
            },
            slug: external.url,
            html: String::new(),
            headings: vec![],
        }
    }
}
