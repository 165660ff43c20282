use pulldown_cmark::{html, Options, Parser};

use crate::error::{Chainable, Result};
use super::{AutoHeading, Highlighter, Plugin, SyntaxHighlight, VideoEmbed, DEFAULT_MARKER};

/// The markdown extensions posts are parsed with. Heading extraction parses
/// heading lines with the same set so outline ids match rendered ids.
pub const OPTIONS: Options = Options::ENABLE_TABLES
    .union(Options::ENABLE_FOOTNOTES)
    .union(Options::ENABLE_STRIKETHROUGH)
    .union(Options::ENABLE_TASKLISTS)
    .union(Options::ENABLE_HEADING_ATTRIBUTES);

/// Renders post bodies to HTML.
///
/// Every render runs the same stages, in order: heading ids, then video
/// embeds, then code highlighting.
#[derive(Debug)]
pub struct Markdown {
    highlighter: Highlighter,
    embed_marker: String,
}

impl Markdown {
    pub fn new(highlighter: Highlighter) -> Self {
        Markdown { highlighter, embed_marker: DEFAULT_MARKER.into() }
    }

    /// Sets the image source prefix that turns an image into a video embed.
    pub fn with_embed_marker<M: Into<String>>(mut self, marker: M) -> Self {
        self.embed_marker = marker.into();
        self
    }

    pub fn render(&self, body: &str) -> Result<String> {
        let mut headings = AutoHeading;
        let mut embeds = VideoEmbed::new(&self.embed_marker);
        let mut highlight = SyntaxHighlight::new(&self.highlighter);

        let mut output = String::with_capacity(body.len() * 3 / 2);
        let events = Parser::new_ext(body, OPTIONS);
        let events = headings.remap(events);
        let events = embeds.remap(events);
        let events = highlight.remap(events);
        html::push_html(&mut output, events);

        headings.finalize().chain(error!("markdown rendering failed"))?;
        embeds.finalize().chain(error!("markdown rendering failed"))?;
        highlight.finalize().chain(error!("markdown rendering failed"))?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markdown() -> Markdown {
        Markdown::new(Highlighter::new().unwrap())
    }

    #[test]
    fn embeds_marked_images() {
        let html = markdown().render("![Demo](yt:abc123)").unwrap();
        assert!(html.contains(r#"src="https://www.youtube-nocookie.com/embed/abc123""#));
        assert!(html.contains(r#"title="Demo""#));
        assert!(html.contains(r#"loading="lazy""#));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn untitled_embeds_get_a_fallback_title() {
        let html = markdown().render("![](yt:xyz)").unwrap();
        assert!(html.contains(r#"title="YouTube video""#));

        let html = markdown().render(r#"![](yt:xyz "From title")"#).unwrap();
        assert!(html.contains(r#"title="From title""#));
    }

    #[test]
    fn plain_images_are_untouched() {
        let html = markdown().render("![Local](/local.png)").unwrap();
        assert!(html.contains(r#"<img src="/local.png" alt="Local""#));
        assert!(!html.contains("<iframe"));
    }

    #[test]
    fn custom_marker() {
        let md = markdown().with_embed_marker("video:");
        let html = md.render("![a](video:v1) ![b](yt:v2)").unwrap();
        assert!(html.contains("/embed/v1"));
        assert!(!html.contains("/embed/v2"));
        assert!(html.contains(r#"src="yt:v2""#));
    }

    #[test]
    fn headings_get_ids() {
        let html = markdown().render("## Hello, World!\n\n# Custom {#mine}\n").unwrap();
        assert!(html.contains(r#"<h2 id="hello-world">Hello, World!</h2>"#));
        assert!(html.contains(r#"<h1 id="mine">Custom</h1>"#));
    }

    #[test]
    fn highlights_registered_languages() {
        let html = markdown().render("```ts\nconst x = 1;\n```\n").unwrap();
        assert!(html.contains(r#"<pre class="code" data-lang="ts"><code>"#));
        assert!(html.contains("<span class=\""));
        assert!(html.contains("</code></pre>"));
    }

    #[test]
    fn unknown_languages_fall_back_to_plain_text() {
        let html = markdown().render("```cobol\n<b> & </b>\n```\n").unwrap();
        assert!(html.contains(r#"data-lang="cobol""#));
        assert!(html.contains("&lt;b&gt; &amp; &lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn indented_code_is_left_to_the_renderer() {
        let html = markdown().render("    let x = 1;\n").unwrap();
        assert!(html.contains("<pre><code>let x = 1;\n</code></pre>"));
    }
}
