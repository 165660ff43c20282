use html_escape::encode_double_quoted_attribute as attr;
use pulldown_cmark::{Event, Tag, TagEnd};

use super::Plugin;

/// The image source prefix that marks a video embed.
pub const DEFAULT_MARKER: &str = "yt:";

const EMBED_URL: &str = "https://www.youtube-nocookie.com/embed/";
const ALLOW: &str = "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";
const FALLBACK_TITLE: &str = "YouTube video";

/// Rewrites images whose source starts with `marker` into lazy-loaded video
/// iframes. `![Demo](yt:abc123)` embeds video `abc123` titled `Demo`. Every
/// other image is left alone.
#[derive(Debug, Clone)]
pub struct VideoEmbed<'m> {
    marker: &'m str,
}

impl<'m> VideoEmbed<'m> {
    pub fn new(marker: &'m str) -> Self {
        VideoEmbed { marker }
    }
}

struct EmbedIterator<'a, I: Iterator<Item = Event<'a>>> {
    marker: &'a str,
    inner: I,
}

impl<'a, I: Iterator<Item = Event<'a>>> EmbedIterator<'a, I> {
    /// Consumes the image's inner events through its end tag, returning the
    /// plain text of its alt.
    fn alt_text(&mut self) -> String {
        let mut alt = String::new();
        let mut depth = 0usize;
        for event in self.inner.by_ref() {
            match event {
                Event::End(TagEnd::Image) if depth == 0 => break,
                Event::Start(_) => depth += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Text(s) | Event::Code(s) => alt.push_str(&s),
                Event::SoftBreak | Event::HardBreak => alt.push(' '),
                _ => { /* skip */ }
            }
        }

        alt
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for EmbedIterator<'a, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Event::Start(Tag::Image { dest_url, title, .. })
                if !self.marker.is_empty() && dest_url.starts_with(self.marker) =>
            {
                let alt = self.alt_text();
                let video = &dest_url[self.marker.len()..];
                Some(Event::Html(iframe(video, &alt, &title).into()))
            }
            event => Some(event),
        }
    }
}

fn iframe(video: &str, alt: &str, title: &str) -> String {
    let label = [alt, title].into_iter()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(FALLBACK_TITLE);

    format!(
        r#"<iframe loading="lazy" title="{}" src="{EMBED_URL}{}" allowfullscreen allow="{ALLOW}"></iframe>"#,
        attr(label),
        attr(video),
    )
}

impl Plugin for VideoEmbed<'_> {
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        EmbedIterator { marker: self.marker, inner: events }
    }
}
