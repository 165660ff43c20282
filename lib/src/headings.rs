use pulldown_cmark::{Event, Parser, Tag};
use serde::Serialize;

use crate::markdown::OPTIONS;
use crate::util::slugify;

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// The explicit `{#id}` if the heading has one, else [`slugify`] of
    /// `name`. Two headings with the same text share an id.
    pub id: String,
    /// `1..=6`
    pub level: u8,
    /// The heading's inline text: markup, link targets, and a closing `#`
    /// run are gone, entities are decoded.
    pub name: String,
}

impl Heading {
    pub fn new<N: Into<String>>(level: u8, name: N) -> Self {
        let name = name.into();
        Heading { id: slugify(&name), level, name }
    }
}

const CODE_FENCE: &str = "```";

/// Scans a markdown body for ATX headings, in document order.
///
/// A line starting with a backtick fence toggles "inside code"; any info
/// string after the fence is ignored. Nothing inside a fence is a heading.
/// An unterminated fence hides every heading after it.
pub fn extract(body: &str) -> Vec<Heading> {
    let mut in_fence = false;
    let mut headings = vec![];
    for line in body.lines() {
        if line.starts_with(CODE_FENCE) {
            in_fence = !in_fence;
            continue;
        }

        if in_fence {
            continue;
        }

        if let Some(heading) = parse_heading(line) {
            headings.push(heading);
        }
    }

    headings
}

/// `#{1,6}`, then whitespace, then non-blank text.
///
/// The line is parsed as markdown so the name and id are those the renderer
/// sees.
fn parse_heading(line: &str) -> Option<Heading> {
    let level = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&level) || !line[level..].starts_with(char::is_whitespace) {
        return None;
    }

    let mut explicit_id = None;
    let mut text = String::new();
    for event in Parser::new_ext(line, OPTIONS) {
        match event {
            Event::Start(Tag::Heading { id, .. }) => explicit_id = id.map(|id| id.into_string()),
            Event::Text(s) | Event::Code(s) => text.push_str(&s),
            _ => { /* markup */ }
        }
    }

    let name = text.trim();
    if name.is_empty() {
        return None;
    }

    let id = explicit_id.unwrap_or_else(|| slugify(name));
    Some(Heading { id, level: level as u8, name: name.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(body: &str) -> Vec<(u8, String)> {
        extract(body).into_iter().map(|h| (h.level, h.name)).collect()
    }

    #[test]
    fn skips_fenced_headings() {
        let body = "# Title\n```\n# not a heading\n```\n## Real";
        assert_eq!(extract(body), [Heading::new(1, "Title"), Heading::new(2, "Real")]);
        assert_eq!(extract(body)[1].id, "real");
    }

    #[test]
    fn fence_info_strings_still_toggle() {
        let body = "```rust\n# comment\n```\n### After\n```sh title=\"x\"\n## inside\n```";
        assert_eq!(outline(body), [(3, "After".to_string())]);
    }

    #[test]
    fn unterminated_fence_hides_the_rest() {
        let body = "# One\n```ts\nconst x = 1;\n# Two\n## Three";
        assert_eq!(outline(body), [(1, "One".to_string())]);
    }

    #[test]
    fn heading_shapes() {
        let body = "#NoSpace\n####### seven\n#\n#   \n######\tSix  \n  # indented\n## Hello, World!\n";
        let headings = extract(body);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0], Heading { id: "six".into(), level: 6, name: "Six".into() });
        assert_eq!(headings[1], Heading { id: "hello-world".into(), level: 2, name: "Hello, World!".into() });
    }

    #[test]
    fn inline_markup_is_not_part_of_the_name() {
        let body = "## See [the docs](https://x.dev/a)\n## Setup ##\n## Custom {#mine}\n## A &amp; B\n### `Option<T>`\n";
        let headings = extract(body);
        let pairs: Vec<_> = headings.iter().map(|h| (h.id.as_str(), h.name.as_str())).collect();
        assert_eq!(pairs, [
            ("see-the-docs", "See the docs"),
            ("setup", "Setup"),
            ("mine", "Custom"),
            ("a--b", "A & B"),
            ("optiont", "Option<T>"),
        ]);
    }

    #[test]
    fn duplicate_names_share_ids() {
        let headings = extract("## Setup\ntext\n## Setup\n");
        assert_eq!(headings[0].id, "setup");
        assert_eq!(headings[1].id, "setup");
    }
}
