use std::fmt::Write;

use html_escape::encode_double_quoted_attribute as attr;
use pulldown_cmark::{Event, Tag, CodeBlockKind, TagEnd};
use rustc_hash::FxHashMap;
use syntect::html::{ClassedHTMLGenerator, ClassStyle};
use syntect::parsing::{SyntaxSet, SyntaxReference};
use syntect::util::LinesWithEndings;

use crate::error::{Error, RenderError, Result};
use super::Plugin;

/// The registered grammars, each with the token that finds its syntax in the
/// bundled syntax set. Component languages borrow the closest bundled syntax.
pub const GRAMMARS: &[(&str, &str)] = &[
    ("css", "css"),
    ("html", "html"),
    ("tsx", "js"),
    ("svelte", "html"),
    ("diff", "diff"),
    ("bash", "bash"),
    ("json", "json"),
    ("sql", "sql"),
    ("md", "md"),
    ("astro", "html"),
];

/// Fence tags that resolve to a registered grammar.
pub const ALIASES: &[(&str, &str)] = &[
    ("js", "tsx"),
    ("ts", "tsx"),
    ("jsx", "tsx"),
    ("mdx", "md"),
    ("sh", "bash"),
    ("shell", "bash"),
];

const PLAIN_TEXT: &str = "Plain Text";

/// A closed registry of language grammars over a syntect [`SyntaxSet`].
///
/// Built once at startup: a grammar that can't be resolved fails
/// construction, never an individual document.
#[derive(Debug)]
pub struct Highlighter {
    syntaxes: SyntaxSet,
    grammars: FxHashMap<&'static str, usize>,
    plain_text: usize,
}

impl Highlighter {
    /// A highlighter over syntect's bundled syntaxes.
    pub fn new() -> Result<Self> {
        Self::with_syntaxes(SyntaxSet::load_defaults_newlines())
    }

    pub fn with_syntaxes(syntaxes: SyntaxSet) -> Result<Self> {
        fn index_of(syntaxes: &SyntaxSet, found: &SyntaxReference) -> Option<usize> {
            syntaxes.syntaxes().iter().position(|s| std::ptr::eq(s, found))
        }

        let plain_text = syntaxes.find_syntax_by_name(PLAIN_TEXT)
            .and_then(|syntax| index_of(&syntaxes, syntax))
            .ok_or_else(|| RenderError::new("default grammar is not available")
                .with("grammar", PLAIN_TEXT))?;

        let mut grammars = FxHashMap::default();
        for &(name, token) in GRAMMARS {
            let index = syntaxes.find_syntax_by_token(token)
                .and_then(|syntax| index_of(&syntaxes, syntax))
                .ok_or_else(|| RenderError::new("language grammar is not available")
                    .with("grammar", name)
                    .with("lookup token", token))?;

            grammars.insert(name, index);
        }

        for &(alias, target) in ALIASES {
            let index = grammars.get(target).copied()
                .ok_or_else(|| RenderError::new("language alias targets an unregistered grammar")
                    .with("alias", alias)
                    .with("target", target))?;

            grammars.insert(alias, index);
        }

        Ok(Highlighter { syntaxes, grammars, plain_text })
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.grammars.contains_key(tag.to_ascii_lowercase().as_str())
    }

    /// The syntax for a fence tag; unregistered tags get plain text.
    pub fn syntax(&self, tag: &str) -> &SyntaxReference {
        let index = self.grammars.get(tag.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(self.plain_text);

        &self.syntaxes.syntaxes()[index]
    }

    pub fn syntaxes(&self) -> &SyntaxSet {
        &self.syntaxes
    }
}

/// Replaces fenced code blocks with class-highlighted HTML.
pub struct SyntaxHighlight<'h> {
    highlighter: &'h Highlighter,
    error: Option<Error>,
}

impl<'h> SyntaxHighlight<'h> {
    pub fn new(highlighter: &'h Highlighter) -> Self {
        SyntaxHighlight { highlighter, error: None }
    }
}

struct CodeBlock<'a> {
    generator: ClassedHTMLGenerator<'a>,
    lang: String,
}

struct HighlightIterator<'a, I> {
    highlighter: &'a Highlighter,
    block: Option<CodeBlock<'a>>,
    error: &'a mut Option<Error>,
    inner: I,
}

#[allow(unused_must_use)]
fn code_block(lang: &str, code: String) -> String {
    let mut pre = String::with_capacity(code.len() + 64);
    match lang {
        "" => { pre.push_str(r#"<pre class="code">"#); }
        lang => { write!(&mut pre, r#"<pre class="code" data-lang="{}">"#, attr(lang)); }
    }

    write!(&mut pre, "<code>{}</code></pre>\n", code);
    pre
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for HighlightIterator<'a, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    let lang = info.split(|c: char| c == ',' || c.is_whitespace())
                        .next()
                        .unwrap_or_default();

                    let highlighter = self.highlighter;
                    let syntax = highlighter.syntax(lang);
                    self.block = Some(CodeBlock {
                        generator: ClassedHTMLGenerator::new_with_class_style(
                            syntax,
                            highlighter.syntaxes(),
                            ClassStyle::Spaced,
                        ),
                        lang: lang.to_string(),
                    });
                }
                Event::Text(text) if self.block.is_some() => {
                    let Some(block) = self.block.as_mut() else { continue };
                    for line in LinesWithEndings::from(&text) {
                        let Err(e) = block.generator.parse_html_for_line_which_includes_newline(line) else {
                            continue;
                        };

                        if self.error.is_none() {
                            *self.error = Some(RenderError::new("syntax highlighting failed")
                                .with("language", &block.lang)
                                .with("cause", e)
                                .into());
                        }
                    }
                }
                Event::End(TagEnd::CodeBlock) => match self.block.take() {
                    Some(block) => {
                        let html = code_block(&block.lang, block.generator.finalize());
                        return Some(Event::Html(html.into()));
                    }
                    None => return Some(Event::End(TagEnd::CodeBlock)),
                },
                ev => return Some(ev),
            }
        }
    }
}

impl Plugin for SyntaxHighlight<'_> {
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        HighlightIterator {
            highlighter: self.highlighter,
            block: None,
            error: &mut self.error,
            inner: events,
        }
    }

    fn finalize(&mut self) -> Result<()> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
