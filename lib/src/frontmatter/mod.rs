//! Frontmatter: the fenced YAML metadata block at the top of a post.
//!
//! The schema is closed. A block validates only if it has exactly the known
//! fields with the right primitive types:
//!
//! | field         | type    | normalized to                          |
//! |---------------|---------|----------------------------------------|
//! | `title`       | string  | trimmed, non-empty                     |
//! | `description` | string  | trimmed, non-empty                     |
//! | `keywords`    | string  | comma-split, trimmed, lowercased list  |
//! | `date`        | string  | [`PostDate`], displayed as `Jan 2, 2024` |
//! | `draft`       | boolean | optional, `false` when absent          |
//! | `chart`       | boolean | optional, `false` when absent          |
//!
//! Validation collects every issue in the block before failing.

mod date;
mod issue;

pub use date::*;
pub use issue::*;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::{MalformedDocument, Result};
use crate::format::{Format, Yaml};

/// The line that opens and closes a frontmatter block.
pub const FENCE: &str = "---";

const FIELDS: &[&str] = &["title", "description", "keywords", "date", "draft", "chart"];

/// Validated, normalized post metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frontmatter {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub date: PostDate,
    #[serde(skip_serializing_if = "is_false")]
    pub draft: bool,
    /// The post renders a chart and needs the chart script.
    #[serde(skip_serializing_if = "is_false")]
    pub chart: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Splits `text` into its frontmatter block and the markdown body after it.
///
/// Leading whitespace is skipped; the first line must then be a [`FENCE`],
/// and the block runs to the next line that is one. Neither returned slice
/// includes a fence line.
pub fn split(text: &str) -> Result<(&str, &str), MalformedDocument> {
    let text = text.trim_start_matches(|c: char| c == '\u{feff}' || c.is_whitespace());
    let mut lines = text.split_inclusive('\n');
    match lines.next() {
        Some(line) if line.trim_end() == FENCE => {
            let start = line.len();
            let mut end = start;
            for line in lines {
                if line.trim_end() == FENCE {
                    return Ok((&text[start..end], &text[(end + line.len())..]));
                }

                end += line.len();
            }

            Err(MalformedDocument::MissingCloseFence)
        }
        _ => Err(MalformedDocument::MissingOpenFence),
    }
}

impl Frontmatter {
    /// Parses and validates a frontmatter block (without its fences).
    pub fn validate(block: &str) -> Result<Frontmatter, ValidationError> {
        let mapping = parse_mapping(block)?;

        let mut issues = vec![];
        for key in mapping.keys() {
            match key.as_str() {
                Some(name) if FIELDS.contains(&name) => {}
                Some(name) => issues.push(Issue::new(name, Problem::Unknown)),
                None => issues.push(Issue::new(format!("<{} key>", type_name(key)), Problem::Unknown)),
            }
        }

        let title = required(&mapping, "title", &mut issues, non_empty);
        let description = required(&mapping, "description", &mut issues, non_empty);
        let keywords = required(&mapping, "keywords", &mut issues, |s| Ok(split_keywords(s)));
        let date = required(&mapping, "date", &mut issues, |s| {
            s.parse::<PostDate>().map_err(|e| Problem::InvalidDate(e.0))
        });

        let draft = optional_flag(&mapping, "draft", &mut issues);
        let chart = optional_flag(&mapping, "chart", &mut issues);

        match (title, description, keywords, date) {
            (Some(title), Some(description), Some(keywords), Some(date)) if issues.is_empty() => {
                Ok(Frontmatter { title, description, keywords, date, draft, chart })
            }
            _ => Err(ValidationError { issues }),
        }
    }

    /// Serializes back to a block that validates to `self`: keywords joined
    /// with `, ` and the date as `YYYY-MM-DD`.
    pub fn to_canonical(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Canonical<'a> {
            title: &'a str,
            description: &'a str,
            keywords: String,
            date: String,
            #[serde(skip_serializing_if = "is_false")]
            draft: bool,
            #[serde(skip_serializing_if = "is_false")]
            chart: bool,
        }

        let canonical = Canonical {
            title: &self.title,
            description: &self.description,
            keywords: self.keywords.join(", "),
            date: self.date.iso(),
            draft: self.draft,
            chart: self.chart,
        };

        Ok(serde_yaml::to_string(&canonical)?)
    }
}

fn parse_mapping(block: &str) -> Result<Mapping, ValidationError> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let problem = match Yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(mapping)) => return Ok(mapping),
        Ok(Value::Null) => return Ok(Mapping::new()),
        Ok(other) => Problem::Syntax(format!("expected a mapping, found {}", type_name(&other))),
        Err(e) => Problem::Syntax(e.to_string()),
    };

    Err(ValidationError::single(Issue::new("frontmatter", problem)))
}

fn required<T, F>(mapping: &Mapping, field: &str, issues: &mut Vec<Issue>, normalize: F) -> Option<T>
    where F: FnOnce(&str) -> Result<T, Problem>
{
    let result = match mapping.get(field) {
        None => Err(Problem::Missing),
        Some(Value::String(s)) => normalize(s.as_str()),
        Some(other) => Err(Problem::WrongType { expected: "string", found: type_name(other) }),
    };

    result.map_err(|problem| issues.push(Issue::new(field, problem))).ok()
}

fn optional_flag(mapping: &Mapping, field: &str, issues: &mut Vec<Issue>) -> bool {
    match mapping.get(field) {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            let problem = Problem::WrongType { expected: "boolean", found: type_name(other) };
            issues.push(Issue::new(field, problem));
            false
        }
    }
}

fn non_empty(s: &str) -> Result<String, Problem> {
    match s.trim() {
        "" => Err(Problem::Empty),
        s => Ok(s.to_string()),
    }
}

fn split_keywords(s: &str) -> Vec<String> {
    s.split(',')
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "\
title: Hello World
description: A first post.
keywords: Rust, Markdown ,  SSG
date: 2024-01-02
";

    #[test]
    fn validates_and_normalizes() {
        let fm = Frontmatter::validate(VALID).unwrap();
        assert_eq!(fm.title, "Hello World");
        assert_eq!(fm.description, "A first post.");
        assert_eq!(fm.keywords, ["rust", "markdown", "ssg"]);
        assert_eq!(fm.date.to_string(), "Jan 2, 2024");
        assert!(!fm.draft);
        assert!(!fm.chart);
    }

    #[test]
    fn keeps_duplicate_keywords_in_order() {
        let block = VALID.replace("Rust, Markdown ,  SSG", "b, A, b,, a");
        let fm = Frontmatter::validate(&block).unwrap();
        assert_eq!(fm.keywords, ["b", "a", "b", "a"]);
    }

    #[test]
    fn optional_flags() {
        let fm = Frontmatter::validate(&format!("{VALID}draft: true\nchart: false\n")).unwrap();
        assert!(fm.draft);
        assert!(!fm.chart);

        let error = Frontmatter::validate(&format!("{VALID}draft: yes\n")).unwrap_err();
        assert_eq!(error.problem("draft"), Some(&Problem::WrongType { expected: "boolean", found: "string" }));
    }

    #[test]
    fn unknown_fields_always_fail() {
        for extra in ["foo: bar", "tags: a, b", "Title: Hello", "draft_: true"] {
            let error = Frontmatter::validate(&format!("{VALID}{extra}\n")).unwrap_err();
            let field = extra.split(':').next().unwrap();
            assert_eq!(error.issues, [Issue::new(field, Problem::Unknown)], "{extra}");
        }
    }

    #[test]
    fn collects_every_issue() {
        let block = "description: ''\nkeywords: [a, b]\ndate: not-a-date\nfoo: 1\n";
        let error = Frontmatter::validate(block).unwrap_err();
        assert_eq!(error.issues.len(), 5);
        assert_eq!(error.problem("foo"), Some(&Problem::Unknown));
        assert_eq!(error.problem("title"), Some(&Problem::Missing));
        assert_eq!(error.problem("description"), Some(&Problem::Empty));
        assert_eq!(error.problem("keywords"), Some(&Problem::WrongType { expected: "string", found: "sequence" }));
        assert_eq!(error.problem("date"), Some(&Problem::InvalidDate("not-a-date".into())));
    }

    #[test]
    fn wrong_primitive_types() {
        let block = VALID.replace("title: Hello World", "title: 2024");
        let error = Frontmatter::validate(&block).unwrap_err();
        assert_eq!(error.problem("title"), Some(&Problem::WrongType { expected: "string", found: "number" }));
    }

    #[test]
    fn empty_and_non_mapping_blocks() {
        let error = Frontmatter::validate("\n").unwrap_err();
        assert_eq!(error.issues.len(), 4);
        assert!(error.issues.iter().all(|issue| issue.problem == Problem::Missing));

        let error = Frontmatter::validate("- just\n- a list\n").unwrap_err();
        assert!(matches!(error.problem("frontmatter"), Some(Problem::Syntax(_))));

        let error = Frontmatter::validate("title: [unclosed\n").unwrap_err();
        assert!(matches!(error.problem("frontmatter"), Some(Problem::Syntax(_))));
    }

    #[test]
    fn canonical_round_trip_is_idempotent() {
        let blocks = [
            VALID.to_string(),
            format!("{VALID}draft: true\nchart: true\n"),
            "title: 'yes'\ndescription: \"#1: colons, and commas\"\nkeywords: X\ndate: Jul 8, 2025\n".into(),
        ];

        for block in blocks {
            let once = Frontmatter::validate(&block).unwrap();
            let twice = Frontmatter::validate(&once.to_canonical().unwrap()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn split_document() {
        let text = "---\ntitle: x\n---\n# Body\n\n---\n\nmore\n";
        let (block, body) = split(text).unwrap();
        assert_eq!(block, "title: x\n");
        assert_eq!(body, "# Body\n\n---\n\nmore\n");
    }

    #[test]
    fn split_tolerates_crlf_and_leading_blank_lines() {
        let (block, body) = split("\u{feff}\n\n---\r\na: 1\r\n---\r\nbody").unwrap();
        assert_eq!(block, "a: 1\r\n");
        assert_eq!(body, "body");

        let (block, body) = split("---\n---").unwrap();
        assert_eq!(block, "");
        assert_eq!(body, "");
    }

    #[test]
    fn split_requires_both_fences() {
        assert_eq!(split("# No frontmatter\n"), Err(MalformedDocument::MissingOpenFence));
        assert_eq!(split(""), Err(MalformedDocument::MissingOpenFence));
        assert_eq!(split("---\ntitle: x\n# Body\n"), Err(MalformedDocument::MissingCloseFence));
        assert_eq!(split("----\ntitle: x\n----\n"), Err(MalformedDocument::MissingOpenFence));
    }
}
