use std::fmt;

use crate::error::{ErrorDetail, ErrorKind};

/// What is wrong with a single frontmatter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// The block is not YAML, or not a YAML mapping.
    Syntax(String),
    /// A required field is absent.
    Missing,
    /// The field is not part of the schema.
    Unknown,
    /// The field has the wrong primitive type.
    WrongType { expected: &'static str, found: &'static str },
    /// A text field is empty.
    Empty,
    /// The date field does not parse to a calendar date.
    InvalidDate(String),
}

/// A [`Problem`] attributed to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub field: String,
    pub problem: Problem,
}

impl Issue {
    pub fn new<F: Into<String>>(field: F, problem: Problem) -> Self {
        Issue { field: field.into(), problem }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Syntax(e) => write!(f, "malformed frontmatter: {e}"),
            Problem::Missing => write!(f, "required field is missing"),
            Problem::Unknown => write!(f, "unrecognized field"),
            Problem::WrongType { expected, found } => write!(f, "expected {expected}, found {found}"),
            Problem::Empty => write!(f, "must not be empty"),
            Problem::InvalidDate(s) => write!(f, "`{s}` is not a valid date"),
        }
    }
}

/// Every issue found while validating one frontmatter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn single(issue: Issue) -> Self {
        ValidationError { issues: vec![issue] }
    }

    /// The problem reported for `field`, if any.
    pub fn problem(&self, field: &str) -> Option<&Problem> {
        self.issues.iter()
            .find(|issue| issue.field == field)
            .map(|issue| &issue.problem)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issues.len() {
            1 => write!(f, "invalid frontmatter: 1 issue"),
            n => write!(f, "invalid frontmatter: {n} issues"),
        }
    }
}

impl ErrorDetail for ValidationError {
    fn context(&self) -> Vec<(Option<String>, String)> {
        self.issues.iter()
            .map(|issue| (Some(issue.field.clone()), issue.problem.to_string()))
            .collect()
    }

    fn kind(&self) -> Option<ErrorKind> {
        Some(ErrorKind::Validation)
    }
}
