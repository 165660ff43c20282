use std::{fmt, io};
use std::path::{Path, PathBuf};
use std::panic::Location;
use std::error::Error as StdError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The failure taxonomy of the content pipeline.
///
/// None of these are recovered from: any of them aborts a corpus load.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Frontmatter failed its schema: a missing, extra, or malformed field.
    Validation,
    /// The document has no frontmatter fence pair.
    MalformedDocument,
    /// The document path yields no usable base name.
    Slug,
    /// The highlighter or a grammar is misconfigured.
    Render,
}

#[derive(Debug)]
pub struct Error {
    detail: Vec<Box<dyn ErrorDetail>>,
    prev: Option<Box<Error>>,
    _location: &'static Location<'static>,
}

pub trait ErrorDetail: fmt::Display + fmt::Debug + Send + Sync {
    fn context(&self) -> Vec<(Option<String>, String)> { vec![] }

    fn kind(&self) -> Option<ErrorKind> { None }
}

impl Error {
    /// Makes `self` the cause of `other`, returning `other`.
    pub fn chain(self, mut other: Error) -> Self {
        #[inline]
        fn _chain(error: Error, behind: &mut Error) {
            if let Some(prev) = behind.prev.as_mut() {
                _chain(error, prev);
            } else {
                behind.prev = Some(Box::new(error));
            }
        }

        _chain(self, &mut other);
        other
    }

    /// The kind of the innermost typed detail in the chain: causes are
    /// searched before the context wrapped around them.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.prev.as_ref()
            .and_then(|prev| prev.kind())
            .or_else(|| self.detail.iter().rev().find_map(|detail| detail.kind()))
    }
}

impl ErrorDetail for &(dyn StdError + Send + Sync) {
    fn context(&self) -> Vec<(Option<String>, String)> {
        let mut ctxt = vec![];
        let mut error = self.source();
        while let Some(e) = error {
            ctxt.push((None, e.to_string()));
            error = e.source();
        }

        ctxt
    }
}

macro_rules! impl_error_detail_with_std_error {
    ($($T:ty),* $(,)?) => ($(
        impl $crate::error::ErrorDetail for $T {
            fn context(&self) -> Vec<(Option<String>, String)> {
                let error: &(dyn std::error::Error + Send + Sync) = self;
                error.context()
            }
        }
    )*)
}

impl_error_detail_with_std_error! {
    io::Error,
    toml::de::Error,
    serde_json::Error,
    serde_yaml::Error,
}

impl ErrorDetail for String { }
impl ErrorDetail for &str { }

impl<T: ErrorDetail + 'static> From<T> for Error {
    #[track_caller]
    fn from(detail: T) -> Self {
        Error {
            prev: None,
            detail: vec![Box::new(detail)],
            _location: Location::caller(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Copy, Clone)] struct Indent(usize);

        impl fmt::Display for Indent {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for _ in 0..(self.0 * 4) { write!(f, " ")? }
                Ok(())
            }
        }

        struct NestedError<'a>(Indent, &'a Error);

        impl fmt::Display for NestedError<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let NestedError(indent, e) = self;
                let indent_line = format!("\n{indent}");

                for detail in &e.detail {
                    writeln!(f, "{indent}{}", detail.to_string().replace('\n', &indent_line))?;
                    for (key, value) in detail.context() {
                        let value = value.replace('\n', &indent_line);
                        match key {
                            Some(key) => writeln!(f, "{indent}{key}: {value}")?,
                            None => writeln!(f, "{indent}{value}")?,
                        }
                    }

                    if std::env::var_os("RUST_BACKTRACE").is_some() {
                        writeln!(f, "{indent}[{}]", e._location)?;
                    }
                }

                if let Some(prev) = &e.prev {
                    fmt::Display::fmt(&NestedError(Indent(indent.0 + 1), prev), f)?;
                }

                Ok(())
            }
        }

        fmt::Display::fmt(&NestedError(Indent(0), self), f)
    }
}

impl StdError for Error { }

#[derive(Debug)]
pub struct MakeshiftError {
    pub message: String,
    pub parameters: Vec<(Option<String>, String)>,
}

#[doc(hidden)]
#[macro_export]
macro_rules! err {
    ($($token:tt)*) => (Err($crate::error!($($token)*)));
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($msg:expr, $($rest:tt)*) => (
        $crate::error::Error::from($crate::error::MakeshiftError {
            message: $msg.to_string(),
            parameters: {
                #[allow(unused_mut)]
                let mut v: Vec<(Option<String>, String)> = Vec::new();
                $crate::error!(@param v $($rest)*);
                v
            },
        })
    );

    ($msg:expr) => ( $crate::error!($msg,) );

    (@param $v:ident $key:expr => $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $key => $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $key:expr => $value:expr) => {
        $v.push((Some($key.to_string()), $value.to_string()));
    };

    (@param $v:ident $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $value:expr) => {
        $v.push((None, $value.to_string()));
    };

    (@param $v:ident $(,)?) => { };
}

impl fmt::Display for MakeshiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl ErrorDetail for MakeshiftError {
    fn context(&self) -> Vec<(Option<String>, String)> {
        self.parameters.clone()
    }
}

pub trait Chainable<T> {
    fn chain(self, other: impl Into<Error>) -> Result<T>;

    fn chain_with<F, E>(self, f: F) -> Result<T>
        where F: FnOnce() -> E, E: Into<Error>;
}

impl<T, E: Into<Error>> Chainable<T> for Result<T, E> {
    #[track_caller]
    fn chain(self, other: impl Into<Error>) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(other.into()))
        }
    }

    fn chain_with<F, Err>(self, f: F) -> Result<T>
        where F: FnOnce() -> Err, Err: Into<Error>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(f().into()))
        }
    }
}

/// A document without a complete `---` fenced frontmatter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedDocument {
    /// The first non-blank line is not a fence.
    MissingOpenFence,
    /// The opening fence is never closed.
    MissingCloseFence,
}

impl fmt::Display for MalformedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOpenFence => write!(f, "no frontmatter found"),
            Self::MissingCloseFence => write!(f, "frontmatter is never closed"),
        }
    }
}

impl ErrorDetail for MalformedDocument {
    fn context(&self) -> Vec<(Option<String>, String)> {
        let hint = "frontmatter must begin the file and be surrounded by `---` fences";
        vec![(Some("hint".into()), hint.into())]
    }

    fn kind(&self) -> Option<ErrorKind> {
        Some(ErrorKind::MalformedDocument)
    }
}

/// A document path with no base name to derive a slug from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugError {
    pub path: PathBuf,
}

impl SlugError {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SlugError { path: path.as_ref().to_path_buf() }
    }
}

impl fmt::Display for SlugError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no slug found for {}", self.path.display())
    }
}

impl ErrorDetail for SlugError {
    fn kind(&self) -> Option<ErrorKind> {
        Some(ErrorKind::Slug)
    }
}

/// Highlighter or grammar misconfiguration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    pub message: String,
    pub parameters: Vec<(Option<String>, String)>,
}

impl RenderError {
    pub fn new<M: Into<String>>(message: M) -> Self {
        RenderError { message: message.into(), parameters: vec![] }
    }

    pub fn with<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.parameters.push((Some(key.into()), value.to_string()));
        self
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl ErrorDetail for RenderError {
    fn context(&self) -> Vec<(Option<String>, String)> {
        self.parameters.clone()
    }

    fn kind(&self) -> Option<ErrorKind> {
        Some(ErrorKind::Render)
    }
}
