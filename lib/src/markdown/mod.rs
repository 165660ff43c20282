//! Markdown rendering: a pulldown-cmark event pipeline of [`Plugin`]s.

mod plugin;
mod auto_heading;
mod embed;
mod highlight;
mod markdown;

pub use plugin::*;
pub use auto_heading::*;
pub use embed::*;
pub use highlight::*;
pub use markdown::*;
