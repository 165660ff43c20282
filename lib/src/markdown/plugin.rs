use pulldown_cmark::Event;

use crate::error::Result;

/// A stage in the markdown pipeline: rewrites the event stream between parsing
/// and HTML serialization, then reports any failure it recorded.
pub trait Plugin {
    #[inline(always)]
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        events
    }

    #[inline(always)]
    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}
