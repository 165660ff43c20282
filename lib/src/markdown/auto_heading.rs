use std::collections::VecDeque;

use pulldown_cmark::{Event, Tag, CowStr, TagEnd};

use crate::util::slugify;
use super::Plugin;

/// Gives every heading without an explicit `{#id}` the id [`slugify`] derives
/// from its text, matching the ids of [`crate::headings::extract`].
#[derive(Default)]
pub struct AutoHeading;

struct HeadingIterator<'a, I: Iterator<Item = Event<'a>>> {
    stack: VecDeque<Event<'a>>,
    inner: I,
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for HeadingIterator<'a, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.stack.pop_front() {
            return Some(event);
        }

        match self.inner.next()? {
            Event::Start(Tag::Heading { level, id: None, classes, attrs }) => {
                let mut text = String::new();
                loop {
                    let event = self.inner.next()?;
                    let end = matches!(event, Event::End(TagEnd::Heading(..)));
                    if let Event::Text(ref s) | Event::Code(ref s) = event {
                        text.push_str(s);
                    }

                    self.stack.push_back(event);
                    if end {
                        break;
                    }
                }

                let id = Some(slugify(&text))
                    .filter(|id| !id.is_empty())
                    .map(CowStr::from);

                Some(Event::Start(Tag::Heading { level, id, classes, attrs }))
            },
            event => Some(event)
        }
    }
}

impl Plugin for AutoHeading {
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        HeadingIterator {
            inner: events,
            stack: VecDeque::with_capacity(4),
        }
    }
}
