use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use rss::extension::atom::{AtomExtension, Link};
use rss::validation::Validate;

use quire::{error, Post};
use quire::error::Result;

use crate::FEED_FILE;
use crate::config::Settings;

/// The absolute URL the feed is served from.
pub fn feed_url(settings: &Settings) -> String {
    format!("{}/{FEED_FILE}", settings.origin)
}

/// An RSS 2.0 channel with one item per post, in the order given.
pub fn rss(settings: &Settings, posts: &[Post]) -> Result<String> {
    let channel = channel(settings, posts);
    channel.validate().map_err(|e| error! {
        "generated feed is not valid RSS",
        "cause" => e,
    })?;

    Ok(channel.to_string())
}

fn channel(settings: &Settings, posts: &[Post]) -> Channel {
    let self_link = Link {
        href: feed_url(settings),
        rel: "self".into(),
        mime_type: Some("application/rss+xml".into()),
        ..Default::default()
    };

    ChannelBuilder::default()
        .title(settings.title.clone())
        .link(settings.origin.clone())
        .description(settings.description.clone())
        .managing_editor(settings.author.clone())
        .atom_ext(AtomExtension { links: vec![self_link] })
        .items(posts.iter().map(|post| item(settings, post)).collect::<Vec<_>>())
        .build()
}

fn item(settings: &Settings, post: &Post) -> Item {
    let url = settings.post_url(post);
    ItemBuilder::default()
        .title(post.frontmatter.title.clone())
        .link(url.clone())
        .guid(GuidBuilder::default().permalink(true).value(url).build())
        .description(post.frontmatter.description.clone())
        .pub_date(post.frontmatter.date.rfc1123())
        .build()
}

/// Allows every crawler and points at the feed.
pub fn robots(settings: &Settings) -> String {
    format!("User-agent: *\nDisallow:\n\nSitemap: {}\n", feed_url(settings))
}
