//! Support for creating the RSS feed from a list of pages.
//!
//! The feed document is written as three parts: the XML declaration, a fixed
//! `<?xml-stylesheet?>` processing instruction so browsers render the feed
//! through `pretty-feed-v3.xsl` instead of showing raw XML, and then the
//! `<rss>` element itself. The processing instruction is emitted
//! unconditionally, independent of content.

use crate::page::{parse_base_name, Page, ParsedName};
use rss::{ChannelBuilder, Item, ItemBuilder};
use std::fmt;
use std::io::Write;

/// The stylesheet file copied into the output tree next to `rss.xml`.
pub const STYLESHEET_FILE_NAME: &str = "pretty-feed-v3.xsl";

/// The processing instruction prepended to the feed document.
pub const STYLESHEET_PROCESSING_INSTRUCTION: &str =
    r#"<?xml-stylesheet href="pretty-feed-v3.xsl" type="text/xsl"?>"#;

/// Bundled configuration for creating a feed. The fields map onto the
/// channel-level `<title>`, `<link>`, and `<description>` elements.
pub struct FeedConfig {
    pub title: String,
    pub link: String,
    pub description: String,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Page`]s and writes the result to a [`std::io::Write`]. The pages are
/// expected to be sorted newest-first already; items are emitted in exactly
/// the given order. This function takes ownership of the provided
/// [`FeedConfig`].
pub fn write_feed<W: Write>(config: FeedConfig, pages: &[Page], mut w: W) -> Result<()> {
    let channel = ChannelBuilder::default()
        .title(config.title)
        .link(config.link)
        .description(config.description)
        .items(feed_items(pages))
        .build();

    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(w, "{}", STYLESHEET_PROCESSING_INSTRUCTION)?;
    channel.pretty_write_to(w, b' ', 2)?;
    Ok(())
}

fn feed_items(pages: &[Page]) -> Vec<Item> {
    pages
        .iter()
        .map(|page| {
            let title = item_title(page);
            ItemBuilder::default()
                .title(Some(title.clone()))
                .link(Some(format!("{}.html", title)))
                .description(Some(page.content.clone()))
                .pub_date(Some(page.modification_date.to_rfc2822()))
                .build()
        })
        .collect()
}

/// Derives a feed item's title from the page's output file name: strip the
/// `.html` extension, then strip a leading `yyyy-mm-dd-` segment by the same
/// rule the page parser uses. A dateless well-formed name has nothing left
/// after stripping, so the formatted date stands in. This mirrors the page's
/// own title derivation, so `link` round-trips to the page's output file for
/// date-prefixed and fallback names alike.
fn item_title(page: &Page) -> String {
    let base = page.output_name.trim_end_matches(".html");
    match parse_base_name(base) {
        ParsedName::WellFormed {
            title: Some(title), ..
        } => title,
        ParsedName::WellFormed { title: None, .. } => page.formatted_date(),
        ParsedName::Fallback { title } => title,
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O and XML
/// encoding issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an RSS encoding error.
    Rss(rss::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Rss(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Rss(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<rss::Error> for Error {
    /// Converts [`rss::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: rss::Error) -> Error {
        Error::Rss(err)
    }
}
