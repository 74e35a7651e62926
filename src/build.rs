//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output site: loading pages from the markdown
//! directory ([`crate::page`]), writing the per-page and index HTML files
//! ([`crate::write`]), copying static assets, and generating the RSS feed
//! ([`crate::feed`]).
//!
//! The whole run is sequential and single-pass: scan, sort, write. The first
//! unrecoverable error aborts the run; files already written are left behind.

use crate::config::{Error as ConfigError, Settings};
use crate::feed::{write_feed, Error as FeedError, FeedConfig};
use crate::markdown;
use crate::page::{load_pages, sort_pages, Error as PageError};
use crate::write::{copy_static_assets, parse_template, Error as WriteError, Writer};
use std::fmt;
use std::fs::File;

/// Builds the site from a [`Settings`] value. This calls into
/// [`load_pages`], [`Writer::write_pages`], and [`write_feed`] which do the
/// heavy lifting; this function also copies the static assets and renders the
/// index page from the markdown directory's `README.md`.
pub fn build_site(settings: &Settings) -> Result<()> {
    settings.check_directories().map_err(Error::Config)?;

    // collect all pages, newest first
    let mut pages = load_pages(&settings.markdown_dir, settings.timestamps_from_filename)?;
    sort_pages(&mut pages);

    // Parse the template files.
    let page_template = parse_template(&settings.template_dir.join("page.html"))?;
    let index_template = parse_template(&settings.template_dir.join("index.html"))?;

    std::fs::create_dir_all(&settings.output_dir)?;
    copy_static_assets(&settings.template_dir, &settings.output_dir)?;

    // write the page files and the index
    let writer = Writer {
        page_template: &page_template,
        index_template: &index_template,
        github_username: &settings.github_username,
        website_name: &settings.website_name,
        output_directory: &settings.output_dir,
    };
    writer.write_pages(&pages)?;

    let readme = std::fs::read_to_string(settings.markdown_dir.join("README.md"))?;
    writer.write_index(&pages, &markdown::to_html(&readme))?;

    // create the RSS feed
    write_feed(
        FeedConfig {
            title: settings.website_name.clone(),
            link: settings.website_url.to_string(),
            description: settings.website_description.clone(),
        },
        &pages,
        File::create(settings.output_dir.join("rss.xml"))?,
    )?;

    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during settings
/// validation, page loading, writing output files, feed generation, and other
/// I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned when the settings fail validation.
    Config(ConfigError),

    /// Returned for errors loading pages from the markdown directory.
    Page(PageError),

    /// Returned for errors templating or writing output files.
    Write(WriteError),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(err) => err.fmt(f),
            Error::Page(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::Page(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<PageError> for Error {
    /// Converts [`PageError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: PageError) -> Error {
        Error::Page(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
