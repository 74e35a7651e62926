//! Responsible for templating and writing HTML pages to disk from [`Page`]
//! values, and for copying static assets into the output tree. Templates are
//! Go-style [`gtmpl`] templates: `page.html` for individual pages and
//! `index.html` for the index page.

use crate::feed::{STYLESHEET_FILE_NAME, STYLESHEET_PROCESSING_INSTRUCTION};
use crate::navbar;
use crate::page::Page;
use chrono::{Datelike, Local};
use gtmpl::Template;
use gtmpl_value::Value;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// Responsible for templating and writing HTML pages to disk.
pub struct Writer<'a> {
    /// The template for individual pages.
    pub page_template: &'a Template,

    /// The template for the index page.
    pub index_template: &'a Template,

    /// The GitHub handle shown by the templates.
    pub github_username: &'a str,

    /// The site name shown by the templates.
    pub website_name: &'a str,

    /// The directory in which all output HTML files are written.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Templates every page and writes it under its [`Page::output_name`].
    /// Pages are expected to be sorted newest-first; the navigation data
    /// handed to the template preserves that order.
    pub fn write_pages(&self, pages: &[Page]) -> Result<()> {
        let navbar = navbar_value(pages);
        for page in pages {
            let mut m: HashMap<String, Value> = HashMap::new();
            m.insert("title".to_owned(), Value::String(page.title.clone()));
            m.insert("content".to_owned(), Value::String(page.content.clone()));
            m.insert(
                "github_username".to_owned(),
                Value::String(self.github_username.to_owned()),
            );
            m.insert(
                "website_name".to_owned(),
                Value::String(self.website_name.to_owned()),
            );
            m.insert("navbar".to_owned(), navbar.clone());
            m.insert("footer".to_owned(), footer_value());
            m.insert(
                "modification_date".to_owned(),
                Value::String(page.modification_date.to_rfc2822()),
            );
            self.render(
                self.page_template,
                Value::Object(m),
                &self.output_directory.join(&page.output_name),
            )?;
            info!("Generated page: {}", page.output_name);
        }
        Ok(())
    }

    /// Templates and writes `index.html`. `readme_html` is the rendered body
    /// of the source directory's `README.md`; the navigation buttons are
    /// rebuilt from `pages` in the given order.
    pub fn write_index(&self, pages: &[Page], readme_html: &str) -> Result<()> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "website_name".to_owned(),
            Value::String(self.website_name.to_owned()),
        );
        m.insert(
            "github_username".to_owned(),
            Value::String(self.github_username.to_owned()),
        );
        m.insert(
            "readme_content".to_owned(),
            Value::String(readme_html.to_owned()),
        );
        m.insert("buttons".to_owned(), Value::String(navbar::buttons(pages)));
        m.insert("navbar".to_owned(), navbar_value(pages));
        m.insert("footer".to_owned(), footer_value());
        m.insert(
            "pretty_feed_processing_instruction".to_owned(),
            Value::String(STYLESHEET_PROCESSING_INSTRUCTION.to_owned()),
        );
        self.render(
            self.index_template,
            Value::Object(m),
            &self.output_directory.join("index.html"),
        )
    }

    fn render(&self, template: &Template, value: Value, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        template.execute(&mut file, &gtmpl::Context::from(value)?)?;
        Ok(())
    }
}

/// The `navbar` template value: the list of pages as objects with `title`,
/// `href`, and `date` fields, in the order given.
fn navbar_value(pages: &[Page]) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert(
        "pages".to_owned(),
        Value::Array(
            pages
                .iter()
                .map(|page| {
                    let mut p: HashMap<String, Value> = HashMap::new();
                    p.insert("title".to_owned(), Value::String(page.title.clone()));
                    p.insert("href".to_owned(), Value::String(page.output_name.clone()));
                    p.insert("date".to_owned(), Value::String(page.formatted_date()));
                    Value::Object(p)
                })
                .collect(),
        ),
    );
    Value::Object(m)
}

fn footer_value() -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert(
        "year".to_owned(),
        Value::String(Local::now().year().to_string()),
    );
    Value::Object(m)
}

/// Loads the template file contents and parses them into a template.
pub fn parse_template(path: &Path) -> Result<Template> {
    use std::io::Read;
    let mut contents = String::new();
    std::fs::File::open(path)
        .map_err(|err| Error::OpenTemplateFile {
            path: path.to_owned(),
            err,
        })?
        .read_to_string(&mut contents)?;

    let mut template = Template::default();
    template.parse(&contents)?;
    Ok(template)
}

/// Copies the static assets into the output tree: `{template_dir}/css` and
/// `{template_dir}/js` under the same names in the output directory, plus the
/// feed stylesheet next to `rss.xml`. The css and js directories are
/// flattened; subdirectories of them are not preserved.
pub fn copy_static_assets(template_dir: &Path, output_dir: &Path) -> Result<()> {
    copy_dir(&template_dir.join("css"), &output_dir.join("css"))?;
    copy_dir(&template_dir.join("js"), &output_dir.join("js"))?;
    std::fs::copy(
        template_dir.join(STYLESHEET_FILE_NAME),
        output_dir.join(STYLESHEET_FILE_NAME),
    )?;
    Ok(())
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        if entry.file_type().is_file() {
            std::fs::copy(entry.path(), dst.join(entry.file_name()))?;
        }
    }
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned when walking a static asset directory fails.
    WalkDir(walkdir::Error),

    /// An error writing the output files.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator while copying static assets.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}
