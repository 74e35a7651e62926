//! Parsing pages from markdown source files. A page's title, output file
//! name, and timestamp are derived from the source file name when it follows
//! the `yyyy-mm-dd-title.md` convention, and from filesystem metadata
//! otherwise. `README.md` is reserved for the index page body and is excluded
//! from the scan.

use crate::markdown;
use chrono::{DateTime, Local, LocalResult, NaiveDate, TimeZone};
use std::fmt;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

const MARKDOWN_EXTENSION: &str = ".md";
const HTML_EXTENSION: &str = ".html";
const README_FILE_NAME: &str = "README.md";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One rendered content unit: the seam between a source markdown file and the
/// output HTML file, navigation button, and feed item built from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// The display title. Never empty; a page without a derivable title falls
    /// back to its formatted date (or its raw base name).
    pub title: String,

    /// The file name under which the page is written, e.g.
    /// `2023-01-01-hello.html`. Not guaranteed unique; colliding source
    /// names silently overwrite one another.
    pub output_name: String,

    /// The rendered HTML body.
    pub content: String,

    /// Used both for sort order and for display. Sourced from the file name
    /// when it is well-formed (and the settings allow it), else from the
    /// file's modification time.
    pub modification_date: DateTime<Local>,
}

/// The result of parsing a markdown base name (no `.md` extension). The two
/// cases are deliberately explicit so that callers branch on them rather than
/// falling through an implicit default.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedName {
    /// The first three `-`-separated segments have lengths 4/2/2 and parse
    /// as a real calendar date. The remaining segments, rejoined with `-`,
    /// form the title; a name of exactly three segments has none.
    WellFormed {
        date: NaiveDate,
        title: Option<String>,
    },

    /// Anything else, including names whose leading segments are the right
    /// lengths but not a real date (e.g. `XXXX-YY-ZZ-foo`). Those fall back
    /// here instead of producing a nonsense date.
    Fallback { title: String },
}

/// Parses a base name against the `yyyy-mm-dd[-title]` convention.
pub fn parse_base_name(base: &str) -> ParsedName {
    let parts: Vec<&str> = base.split('-').collect();
    if parts.len() >= 3 && parts[0].len() == 4 && parts[1].len() == 2 && parts[2].len() == 2 {
        if let Some(date) = numeric_date(parts[0], parts[1], parts[2]) {
            let title = parts[3..].join("-");
            return ParsedName::WellFormed {
                date,
                title: match title.is_empty() {
                    true => None,
                    false => Some(title),
                },
            };
        }
    }
    ParsedName::Fallback {
        title: base.to_owned(),
    }
}

fn numeric_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Midnight on `date` in the local time zone. Falls back to interpreting the
/// naive midnight as UTC when the local zone skips or repeats it.
fn local_midnight(date: NaiveDate) -> DateTime<Local> {
    let naive = date.and_hms(0, 0, 0);
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(stamp) => stamp,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => Local.from_utc_datetime(&naive),
    }
}

impl Page {
    /// Builds a [`Page`] from a source file name, its rendered HTML, and its
    /// filesystem modification time. Logs a warning for names that are
    /// missing a title or that don't follow the naming convention.
    pub fn new(
        file_name: &str,
        content: String,
        file_modified: DateTime<Local>,
        timestamps_from_filename: bool,
    ) -> Page {
        let base = file_name.trim_end_matches(MARKDOWN_EXTENSION);
        match parse_base_name(base) {
            ParsedName::WellFormed { date, title } => {
                let modification_date = match timestamps_from_filename {
                    true => local_midnight(date),
                    false => file_modified,
                };
                let date_str = date.format(DATE_FORMAT).to_string();
                match title {
                    Some(title) => Page {
                        output_name: format!("{}-{}{}", date_str, title, HTML_EXTENSION),
                        title,
                        content,
                        modification_date,
                    },
                    None => {
                        warn!(
                            "Markdown file '{}' is missing a title. Using date as the title.",
                            file_name
                        );
                        Page {
                            output_name: format!("{}{}", date_str, HTML_EXTENSION),
                            title: date_str,
                            content,
                            modification_date,
                        }
                    }
                }
            }
            ParsedName::Fallback { title } => {
                warn!(
                    "Markdown file '{}' does not follow the naming convention \
                     (yyyy-mm-dd-title.md). Using filename as title.",
                    file_name
                );
                Page {
                    output_name: format!("{}{}", title, HTML_EXTENSION),
                    title,
                    content,
                    modification_date: file_modified,
                }
            }
        }
    }

    /// The page's date as displayed in navigation buttons and used for
    /// date-as-title fallbacks.
    pub fn formatted_date(&self) -> String {
        self.modification_date.format(DATE_FORMAT).to_string()
    }
}

/// Walks `dir` and builds a [`Page`] for every markdown file except
/// `README.md`. Any read error aborts the whole run; there is no
/// skip-and-continue mode.
pub fn load_pages(dir: &Path, timestamps_from_filename: bool) -> Result<Vec<Page>> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !file_name.ends_with(MARKDOWN_EXTENSION) || file_name == README_FILE_NAME {
            continue;
        }
        let contents = std::fs::read_to_string(entry.path())?;
        let modified = DateTime::<Local>::from(entry.metadata()?.modified()?);
        pages.push(Page::new(
            &file_name,
            markdown::to_html(&contents),
            modified,
            timestamps_from_filename,
        ));
    }
    Ok(pages)
}

/// Sorts pages by modification date, most recent first. Ties are broken by
/// output name ascending so that the navigation fragment and feed are
/// reproducible across runs.
pub fn sort_pages(pages: &mut [Page]) {
    pages.sort_by(|a, b| {
        b.modification_date
            .cmp(&a.modification_date)
            .then_with(|| a.output_name.cmp(&b.output_name))
    });
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading pages from the markdown directory.
#[derive(Debug)]
pub enum Error {
    /// Returned when the directory walk fails.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator while walking the markdown directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn mtime(y: i32, m: u32, d: u32) -> DateTime<Local> {
        local_midnight(NaiveDate::from_ymd(y, m, d))
    }

    #[test]
    fn test_parse_well_formed() {
        assert_eq!(
            parse_base_name("2023-01-01-hello"),
            ParsedName::WellFormed {
                date: NaiveDate::from_ymd(2023, 1, 1),
                title: Some(String::from("hello")),
            }
        );
    }

    #[test]
    fn test_parse_well_formed_multi_segment_title() {
        assert_eq!(
            parse_base_name("2023-01-01-hello-world-again"),
            ParsedName::WellFormed {
                date: NaiveDate::from_ymd(2023, 1, 1),
                title: Some(String::from("hello-world-again")),
            }
        );
    }

    #[test]
    fn test_parse_well_formed_no_title() {
        assert_eq!(
            parse_base_name("2023-06-15"),
            ParsedName::WellFormed {
                date: NaiveDate::from_ymd(2023, 6, 15),
                title: None,
            }
        );
    }

    #[test]
    fn test_parse_fallback() {
        assert_eq!(
            parse_base_name("notes"),
            ParsedName::Fallback {
                title: String::from("notes"),
            }
        );
    }

    #[test]
    fn test_parse_non_numeric_date_falls_back() {
        assert_eq!(
            parse_base_name("XXXX-YY-ZZ-foo"),
            ParsedName::Fallback {
                title: String::from("XXXX-YY-ZZ-foo"),
            }
        );
    }

    #[test]
    fn test_parse_out_of_range_date_falls_back() {
        assert_eq!(
            parse_base_name("2023-13-45-foo"),
            ParsedName::Fallback {
                title: String::from("2023-13-45-foo"),
            }
        );
    }

    #[test]
    fn test_parse_wrong_segment_lengths_falls_back() {
        assert_eq!(
            parse_base_name("23-1-1-foo"),
            ParsedName::Fallback {
                title: String::from("23-1-1-foo"),
            }
        );
    }

    #[test]
    fn test_page_well_formed() {
        let page = Page::new(
            "2023-01-01-hello.md",
            String::from("<p>hi</p>"),
            mtime(2020, 1, 1),
            true,
        );
        assert_eq!(page.title, "hello");
        assert_eq!(page.output_name, "2023-01-01-hello.html");
        assert_eq!(page.modification_date, mtime(2023, 1, 1));
    }

    #[test]
    fn test_page_well_formed_no_title_uses_date() {
        let page = Page::new(
            "2023-06-15.md",
            String::new(),
            mtime(2020, 1, 1),
            true,
        );
        assert_eq!(page.title, "2023-06-15");
        assert_eq!(page.output_name, "2023-06-15.html");
        assert_eq!(page.modification_date, mtime(2023, 6, 15));
    }

    #[test]
    fn test_page_fallback_uses_file_metadata() {
        let page = Page::new("notes.md", String::new(), mtime(2023, 3, 1), true);
        assert_eq!(page.title, "notes");
        assert_eq!(page.output_name, "notes.html");
        assert_eq!(page.modification_date, mtime(2023, 3, 1));
    }

    #[test]
    fn test_page_timestamps_from_metadata() {
        // With the filename-timestamps setting off, even a well-formed name
        // takes its timestamp from the file while keeping the derived names.
        let page = Page::new(
            "2023-01-01-hello.md",
            String::new(),
            mtime(2020, 2, 2),
            false,
        );
        assert_eq!(page.output_name, "2023-01-01-hello.html");
        assert_eq!(page.modification_date, mtime(2020, 2, 2));
    }

    fn stub(output_name: &str, date: DateTime<Local>) -> Page {
        Page {
            title: output_name.trim_end_matches(HTML_EXTENSION).to_owned(),
            output_name: output_name.to_owned(),
            content: String::new(),
            modification_date: date,
        }
    }

    #[test]
    fn test_sort_descending() {
        let mut pages = vec![
            stub("2023-01-01-hello.html", mtime(2023, 1, 1)),
            stub("2023-06-15.html", mtime(2023, 6, 15)),
            stub("notes.html", mtime(2023, 3, 1)),
        ];
        sort_pages(&mut pages);
        let order: Vec<&str> = pages.iter().map(|p| p.output_name.as_str()).collect();
        assert_eq!(
            order,
            vec!["2023-06-15.html", "notes.html", "2023-01-01-hello.html"]
        );
    }

    #[test]
    fn test_sort_ties_break_on_output_name() {
        let mut pages = vec![
            stub("b.html", mtime(2023, 1, 1)),
            stub("a.html", mtime(2023, 1, 1)),
        ];
        sort_pages(&mut pages);
        let order: Vec<&str> = pages.iter().map(|p| p.output_name.as_str()).collect();
        assert_eq!(order, vec!["a.html", "b.html"]);
    }

    #[test]
    fn test_load_pages_excludes_readme() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("README.md"), "# index body")?;
        std::fs::write(dir.path().join("2023-01-01-hello.md"), "hello")?;
        std::fs::write(dir.path().join("notes.txt"), "not markdown")?;
        let pages = load_pages(dir.path(), true)?;
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].output_name, "2023-01-01-hello.html");
        Ok(())
    }

    #[test]
    fn test_load_pages_empty_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("README.md"), "# index body")?;
        let pages = load_pages(dir.path(), true)?;
        assert!(pages.is_empty());
        Ok(())
    }
}
