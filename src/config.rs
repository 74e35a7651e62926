//! Loading and validating the site settings. Settings come from a YAML file
//! (`docr.yaml` by default) and individual fields can be overridden through
//! `DOCR_*` environment variables. The loaded [`Settings`] value is passed
//! explicitly into each component; there is no process-wide configuration
//! singleton.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Site-level settings, immutable for the duration of one run.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub github_username: String,
    pub website_name: String,
    pub website_url: Url,
    pub website_description: String,
    pub template_dir: PathBuf,
    pub markdown_dir: PathBuf,
    pub output_dir: PathBuf,

    /// When true, well-formed file names (`yyyy-mm-dd-title.md`) supply the
    /// page timestamp; when false, the filesystem modification time is used
    /// even for well-formed names.
    #[serde(default = "default_timestamps_from_filename")]
    pub timestamps_from_filename: bool,
}

fn default_timestamps_from_filename() -> bool {
    true
}

impl Settings {
    /// Loads settings from `path` and applies any `DOCR_*` environment
    /// variable overrides on top of the file values.
    pub fn from_file(path: &Path) -> Result<Settings> {
        let file = std::fs::File::open(path).map_err(|err| Error::OpenSettingsFile {
            path: path.to_owned(),
            err,
        })?;
        let mut settings: Settings = serde_yaml::from_reader(file)?;
        settings.apply_env_overrides()?;
        Ok(settings)
    }

    /// Overrides individual fields from the environment, mirroring the
    /// settings file keys: `DOCR_GITHUB_USERNAME`, `DOCR_WEBSITE_NAME`,
    /// `DOCR_WEBSITE_URL`, `DOCR_WEBSITE_DESCRIPTION`, `DOCR_TEMPLATE_DIR`,
    /// `DOCR_MARKDOWN_DIR`, `DOCR_OUTPUT_DIR`, and
    /// `DOCR_TIMESTAMPS_FROM_FILENAME`.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("DOCR_GITHUB_USERNAME") {
            self.github_username = value;
        }
        if let Ok(value) = std::env::var("DOCR_WEBSITE_NAME") {
            self.website_name = value;
        }
        if let Ok(value) = std::env::var("DOCR_WEBSITE_URL") {
            self.website_url = Url::parse(&value)?;
        }
        if let Ok(value) = std::env::var("DOCR_WEBSITE_DESCRIPTION") {
            self.website_description = value;
        }
        if let Ok(value) = std::env::var("DOCR_TEMPLATE_DIR") {
            self.template_dir = PathBuf::from(value);
        }
        if let Ok(value) = std::env::var("DOCR_MARKDOWN_DIR") {
            self.markdown_dir = PathBuf::from(value);
        }
        if let Ok(value) = std::env::var("DOCR_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(value);
        }
        if let Ok(value) = std::env::var("DOCR_TIMESTAMPS_FROM_FILENAME") {
            self.timestamps_from_filename = value
                .parse()
                .map_err(|_| Error::InvalidBool { value })?;
        }
        Ok(())
    }

    /// Checks that the input directories exist. A missing template or
    /// markdown directory is fatal at startup; the output directory is
    /// created later if absent.
    pub fn check_directories(&self) -> Result<()> {
        for dir in &[&self.template_dir, &self.markdown_dir] {
            if !dir.is_dir() {
                return Err(Error::MissingDirectory {
                    path: dir.to_path_buf(),
                });
            }
        }
        Ok(())
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading or validating settings.
#[derive(Debug)]
pub enum Error {
    /// Returned when the settings file can't be opened.
    OpenSettingsFile { path: PathBuf, err: std::io::Error },

    /// Returned when the settings file isn't valid YAML or is missing fields.
    Yaml(serde_yaml::Error),

    /// Returned when a URL override isn't a valid URL.
    UrlParse(url::ParseError),

    /// Returned when a boolean override isn't `true` or `false`.
    InvalidBool { value: String },

    /// Returned when a required input directory doesn't exist.
    MissingDirectory { path: PathBuf },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenSettingsFile { path, err } => {
                write!(f, "Opening settings file '{}': {}", path.display(), err)
            }
            Error::Yaml(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::InvalidBool { value } => {
                write!(f, "Invalid boolean value '{}'", value)
            }
            Error::MissingDirectory { path } => {
                write!(f, "Directory '{}' does not exist", path.display())
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenSettingsFile { path: _, err } => Some(err),
            Error::Yaml(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::InvalidBool { value: _ } => None,
            Error::MissingDirectory { path: _ } => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts [`serde_yaml::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator when deserializing the settings file.
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when parsing URL overrides.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn write_settings(dir: &Path) -> PathBuf {
        let path = dir.join("docr.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "github_username: weberc2\n\
             website_name: Example Notes\n\
             website_url: https://notes.example.org/\n\
             website_description: Assorted notes\n\
             template_dir: {dir}/templates\n\
             markdown_dir: {dir}/markdown\n\
             output_dir: {dir}/output\n",
            dir = dir.display(),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path());
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.website_name, "Example Notes");
        assert_eq!(settings.website_url.as_str(), "https://notes.example.org/");
        assert!(settings.timestamps_from_filename);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path());
        let settings = Settings::from_file(&path).unwrap();
        match settings.check_directories() {
            Err(Error::MissingDirectory { path: _ }) => (),
            other => panic!("expected MissingDirectory, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_directories_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path());
        std::fs::create_dir(dir.path().join("templates")).unwrap();
        std::fs::create_dir(dir.path().join("markdown")).unwrap();
        let settings = Settings::from_file(&path).unwrap();
        settings.check_directories().unwrap();
    }
}
