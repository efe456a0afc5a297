//! Style catalog and installation seam.

use std::path::Path;

use async_trait::async_trait;

/// The style that ships inside the Vale binary and is always installed.
pub const BUILTIN_STYLE: &str = "Vale";

/// A style package known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub name: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    /// Zip archive containing a directory named after the style.
    pub download_url: Option<String>,
}

impl Style {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            homepage: None,
            download_url: None,
        }
    }

    fn library(name: &str, description: &str, homepage: &str, download_url: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            homepage: Some(homepage.to_string()),
            download_url: Some(download_url.to_string()),
        }
    }
}

/// A catalog entry together with its state in the current configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleStatus {
    pub style: Style,
    pub enabled: bool,
    pub installed: bool,
}

/// Downloads and unpacks a style package into the styles directory.
///
/// Fetching and extraction live outside this crate; the store only decides
/// when an install is needed and reports failures.
#[async_trait]
pub trait StyleInstaller: Send + Sync {
    async fn install(
        &self,
        style: &Style,
        styles_dir: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// The official style library.
pub fn catalog() -> Vec<Style> {
    vec![
        Style::library(
            "Google",
            "A Vale-compatible implementation of the Google Developer Documentation Style Guide.",
            "https://github.com/errata-ai/Google",
            "https://github.com/errata-ai/Google/releases/latest/download/Google.zip",
        ),
        Style::library(
            "Joblint",
            "Test tech job posts for issues with sexism, culture, expectations, and recruiter fails.",
            "https://github.com/errata-ai/Joblint",
            "https://github.com/errata-ai/Joblint/releases/latest/download/Joblint.zip",
        ),
        Style::library(
            "Microsoft",
            "A Vale-compatible implementation of the Microsoft Writing Style Guide.",
            "https://github.com/errata-ai/Microsoft",
            "https://github.com/errata-ai/Microsoft/releases/latest/download/Microsoft.zip",
        ),
        Style::library(
            "proselint",
            "proselint places the world's greatest writers and editors by your side, where they whisper suggestions on how to improve your prose.",
            "https://github.com/errata-ai/proselint",
            "https://github.com/errata-ai/proselint/releases/latest/download/proselint.zip",
        ),
        Style::library(
            "RedHat",
            "A Vale-compatible implementation of the Red Hat supplementary style guide for product documentation.",
            "https://redhat-documentation.github.io/vale-at-red-hat/docs/main/user-guide/redhat-style-for-vale/",
            "https://github.com/redhat-documentation/vale-at-red-hat/releases/latest/download/RedHat.zip",
        ),
        Style::library(
            "write-good",
            "Naive linter for English prose for developers who can't write good and wanna learn to do other stuff good too.",
            "https://github.com/errata-ai/write-good",
            "https://github.com/errata-ai/write-good/releases/latest/download/write-good.zip",
        ),
        Style::library(
            "alex",
            "Catch insensitive, inconsiderate writing.",
            "https://github.com/errata-ai/alex",
            "https://github.com/errata-ai/alex/releases/latest/download/alex.zip",
        ),
        Style::library(
            "Readability",
            "Vale-compatible implementations of many popular readability metrics.",
            "https://github.com/errata-ai/Readability",
            "https://github.com/errata-ai/Readability/releases/latest/download/Readability.zip",
        ),
        Style::library(
            "Openly",
            "A Vale linter style that attempts to emulate some features of the commercial, and closed source.",
            "https://github.com/testthedocs/Openly",
            "https://github.com/testthedocs/Openly/releases/latest/download/Openly.zip",
        ),
    ]
}

/// Looks up a catalog entry by exact name.
pub fn find_style(name: &str) -> Option<Style> {
    catalog().into_iter().find(|style| style.name == name)
}

/// True if `name` is usable as a single directory component.
pub(crate) fn is_safe_style_name(name: &str) -> bool {
    let path = Path::new(name);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(c)), None) => c == name,
        _ => false,
    }
}
