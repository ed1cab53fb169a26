use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    href::{CrossLinks, HrefStrategy, NoLinks},
    links::{Pythex, Regex101},
};

/// Application configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Hyperlink configuration section
    #[serde(default)]
    pub links: LinkConfig,

    /// Style configuration section
    #[serde(default)]
    pub style: StyleConfig,
}

/// Hyperlink configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    /// Link rule and token references to their diagrams
    #[serde(default = "default_cross_reference")]
    pub cross_reference: bool,

    /// Service that regular expression literals link to
    #[serde(default)]
    pub regex: RegexService,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            cross_reference: default_cross_reference(),
            regex: RegexService::default(),
        }
    }
}

fn default_cross_reference() -> bool {
    true
}

impl LinkConfig {
    /// Build the href strategy described by this section.
    ///
    /// Regex links are only produced when cross-referencing is enabled.
    pub fn href_strategy(&self) -> Box<dyn HrefStrategy> {
        if !self.cross_reference {
            return Box::new(NoLinks);
        }
        let links = CrossLinks::new();
        match self.regex {
            RegexService::None => Box::new(links),
            RegexService::Regex101 => Box::new(links.with_regex_links(Regex101)),
            RegexService::Pythex => Box::new(links.with_regex_links(Pythex)),
        }
    }
}

/// Online regex tester used for regular expression links
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegexService {
    #[default]
    None,
    Regex101,
    Pythex,
}

/// Style configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Style sheet replacing the built-in one
    #[serde(default)]
    stylesheet: Option<PathBuf>,
}

impl StyleConfig {
    /// Use the style sheet at `path` instead of the built-in one.
    pub fn with_stylesheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.stylesheet = Some(path.into());
        self
    }

    /// Path of the custom style sheet, if one is configured
    pub fn stylesheet(&self) -> Option<&Path> {
        self.stylesheet.as_deref()
    }
}
