//! Configuration types for the post-processing pipeline.
//!
//! All pipeline behaviour is controlled through [`PipelineConfig`], built via
//! its [`PipelineConfigBuilder`]. The config is an immutable value: a run
//! borrows it for its whole duration, and "resetting" means starting again
//! from [`PipelineConfig::default()`].
//!
//! # URL prefixes
//!
//! Three prefix slots exist: `url_prefix` (images *and* anchors),
//! `image_prefix` and `anchor_prefix`. When `url_prefix` is set the two
//! per-category slots are ignored entirely, they are never merged.

use crate::error::MdPostError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

/// Configuration for one pipeline run.
///
/// Built via [`PipelineConfig::builder()`] or using
/// [`PipelineConfig::default()`] (the blank state).
///
/// # Example
/// ```rust
/// use mdpost::{PipelineConfig, UrlPrefix};
///
/// let config = PipelineConfig::builder()
///     .text("![logo](img/logo.png)")
///     .image_prefix(UrlPrefix::uniform("/static/"))
///     .build()
///     .unwrap();
/// assert!(config.image_rules().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Literal Markdown source.
    ///
    /// Used when no path is given, or when the given path does not exist.
    pub text: Option<String>,

    /// Prefix applied to both image and anchor URLs. Overrides the two
    /// per-category slots when set.
    pub url_prefix: UrlPrefix,

    /// Prefix applied to local image URLs (`![alt](url)`).
    pub image_prefix: UrlPrefix,

    /// Prefix applied to local anchor URLs (`[text](url)`).
    pub anchor_prefix: UrlPrefix,

    /// Emit `#name` annotation tokens as classes instead of an `id`. Default: false.
    ///
    /// Older sites were built against a paragraph annotator that pushed both
    /// `.class` and `#id` tokens into the `class` attribute and never wrote an
    /// `id`. Turning this on reproduces that output byte for byte.
    pub ids_as_classes: bool,
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults. The loaded value is run
    /// through the same validation as [`PipelineConfigBuilder::build`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MdPostError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| MdPostError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig =
            serde_json::from_str(&raw).map_err(|source| MdPostError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Prefix rules for image references, or `None` when images are left alone.
    pub fn image_rules(&self) -> Option<Cow<'_, [PrefixRule]>> {
        self.effective(&self.image_prefix).rules()
    }

    /// Prefix rules for anchor references, or `None` when anchors are left alone.
    pub fn anchor_rules(&self) -> Option<Cow<'_, [PrefixRule]>> {
        self.effective(&self.anchor_prefix).rules()
    }

    fn effective<'a>(&'a self, category: &'a UrlPrefix) -> &'a UrlPrefix {
        if self.url_prefix.is_set() {
            &self.url_prefix
        } else {
            category
        }
    }

    fn validate(&self) -> Result<(), MdPostError> {
        for (slot, prefix) in [
            ("url_prefix", &self.url_prefix),
            ("image_prefix", &self.image_prefix),
            ("anchor_prefix", &self.anchor_prefix),
        ] {
            if let UrlPrefix::Uniform(value) = prefix {
                if value.is_empty() {
                    return Err(MdPostError::InvalidConfig(format!("{slot}: empty prefix")));
                }
            }
            if let UrlPrefix::Keyed(rules) = prefix {
                let mut seen = HashSet::new();
                for rule in rules {
                    if rule.prefix.is_empty() {
                        return Err(MdPostError::InvalidConfig(format!(
                            "{slot}: empty prefix for key '{}'",
                            rule.key
                        )));
                    }
                    if !seen.insert(rule.key.as_str()) {
                        return Err(MdPostError::InvalidConfig(format!(
                            "{slot}: duplicate key '{}'",
                            rule.key
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.config.text = Some(text.into());
        self
    }

    pub fn url_prefix(mut self, prefix: impl Into<UrlPrefix>) -> Self {
        self.config.url_prefix = prefix.into();
        self
    }

    pub fn image_prefix(mut self, prefix: impl Into<UrlPrefix>) -> Self {
        self.config.image_prefix = prefix.into();
        self
    }

    pub fn anchor_prefix(mut self, prefix: impl Into<UrlPrefix>) -> Self {
        self.config.anchor_prefix = prefix.into();
        self
    }

    pub fn ids_as_classes(mut self, v: bool) -> Self {
        self.config.ids_as_classes = v;
        self
    }

    /// Build the configuration, validating the prefix slots.
    ///
    /// An empty uniform prefix, a keyed rule with an empty prefix, or two
    /// rules sharing a key is rejected with [`MdPostError::InvalidConfig`].
    pub fn build(self) -> Result<PipelineConfig, MdPostError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ── URL prefixes ─────────────────────────────────────────────────────────

/// One entry of a keyed prefix mapping.
///
/// URLs that start with `key` get `prefix` prepended. An empty key matches
/// every local URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub key: String,
    pub prefix: String,
}

impl PrefixRule {
    pub fn new(key: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            prefix: prefix.into(),
        }
    }
}

/// How local URLs of one category are prefixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlPrefix {
    /// No rewriting (default).
    #[default]
    None,
    /// Prepend the same string to every local URL.
    Uniform(String),
    /// Ordered (key, prefix) rules, each applied in turn to URLs starting with its key.
    Keyed(Vec<PrefixRule>),
}

impl UrlPrefix {
    pub fn uniform(prefix: impl Into<String>) -> Self {
        UrlPrefix::Uniform(prefix.into())
    }

    /// Build a keyed mapping from `(key, prefix)` pairs, keeping their order.
    pub fn keyed<K, P>(pairs: impl IntoIterator<Item = (K, P)>) -> Self
    where
        K: Into<String>,
        P: Into<String>,
    {
        UrlPrefix::Keyed(
            pairs
                .into_iter()
                .map(|(k, p)| PrefixRule::new(k, p))
                .collect(),
        )
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, UrlPrefix::None)
    }

    /// The mapping as an ordered rule list.
    ///
    /// A uniform prefix is a single rule with an empty key.
    pub fn rules(&self) -> Option<Cow<'_, [PrefixRule]>> {
        match self {
            UrlPrefix::None => None,
            UrlPrefix::Uniform(prefix) => Some(Cow::Owned(vec![PrefixRule::new("", prefix.as_str())])),
            UrlPrefix::Keyed(rules) => Some(Cow::Borrowed(rules.as_slice())),
        }
    }
}

impl From<&str> for UrlPrefix {
    fn from(prefix: &str) -> Self {
        UrlPrefix::Uniform(prefix.to_string())
    }
}

impl From<String> for UrlPrefix {
    fn from(prefix: String) -> Self {
        UrlPrefix::Uniform(prefix)
    }
}

impl From<Vec<PrefixRule>> for UrlPrefix {
    fn from(rules: Vec<PrefixRule>) -> Self {
        UrlPrefix::Keyed(rules)
    }
}
