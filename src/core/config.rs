//! # Configuration Module
//!
//! Provides configuration management for the SitemapFlow generation engine.
//! The configuration is an immutable value the generator is constructed with:
//! feature toggles deciding which resource kinds enter the sitemap, the list
//! of custom URLs, the shard size, and the scheme selection flag. Sources are
//! TOML files, environment variables and programmatic overrides.
//!
//! ## Example
//!
//! ```rust
//! use sitemapflow::core::config::{ConfigBuilder, SitemapConfig};
//!
//! let config: SitemapConfig = ConfigBuilder::new()
//!     .with_override("max_urls_per_sitemap", 200)
//!     .with_override("force_https", true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_urls_per_sitemap, 200);
//! assert!(config.force_https);
//! ```

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toml::Value as TomlValue;

use crate::core::error::{Result, SitemapError};
use crate::core::traits::{Scheme, StoreId};

/// Default maximum number of entries per sitemap document, the limit search
/// engines accept for one file.
pub const DEFAULT_MAX_URLS_PER_SITEMAP: usize = 50_000;

/// The immutable configuration surface of one generation run.
///
/// All toggles are plain data: the generator never consults ambient or
/// mutable state while producing a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    #[serde(default = "default_true")]
    /// Includes category pages in the sitemap.
    pub include_categories: bool,

    #[serde(default = "default_true")]
    /// Includes manufacturer pages in the sitemap.
    pub include_manufacturers: bool,

    #[serde(default = "default_true")]
    /// Includes individually-visible product pages in the sitemap.
    pub include_products: bool,

    #[serde(default = "default_true")]
    /// Includes products-by-tag pages in the sitemap.
    pub include_product_tags: bool,

    #[serde(default = "default_true")]
    /// Includes the news archive page when the news feature is on.
    pub news_enabled: bool,

    #[serde(default = "default_true")]
    /// Includes the blog index page when the blog feature is on.
    pub blog_enabled: bool,

    #[serde(default)]
    /// Includes the forum boards page when forums are on.
    pub forums_enabled: bool,

    #[serde(default)]
    /// Emits localized alternate links for every active locale.
    pub localized_urls_enabled: bool,

    #[serde(default)]
    /// Resolves every URL with the `https` scheme.
    pub force_https: bool,

    #[serde(default)]
    /// Extra URLs appended verbatim (relative to the store location).
    pub custom_urls: Vec<String>,

    #[serde(default = "default_max_urls_per_sitemap")]
    /// Maximum number of entries per sitemap document; the total entry count
    /// reaching this threshold switches output to a sitemap index.
    pub max_urls_per_sitemap: usize,

    #[serde(default)]
    /// Application path base the site is mounted under (often empty).
    pub path_base: String,

    #[serde(default = "default_store_id")]
    /// Identifier of the store scope resources are enumerated for.
    pub store_id: StoreId,
}

fn default_true() -> bool {
    true
}

fn default_max_urls_per_sitemap() -> usize {
    DEFAULT_MAX_URLS_PER_SITEMAP
}

fn default_store_id() -> StoreId {
    1
}

impl Default for SitemapConfig {
    /// Creates a default configuration: catalog resources included, news and
    /// blog on, forums and localized URLs off, 50 000 entries per shard.
    fn default() -> Self {
        Self {
            include_categories: default_true(),
            include_manufacturers: default_true(),
            include_products: default_true(),
            include_product_tags: default_true(),
            news_enabled: default_true(),
            blog_enabled: default_true(),
            forums_enabled: false,
            localized_urls_enabled: false,
            force_https: false,
            custom_urls: Vec::new(),
            max_urls_per_sitemap: default_max_urls_per_sitemap(),
            path_base: String::new(),
            store_id: default_store_id(),
        }
    }
}

impl SitemapConfig {
    /// Loads a configuration from a TOML file and validates it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = load_from_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration, ensuring the shard size is usable.
    pub fn validate(&self) -> Result<()> {
        validate_config(self)
    }

    /// Returns the URL scheme every route resolution uses, derived from the
    /// force-HTTPS flag.
    pub fn scheme(&self) -> Scheme {
        if self.force_https {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }
}

/// Builds a [`SitemapConfig`] by combining a TOML file, environment variables
/// and programmatic overrides.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
    overrides: HashMap<String, TomlValue>,
}

impl ConfigBuilder {
    /// Initialises a new `ConfigBuilder` instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a configuration file to the builder.
    ///
    /// # Parameters
    /// - `path`: The path to the TOML configuration file.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a prefix for environment variables to override configuration
    /// values (e.g. `SITEMAPFLOW_` matching `SITEMAPFLOW_FORCE_HTTPS`).
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Adds a key-value pair to override configuration values.
    ///
    /// # Parameters
    /// - `key`: The configuration key to override.
    /// - `value`: The new value for the key.
    pub fn with_override<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<TomlValue>,
    {
        _ = self.overrides.insert(key.into(), value.into());
        self
    }

    /// Builds the final configuration by applying all specified settings and
    /// overrides, then validating the result.
    pub fn build(self) -> Result<SitemapConfig> {
        let mut config = if let Some(path) = self.config_file {
            load_from_file(&path)?
        } else {
            SitemapConfig::default()
        };

        if let Some(prefix) = self.env_prefix {
            apply_env_overrides(&mut config, &prefix)?;
        }

        apply_overrides(&mut config, &self.overrides)?;
        validate_config(&config)?;

        Ok(config)
    }
}

// Internal helper functions

fn load_from_file(path: &Path) -> Result<SitemapConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        SitemapError::config_error(
            format!("Failed to read config file: {}", e),
            Some(path.to_path_buf()),
        )
    })?;

    toml::from_str(&content).map_err(|e| {
        SitemapError::config_error(
            format!("Failed to parse config file: {}", e),
            Some(path.to_path_buf()),
        )
    })
}

fn apply_env_overrides(
    config: &mut SitemapConfig,
    prefix: &str,
) -> Result<()> {
    for (key, value) in env::vars() {
        // Strip the prefix and ensure no leading underscores remain
        if let Some(stripped) = key.strip_prefix(prefix) {
            let config_key =
                stripped.trim_start_matches('_').to_lowercase();
            apply_config_value(config, &config_key, &value)?;
        }
    }
    Ok(())
}

fn apply_overrides(
    config: &mut SitemapConfig,
    overrides: &HashMap<String, TomlValue>,
) -> Result<()> {
    for (key, value) in overrides {
        apply_config_value(config, key, value)?;
    }
    Ok(())
}

fn validate_config(config: &SitemapConfig) -> Result<()> {
    if config.max_urls_per_sitemap == 0 {
        return Err(SitemapError::config_error(
            "max_urls_per_sitemap must be at least 1",
            None,
        ));
    }

    if !config.path_base.is_empty() && !config.path_base.starts_with('/') {
        return Err(SitemapError::config_error(
            "path_base must start with `/` when set",
            None,
        ));
    }

    Ok(())
}

fn apply_config_value<T: ToString>(
    config: &mut SitemapConfig,
    key: &str,
    value: &T,
) -> Result<()> {
    let value_str = value.to_string().trim_matches('"').to_string();

    match key {
        "include_categories" => {
            config.include_categories = parse_bool(key, &value_str)?
        }
        "include_manufacturers" => {
            config.include_manufacturers = parse_bool(key, &value_str)?
        }
        "include_products" => {
            config.include_products = parse_bool(key, &value_str)?
        }
        "include_product_tags" => {
            config.include_product_tags = parse_bool(key, &value_str)?
        }
        "news_enabled" => config.news_enabled = parse_bool(key, &value_str)?,
        "blog_enabled" => config.blog_enabled = parse_bool(key, &value_str)?,
        "forums_enabled" => {
            config.forums_enabled = parse_bool(key, &value_str)?
        }
        "localized_urls_enabled" => {
            config.localized_urls_enabled = parse_bool(key, &value_str)?
        }
        "force_https" => config.force_https = parse_bool(key, &value_str)?,
        "custom_urls" => config.custom_urls = parse_list(&value_str),
        "max_urls_per_sitemap" => {
            config.max_urls_per_sitemap =
                value_str.parse().map_err(|_| {
                    SitemapError::config_error(
                        format!("Invalid value for `{}`: {}", key, value_str),
                        None,
                    )
                })?
        }
        "path_base" => config.path_base = value_str,
        "store_id" => {
            config.store_id = value_str.parse().map_err(|_| {
                SitemapError::config_error(
                    format!("Invalid value for `{}`: {}", key, value_str),
                    None,
                )
            })?
        }
        _ => {
            return Err(SitemapError::config_error(
                format!("Unknown configuration key: {}", key),
                None,
            ))
        }
    }

    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value.parse().map_err(|_| {
        SitemapError::config_error(
            format!("Invalid boolean for `{}`: {}", key, value),
            None,
        )
    })
}

/// Parses a comma-separated (or TOML-array-shaped) list of URLs.
fn parse_list(value: &str) -> Vec<String> {
    value
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|item| item.trim().trim_matches('"').to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
