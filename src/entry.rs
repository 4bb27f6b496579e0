//! # Sitemap Entry Module
//!
//! Defines the immutable [`SitemapEntry`] value and the [`EntryBuilder`] that
//! turns one logical resource into an entry: the canonical URL resolved once,
//! plus one localized alternate per active locale for which resolution
//! succeeds. A locale whose URL cannot be resolved is dropped silently; the
//! entry itself is never failed for a missing alternate.

use chrono::{DateTime, Utc};
use log::debug;
use url::Url;

use crate::core::traits::{RouteParamsProvider, RouteResolver, Scheme};
use crate::locale::{localize_path, Locale};

/// How frequently a page is likely to change, as hinted to sitemap consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateFrequency {
    /// The page changes on every access.
    Always,
    /// The page changes roughly hourly.
    Hourly,
    /// The page changes roughly daily.
    Daily,
    /// The page changes roughly weekly.
    #[default]
    Weekly,
    /// The page changes roughly monthly.
    Monthly,
    /// The page changes roughly yearly.
    Yearly,
    /// The page is archived and never changes.
    Never,
}

impl UpdateFrequency {
    /// Returns the lowercase name used in `<changefreq>` elements.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateFrequency::Always => "always",
            UpdateFrequency::Hourly => "hourly",
            UpdateFrequency::Daily => "daily",
            UpdateFrequency::Weekly => "weekly",
            UpdateFrequency::Monthly => "monthly",
            UpdateFrequency::Yearly => "yearly",
            UpdateFrequency::Never => "never",
        }
    }
}

/// One entry of a sitemap document: a canonical location, its localized
/// alternate locations, an update-frequency hint and a last-modification
/// timestamp.
///
/// Entries are immutable once built. Alternate order follows the locale
/// iteration order they were resolved in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    location: String,
    alternate_locations: Vec<String>,
    update_frequency: UpdateFrequency,
    updated_on: DateTime<Utc>,
}

impl SitemapEntry {
    /// Creates a new entry.
    ///
    /// # Arguments
    /// * `location` - The absolute canonical URL.
    /// * `alternate_locations` - Localized URL variants, in locale order.
    /// * `update_frequency` - The change-frequency hint.
    /// * `updated_on` - The last-modification time.
    pub fn new<S: Into<String>>(
        location: S,
        alternate_locations: Vec<String>,
        update_frequency: UpdateFrequency,
        updated_on: DateTime<Utc>,
    ) -> Self {
        Self {
            location: location.into(),
            alternate_locations,
            update_frequency,
            updated_on,
        }
    }

    /// Creates an entry at a different location carrying this entry's
    /// alternates, frequency and timestamp.
    ///
    /// The writer uses this to re-emit a logical resource once per locale
    /// variant, each variant announcing the same sibling set.
    pub fn with_location<S: Into<String>>(&self, location: S) -> Self {
        Self {
            location: location.into(),
            alternate_locations: self.alternate_locations.clone(),
            update_frequency: self.update_frequency,
            updated_on: self.updated_on,
        }
    }

    /// The absolute canonical URL of the entry.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The localized alternate URLs, in locale order.
    pub fn alternate_locations(&self) -> &[String] {
        &self.alternate_locations
    }

    /// The change-frequency hint.
    pub fn update_frequency(&self) -> UpdateFrequency {
        self.update_frequency
    }

    /// The last-modification time.
    pub fn updated_on(&self) -> DateTime<Utc> {
        self.updated_on
    }
}

/// Builds [`SitemapEntry`] values for named routes, resolving one URL per
/// active locale through a deferred route-params capability.
#[derive(Debug)]
pub struct EntryBuilder<'a> {
    routes: &'a dyn RouteResolver,
    path_base: &'a str,
    scheme: Scheme,
}

impl<'a> EntryBuilder<'a> {
    /// Creates a builder bound to a route resolver, path base and scheme.
    pub fn new(
        routes: &'a dyn RouteResolver,
        path_base: &'a str,
        scheme: Scheme,
    ) -> Self {
        Self {
            routes,
            path_base,
            scheme,
        }
    }

    /// Builds the entry for one logical resource.
    ///
    /// The canonical URL is resolved once with no locale parameter. When
    /// `locales` is `None` the entry carries no alternates (single-locale
    /// site). Otherwise each locale's URL is resolved through `params`,
    /// its path-and-query localized, and reassembled against the resolved
    /// URL's own scheme and host; locales whose URL cannot be resolved are
    /// dropped without error.
    ///
    /// # Returns
    /// * `Option<SitemapEntry>` - `None` only when the canonical route itself
    ///   cannot be resolved, in which case the resource is skipped.
    pub fn build(
        &self,
        route_name: &str,
        params: Option<&dyn RouteParamsProvider>,
        locales: Option<&[Locale]>,
        updated_on: DateTime<Utc>,
        update_frequency: UpdateFrequency,
    ) -> Option<SitemapEntry> {
        let canonical_params = params.map(|p| p.params_for(None));
        let location = self.routes.route_url(
            route_name,
            canonical_params.as_ref(),
            self.scheme,
        )?;

        let locales = match locales {
            Some(locales) => locales,
            None => {
                return Some(SitemapEntry::new(
                    location,
                    Vec::new(),
                    update_frequency,
                    updated_on,
                ))
            }
        };

        let mut alternates = Vec::with_capacity(locales.len());
        for locale in locales {
            let locale_params =
                params.map(|p| p.params_for(Some(locale.id)));
            let resolved = match self.routes.route_url(
                route_name,
                locale_params.as_ref(),
                self.scheme,
            ) {
                Some(url) => url,
                None => continue,
            };

            match self.localized_alternate(&resolved, locales, locale) {
                Some(alternate) => alternates.push(alternate),
                None => {
                    debug!(
                        "Skipping unparsable alternate for route `{}` and locale `{}`",
                        route_name, locale.code
                    );
                }
            }
        }

        Some(SitemapEntry::new(
            location,
            alternates,
            update_frequency,
            updated_on,
        ))
    }

    /// Rewrites one resolved URL into its locale-qualified form, keeping the
    /// resolved URL's own scheme and host.
    fn localized_alternate(
        &self,
        resolved: &str,
        locales: &[Locale],
        target: &Locale,
    ) -> Option<String> {
        let url = Url::parse(resolved).ok()?;
        let scheme_and_host = url.origin().ascii_serialization();

        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let localized = localize_path(
            &path_and_query,
            self.path_base,
            locales,
            target,
        );

        Some(format!("{}{}", scheme_and_host, localized))
    }
}
