//! # Core Traits Module
//!
//! This module defines the capability traits that the sitemap engine consumes.
//! The engine itself never talks to a database, a router or a locale registry
//! directly: everything it needs from the outside world arrives through one of
//! these traits, so the collector and writer can be exercised against fakes.
//!
//! ## Key Traits
//!
//! - [`RouteResolver`]: Resolves a named logical page or resource to a URL
//! - [`RouteParamsProvider`]: Deferred, per-locale route parameter resolution
//! - [`LocaleProvider`]: Enumerates the active locales of the site
//! - [`SlugResolver`]: Localized SEO slug lookup for catalog resources
//! - [`ResourceCatalog`]: Ordered enumeration of sitemap-relevant resources
//!
//! ## Design Philosophy
//!
//! The traits in this module follow these key principles:
//!
//! - **Separation of Concerns**: Each trait has a single, well-defined responsibility
//! - **Graceful Degradation**: URL resolution returns `Option` so a missing
//!   per-locale URL drops one alternate instead of failing the document
//! - **Fatal Provider Errors**: Catalog enumeration returns `Result` because a
//!   storage failure aborts the whole generation run

use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::locale::{Locale, LocaleId};

/// Identifier of the site scope a generation run is bound to.
pub type StoreId = u64;

/// HTTP scheme used for every resolved URL of one generation run.
///
/// Derived from the force-HTTPS configuration flag; there is no per-route
/// scheme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Plain `http` URLs.
    Http,
    /// `https` URLs, selected when the site forces SSL everywhere.
    Https,
}

impl Scheme {
    /// Returns the scheme as the string used in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// The kinds of catalog resources that can appear in a sitemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A product category page.
    Category,
    /// A manufacturer page.
    Manufacturer,
    /// An individually-visible product page.
    Product,
    /// A products-by-tag listing page.
    ProductTag,
    /// A topic (CMS) page flagged for sitemap inclusion.
    Topic,
}

/// Parameters handed to the route resolver when building a URL.
///
/// Routes in this engine take at most a SEO slug (`se_name`) or a numeric
/// shard identifier, so the type is a small value rather than a generic map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    se_name: Option<String>,
    id: Option<usize>,
}

impl RouteParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parameter set carrying a SEO slug.
    pub fn with_slug<S: Into<String>>(slug: S) -> Self {
        Self {
            se_name: Some(slug.into()),
            id: None,
        }
    }

    /// Creates a parameter set carrying a numeric identifier.
    pub fn with_id(id: usize) -> Self {
        Self {
            se_name: None,
            id: Some(id),
        }
    }

    /// Returns the SEO slug, if any.
    pub fn se_name(&self) -> Option<&str> {
        self.se_name.as_deref()
    }

    /// Returns the numeric identifier, if any.
    pub fn id(&self) -> Option<usize> {
        self.id
    }
}

/// Deferred, per-locale route parameter resolution.
///
/// Slugs are themselves localized, so the parameters needed to resolve a URL
/// cannot be computed once up front; the entry builder asks this capability
/// again for every locale. `None` requests the parameters for the canonical
/// (default) locale.
///
/// A blanket implementation exists for closures, so call sites can pass a
/// lambda capturing the resource at hand.
pub trait RouteParamsProvider: Send + Sync {
    /// Returns the route parameters for the given locale, or for the
    /// canonical locale when `locale` is `None`.
    fn params_for(&self, locale: Option<LocaleId>) -> RouteParams;
}

impl<F> RouteParamsProvider for F
where
    F: Fn(Option<LocaleId>) -> RouteParams + Send + Sync,
{
    fn params_for(&self, locale: Option<LocaleId>) -> RouteParams {
        self(locale)
    }
}

/// Resolves named logical pages and resources to absolute URLs.
///
/// Mirrors the web framework's route table without depending on it. A `None`
/// return means the route cannot be resolved with the given parameters; the
/// caller degrades gracefully (drops one alternate) rather than failing.
pub trait RouteResolver: Send + Sync + std::fmt::Debug {
    /// Resolves the named route to an absolute URL with the given scheme.
    ///
    /// # Arguments
    /// * `route_name` - The logical route name (e.g. `HomePage`, `Product`).
    /// * `params` - Optional route parameters (slug or shard id).
    /// * `scheme` - The scheme to build the URL with.
    ///
    /// # Returns
    /// * `Option<String>` - The absolute URL, or `None` when unresolvable.
    fn route_url(
        &self,
        route_name: &str,
        params: Option<&RouteParams>,
        scheme: Scheme,
    ) -> Option<String>;

    /// Returns the absolute base location of the store, ending without a
    /// trailing slash (e.g. `https://www.example.com`).
    ///
    /// Custom sitemap URLs from configuration are absolutized against this.
    fn store_location(&self, scheme: Scheme) -> String;
}

/// Enumerates the active locales of the site, in a stable iteration order.
pub trait LocaleProvider: Send + Sync + std::fmt::Debug {
    /// Returns the active locales. The order is preserved all the way into
    /// the emitted alternate links.
    fn active_locales(&self) -> Result<Vec<Locale>>;
}

/// Localized SEO slug lookup for catalog resources.
///
/// Slugs (SEO names) are stored per locale; `None` requests the canonical
/// slug. An unknown `(kind, id, locale)` combination should fall back to the
/// canonical slug rather than fail.
pub trait SlugResolver: Send + Sync + std::fmt::Debug {
    /// Returns the SEO slug for the given resource in the given locale.
    fn seo_slug(
        &self,
        kind: ResourceKind,
        id: u64,
        locale: Option<LocaleId>,
    ) -> String;
}

/// One catalog record as seen by the sitemap engine: an identifier plus an
/// optional last-modification timestamp.
///
/// Resource kinds without a tracked modification time (product tags, topics)
/// leave `updated_on` empty and the collector substitutes the generation
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    /// The resource identifier, used for slug lookup.
    pub id: u64,
    /// The last-modification time of the resource, if tracked.
    pub updated_on: Option<DateTime<Utc>>,
}

impl CatalogRecord {
    /// Creates a record without a modification timestamp.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            updated_on: None,
        }
    }

    /// Attaches a last-modification timestamp to the record.
    pub fn with_updated_on(mut self, updated_on: DateTime<Utc>) -> Self {
        self.updated_on = Some(updated_on);
        self
    }
}

/// Ordered enumeration of the catalog resources a sitemap covers.
///
/// Implementations are expected to be backed by storage and may be slow; the
/// engine consumes each result set eagerly and preserves its order. Every
/// method is fallible and a returned error aborts generation.
pub trait ResourceCatalog: Send + Sync + std::fmt::Debug {
    /// Returns all categories visible in the given store scope.
    fn categories(&self, store_id: StoreId) -> Result<Vec<CatalogRecord>>;

    /// Returns all manufacturers visible in the given store scope.
    fn manufacturers(&self, store_id: StoreId) -> Result<Vec<CatalogRecord>>;

    /// Returns all individually-visible products in the given store scope,
    /// ordered by creation time ascending.
    fn visible_products(&self, store_id: StoreId) -> Result<Vec<CatalogRecord>>;

    /// Returns all product tags.
    fn product_tags(&self) -> Result<Vec<CatalogRecord>>;

    /// Returns the topics flagged for sitemap inclusion in the given store
    /// scope.
    fn sitemap_topics(&self, store_id: StoreId) -> Result<Vec<CatalogRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_as_str() {
        assert_eq!(Scheme::Http.as_str(), "http");
        assert_eq!(Scheme::Https.as_str(), "https");
    }

    #[test]
    fn test_route_params_accessors() {
        let slug = RouteParams::with_slug("red-shoes");
        assert_eq!(slug.se_name(), Some("red-shoes"));
        assert_eq!(slug.id(), None);

        let id = RouteParams::with_id(3);
        assert_eq!(id.id(), Some(3));
        assert_eq!(id.se_name(), None);

        assert_eq!(RouteParams::new(), RouteParams::default());
    }

    #[test]
    fn test_closure_route_params_provider() {
        let provider = |locale: Option<LocaleId>| match locale {
            Some(2) => RouteParams::with_slug("chaussures-rouges"),
            _ => RouteParams::with_slug("red-shoes"),
        };

        assert_eq!(
            provider.params_for(None).se_name(),
            Some("red-shoes")
        );
        assert_eq!(
            provider.params_for(Some(2)).se_name(),
            Some("chaussures-rouges")
        );
    }

    #[test]
    fn test_catalog_record_builder() {
        let record = CatalogRecord::new(7);
        assert_eq!(record.id, 7);
        assert!(record.updated_on.is_none());

        let stamped = record.with_updated_on(Utc::now());
        assert!(stamped.updated_on.is_some());
    }
}
