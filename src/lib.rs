// Copyright © 2024 SitemapFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # SitemapFlow Library
//!
//! SitemapFlow generates standards-compliant XML sitemaps for a catalog of
//! site resources: fixed pages, categories, manufacturers, products, product
//! tags, topics and custom URLs. Entries carry localized alternate links for
//! every active locale, are sharded deterministically at a configured size,
//! and large sites are addressed through a sitemap-index document.
//!
//! For more information, visit the [SitemapFlow documentation](https://docs.rs/sitemapflow).

#![doc = include_str!("../README.md")]
#![doc(html_root_url = "https://docs.rs/sitemapflow")]
#![crate_name = "sitemapflow"]

use std::collections::HashMap;
use std::io::Write;

use log::{debug, info};

use crate::collector::{
    EntryCollector, ROUTE_BLOG, ROUTE_BOARDS, ROUTE_CATEGORY,
    ROUTE_CONTACT_US, ROUTE_HOME_PAGE, ROUTE_MANUFACTURER,
    ROUTE_NEWS_ARCHIVE, ROUTE_PRODUCT, ROUTE_PRODUCTS_BY_TAG,
    ROUTE_PRODUCT_SEARCH, ROUTE_SITEMAP_SHARD, ROUTE_TOPIC,
};
use crate::paginate::paginate;
use crate::writer::SitemapXmlWriter;

/// Module containing core utilities, such as configuration, error handling
/// and the capability traits.
pub mod core;

/// Provides entry collection across the resource providers.
pub mod collector;

/// Provides the sitemap entry value and its builder.
pub mod entry;

/// Provides URL localization utilities.
pub mod locale;

/// Provides deterministic sharding of entry lists.
pub mod paginate;

/// Provides XML serialization of sitemap and sitemap-index documents.
pub mod writer;

pub use crate::core::config::{ConfigBuilder, SitemapConfig};
pub use crate::core::error::{Result, SitemapError};
pub use crate::core::traits::{
    CatalogRecord, LocaleProvider, ResourceCatalog, ResourceKind,
    RouteParams, RouteParamsProvider, RouteResolver, Scheme, SlugResolver,
    StoreId,
};
pub use crate::entry::{SitemapEntry, UpdateFrequency};
pub use crate::locale::{Locale, LocaleId};

/// Route resolver over a fixed host and route table.
///
/// Covers the routes the collector and writer address. Routes that need a
/// SEO slug resolve to `None` when the slug is missing or empty, so the
/// affected locale (or resource) is dropped rather than emitted broken.
#[derive(Debug, Clone)]
pub struct StaticRouteResolver {
    /// Host the resolved URLs point at (e.g. `www.example.com`).
    host: String,
    /// Application path base, empty for sites mounted at the root.
    path_base: String,
}

impl StaticRouteResolver {
    /// Creates a resolver for the given host.
    pub fn new<S: Into<String>>(host: S) -> Self {
        Self {
            host: host.into(),
            path_base: String::new(),
        }
    }

    /// Sets the application path base (must start with `/`).
    pub fn with_path_base<S: Into<String>>(mut self, path_base: S) -> Self {
        self.path_base = path_base.into();
        self
    }
}

impl RouteResolver for StaticRouteResolver {
    fn route_url(
        &self,
        route_name: &str,
        params: Option<&RouteParams>,
        scheme: Scheme,
    ) -> Option<String> {
        let path = match route_name {
            ROUTE_HOME_PAGE => "/".to_string(),
            ROUTE_PRODUCT_SEARCH => "/search".to_string(),
            ROUTE_CONTACT_US => "/contactus".to_string(),
            ROUTE_NEWS_ARCHIVE => "/news".to_string(),
            ROUTE_BLOG => "/blog".to_string(),
            ROUTE_BOARDS => "/boards".to_string(),
            ROUTE_CATEGORY | ROUTE_MANUFACTURER | ROUTE_PRODUCT
            | ROUTE_TOPIC => {
                let slug = params
                    .and_then(|p| p.se_name())
                    .filter(|slug| !slug.is_empty())?;
                format!("/{}", slug)
            }
            ROUTE_PRODUCTS_BY_TAG => {
                let slug = params
                    .and_then(|p| p.se_name())
                    .filter(|slug| !slug.is_empty())?;
                format!("/producttag/{}", slug)
            }
            ROUTE_SITEMAP_SHARD => {
                let id = params.and_then(|p| p.id())?;
                format!("/sitemap-{}.xml", id)
            }
            _ => return None,
        };

        Some(format!(
            "{}://{}{}{}",
            scheme.as_str(),
            self.host,
            self.path_base,
            path
        ))
    }

    fn store_location(&self, scheme: Scheme) -> String {
        format!("{}://{}{}", scheme.as_str(), self.host, self.path_base)
    }
}

/// Locale provider over a fixed locale list.
#[derive(Debug, Clone, Default)]
pub struct StaticLocaleProvider {
    locales: Vec<Locale>,
}

impl StaticLocaleProvider {
    /// Creates a provider over the given locales; their order is the
    /// alternate-link order of every entry.
    pub fn new(locales: Vec<Locale>) -> Self {
        Self { locales }
    }
}

impl LocaleProvider for StaticLocaleProvider {
    fn active_locales(&self) -> Result<Vec<Locale>> {
        Ok(self.locales.clone())
    }
}

/// Slug resolver over an in-memory slug table.
///
/// Lookup falls back from the localized slug to the canonical one; a
/// resource without any registered slug yields an empty string, which route
/// resolution treats as unresolvable.
#[derive(Debug, Clone, Default)]
pub struct StaticSlugResolver {
    slugs: HashMap<(ResourceKind, u64, Option<LocaleId>), String>,
}

impl StaticSlugResolver {
    /// Registers the canonical slug of a resource.
    pub fn with_slug<S: Into<String>>(
        mut self,
        kind: ResourceKind,
        id: u64,
        slug: S,
    ) -> Self {
        _ = self.slugs.insert((kind, id, None), slug.into());
        self
    }

    /// Registers a localized slug of a resource.
    pub fn with_localized_slug<S: Into<String>>(
        mut self,
        kind: ResourceKind,
        id: u64,
        locale: LocaleId,
        slug: S,
    ) -> Self {
        _ = self.slugs.insert((kind, id, Some(locale)), slug.into());
        self
    }
}

impl SlugResolver for StaticSlugResolver {
    fn seo_slug(
        &self,
        kind: ResourceKind,
        id: u64,
        locale: Option<LocaleId>,
    ) -> String {
        locale
            .and_then(|locale| self.slugs.get(&(kind, id, Some(locale))))
            .or_else(|| self.slugs.get(&(kind, id, None)))
            .cloned()
            .unwrap_or_default()
    }
}

/// Resource catalog over in-memory record lists.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    categories: Vec<CatalogRecord>,
    manufacturers: Vec<CatalogRecord>,
    products: Vec<CatalogRecord>,
    product_tags: Vec<CatalogRecord>,
    topics: Vec<CatalogRecord>,
}

impl StaticCatalog {
    /// Sets the category records.
    pub fn with_categories(mut self, records: Vec<CatalogRecord>) -> Self {
        self.categories = records;
        self
    }

    /// Sets the manufacturer records.
    pub fn with_manufacturers(mut self, records: Vec<CatalogRecord>) -> Self {
        self.manufacturers = records;
        self
    }

    /// Sets the product records, in creation order.
    pub fn with_products(mut self, records: Vec<CatalogRecord>) -> Self {
        self.products = records;
        self
    }

    /// Sets the product tag records.
    pub fn with_product_tags(mut self, records: Vec<CatalogRecord>) -> Self {
        self.product_tags = records;
        self
    }

    /// Sets the topic records (already filtered for sitemap inclusion).
    pub fn with_topics(mut self, records: Vec<CatalogRecord>) -> Self {
        self.topics = records;
        self
    }
}

impl ResourceCatalog for StaticCatalog {
    fn categories(&self, _store_id: StoreId) -> Result<Vec<CatalogRecord>> {
        Ok(self.categories.clone())
    }

    fn manufacturers(&self, _store_id: StoreId) -> Result<Vec<CatalogRecord>> {
        Ok(self.manufacturers.clone())
    }

    fn visible_products(
        &self,
        _store_id: StoreId,
    ) -> Result<Vec<CatalogRecord>> {
        Ok(self.products.clone())
    }

    fn product_tags(&self) -> Result<Vec<CatalogRecord>> {
        Ok(self.product_tags.clone())
    }

    fn sitemap_topics(&self, _store_id: StoreId) -> Result<Vec<CatalogRecord>> {
        Ok(self.topics.clone())
    }
}

/// Main sitemap generation pipeline for SitemapFlow.
///
/// Owns the immutable configuration and the injected capabilities; every
/// [`generate`](SitemapFlow::generate) call recomputes the full entry list
/// from the providers, so no state is shared between invocations.
#[derive(Debug)]
pub struct SitemapFlow {
    config: SitemapConfig,
    routes: Box<dyn RouteResolver>,
    catalog: Box<dyn ResourceCatalog>,
    slugs: Box<dyn SlugResolver>,
    locales: Box<dyn LocaleProvider>,
}

impl SitemapFlow {
    /// Creates a new instance of `SitemapFlow`.
    pub fn new(
        config: SitemapConfig,
        routes: Box<dyn RouteResolver>,
        catalog: Box<dyn ResourceCatalog>,
        slugs: Box<dyn SlugResolver>,
        locales: Box<dyn LocaleProvider>,
    ) -> Self {
        Self {
            config,
            routes,
            catalog,
            slugs,
            locales,
        }
    }

    /// Generates sitemap XML into the given output stream.
    ///
    /// With no `shard_id`, the output is a sitemap-index document when the
    /// total entry count reaches the configured shard size, and the single
    /// sitemap document otherwise. With a `shard_id`, exactly that 1-based
    /// shard is written; an out-of-range id (0 or beyond the last shard)
    /// writes nothing and returns successfully, as does an empty entry set.
    pub fn generate<W: Write>(
        &self,
        output: W,
        shard_id: Option<usize>,
    ) -> Result<()> {
        let active_locales = if self.config.localized_urls_enabled {
            Some(self.locales.active_locales()?)
        } else {
            None
        };

        let collector = EntryCollector::new(
            &self.config,
            self.routes.as_ref(),
            self.catalog.as_ref(),
            self.slugs.as_ref(),
        );
        let entries = collector.collect_all(active_locales.as_deref())?;

        let total = entries.len();
        let shards = paginate(entries, self.config.max_urls_per_sitemap);
        if shards.is_empty() {
            debug!("No sitemap entries; nothing written");
            return Ok(());
        }

        let writer = SitemapXmlWriter::new(
            self.routes.as_ref(),
            active_locales.as_deref().unwrap_or(&[]),
            &self.config.path_base,
            self.config.scheme(),
        );

        match shard_id {
            Some(id) => {
                if id == 0 || id > shards.len() {
                    debug!(
                        "Requested sitemap shard {} of {}; nothing written",
                        id,
                        shards.len()
                    );
                    return Ok(());
                }
                info!("Writing sitemap shard {} of {}", id, shards.len());
                writer.write_sitemap(output, &shards[id - 1])
            }
            None => {
                if total >= self.config.max_urls_per_sitemap {
                    info!(
                        "Writing sitemap index over {} shards",
                        shards.len()
                    );
                    writer.write_sitemap_index(output, shards.len())
                } else {
                    info!("Writing single sitemap with {} entries", total);
                    writer.write_sitemap(output, &shards[0])
                }
            }
        }
    }

    /// Generates sitemap XML and returns it as a string.
    pub fn generate_to_string(
        &self,
        shard_id: Option<usize>,
    ) -> Result<String> {
        let mut buffer = Vec::new();
        self.generate(&mut buffer, shard_id)?;
        String::from_utf8(buffer).map_err(|e| {
            SitemapError::xml_output_error(
                "sitemap output was not valid UTF-8",
                Some(Box::new(e)),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flow over static capabilities: `product_count` products with known
    /// slugs, everything else off except the three fixed pages.
    fn product_flow(product_count: u64, max_per_sitemap: usize) -> SitemapFlow {
        let config = ConfigBuilder::new()
            .with_override("include_categories", false)
            .with_override("include_manufacturers", false)
            .with_override("include_product_tags", false)
            .with_override("news_enabled", false)
            .with_override("blog_enabled", false)
            .with_override("max_urls_per_sitemap", max_per_sitemap as i64)
            .build()
            .unwrap();

        let mut slugs = StaticSlugResolver::default();
        let mut products = Vec::new();
        for id in 1..=product_count {
            slugs = slugs.with_slug(
                ResourceKind::Product,
                id,
                format!("item-{}", id),
            );
            products.push(CatalogRecord::new(id));
        }

        SitemapFlow::new(
            config,
            Box::new(StaticRouteResolver::new("shop.test")),
            Box::new(StaticCatalog::default().with_products(products)),
            Box::new(slugs),
            Box::new(StaticLocaleProvider::default()),
        )
    }

    #[test]
    fn test_small_site_yields_single_document() {
        // Scenario A: total below the shard threshold, no shard requested.
        let flow = product_flow(2, 50);
        let xml = flow.generate_to_string(None).unwrap();

        assert!(xml.contains("<urlset"));
        assert!(!xml.contains("<sitemapindex"));
        // Three fixed pages plus two products, none localized.
        assert_eq!(xml.matches("</url>").count(), 5);
        assert!(xml.contains("<loc>http://shop.test/item-2</loc>"));
    }

    #[test]
    fn test_large_site_yields_index() {
        // Scenario B: 120 entries at 50 per shard -> 3 shards.
        let flow = product_flow(117, 50);
        let xml = flow.generate_to_string(None).unwrap();

        assert!(xml.contains("<sitemapindex"));
        assert_eq!(xml.matches("</sitemap>").count(), 3);
        assert!(xml.contains("<loc>http://shop.test/sitemap-3.xml</loc>"));
    }

    #[test]
    fn test_requested_shard_contains_its_slice() {
        // Scenario C: shard 2 of 3 holds entries 51-100 (1-based).
        let flow = product_flow(117, 50);
        let xml = flow.generate_to_string(Some(2)).unwrap();

        assert!(xml.contains("<urlset"));
        assert_eq!(xml.matches("</url>").count(), 50);
        // Entry 51 is product 48 (after the three fixed pages).
        assert!(xml.contains("<loc>http://shop.test/item-48</loc>"));
        assert!(xml.contains("<loc>http://shop.test/item-97</loc>"));
        assert!(!xml.contains("<loc>http://shop.test/item-47</loc>"));
        assert!(!xml.contains("<loc>http://shop.test/item-98</loc>"));
    }

    #[test]
    fn test_out_of_range_shard_writes_nothing() {
        // Scenario D: shard 4 with only 3 shards.
        let flow = product_flow(117, 50);
        assert_eq!(flow.generate_to_string(Some(4)).unwrap(), "");
        assert_eq!(flow.generate_to_string(Some(0)).unwrap(), "");
    }

    #[test]
    fn test_empty_entry_set_writes_nothing() {
        /// Resolver with an empty route table.
        #[derive(Debug)]
        struct Unroutable;

        impl RouteResolver for Unroutable {
            fn route_url(
                &self,
                _route_name: &str,
                _params: Option<&RouteParams>,
                _scheme: Scheme,
            ) -> Option<String> {
                None
            }

            fn store_location(&self, scheme: Scheme) -> String {
                format!("{}://shop.test", scheme.as_str())
            }
        }

        let config = SitemapConfig::default();
        let flow = SitemapFlow::new(
            config,
            Box::new(Unroutable),
            Box::new(StaticCatalog::default()),
            Box::new(StaticSlugResolver::default()),
            Box::new(StaticLocaleProvider::default()),
        );
        assert_eq!(flow.generate_to_string(None).unwrap(), "");
    }

    #[test]
    fn test_localized_resource_fans_out_per_locale() {
        // Scenario E: one product, two locales, three blocks, each block
        // announcing both siblings.
        let config = ConfigBuilder::new()
            .with_override("include_categories", false)
            .with_override("include_manufacturers", false)
            .with_override("include_product_tags", false)
            .with_override("news_enabled", false)
            .with_override("blog_enabled", false)
            .with_override("localized_urls_enabled", true)
            .build()
            .unwrap();

        let slugs = StaticSlugResolver::default()
            .with_slug(ResourceKind::Product, 1, "shoes")
            .with_localized_slug(ResourceKind::Product, 1, 2, "chaussures");
        let locales =
            vec![Locale::new(1, "en"), Locale::new(2, "fr")];

        let flow = SitemapFlow::new(
            config,
            Box::new(StaticRouteResolver::new("shop.test")),
            Box::new(StaticCatalog::default().with_products(vec![
                CatalogRecord::new(1),
            ])),
            Box::new(slugs),
            Box::new(StaticLocaleProvider::new(locales)),
        );

        let xml = flow.generate_to_string(None).unwrap();

        assert!(xml.contains("<loc>http://shop.test/shoes</loc>"));
        assert!(xml.contains("<loc>http://shop.test/en/shoes</loc>"));
        assert!(xml.contains("<loc>http://shop.test/fr/chaussures</loc>"));
        // The product accounts for three blocks; every block repeats both
        // alternate links.
        let product_links = xml
            .matches("href=\"http://shop.test/en/shoes\"")
            .count();
        assert_eq!(product_links, 3);
        let fr_links = xml
            .matches("href=\"http://shop.test/fr/chaussures\"")
            .count();
        assert_eq!(fr_links, 3);
    }

    #[test]
    fn test_force_https_switches_scheme() {
        let config = ConfigBuilder::new()
            .with_override("force_https", true)
            .build()
            .unwrap();

        let flow = SitemapFlow::new(
            config,
            Box::new(StaticRouteResolver::new("shop.test")),
            Box::new(StaticCatalog::default()),
            Box::new(StaticSlugResolver::default()),
            Box::new(StaticLocaleProvider::default()),
        );

        let xml = flow.generate_to_string(None).unwrap();
        assert!(xml.contains("<loc>https://shop.test/</loc>"));
        assert!(!xml.contains("http://shop.test"));
    }

    #[test]
    fn test_generation_is_repeatable() {
        let flow = product_flow(5, 50);
        let first = flow.generate_to_string(None).unwrap();
        let second = flow.generate_to_string(None).unwrap();

        // Identical inputs yield identical structure; only `lastmod` values
        // depend on the clock, and with second precision two immediate runs
        // almost always agree even on those.
        let strip = |xml: &str| -> String {
            xml.lines()
                .filter(|line| !line.contains("<lastmod>"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(strip(&first), strip(&second));
    }
}
